// Copyright 2025 Garner Contributors
// SPDX-License-Identifier: Apache-2.0, MIT

//! # Garner Provider
//!
//! A chain provider for Garner: transaction submission with optional
//! receipt confirmation, and snapshot queries against the state root.

mod error;
mod local;
pub mod tx;

use async_trait::async_trait;

use garner_state::actor::Actor;
use garner_state::address::Address;
use garner_state::StateRoot;

pub use error::Error;
pub use garner_state;
pub use local::{LocalConfig, LocalProvider};

/// Provider for read-only state queries.
///
/// Every query runs against the state root version current at call time;
/// concurrent readers need no coordination.
#[async_trait]
pub trait QueryProvider: Send + Sync {
    /// A snapshot of the current state root.
    async fn state_root(&self) -> StateRoot;

    /// The actor entry at `addr` in the current state root.
    async fn actor(&self, addr: &Address) -> Result<Actor, Error> {
        let root = self.state_root().await;
        Ok(root.get_actor(addr)?.clone())
    }

    /// The next valid sequence number for transactions from `addr`.
    ///
    /// Call immediately before constructing a transaction; nothing at this
    /// layer serializes two senders racing on the same account.
    async fn nonce(&self, addr: &Address) -> Result<u64, Error> {
        let root = self.state_root().await;
        Ok(root.nonce_for_actor(addr)?)
    }
}

/// A provider that can both query state and submit transactions.
pub trait Provider: QueryProvider + tx::TxProvider {}

impl<T: QueryProvider + tx::TxProvider> Provider for T {}
