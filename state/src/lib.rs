// Copyright 2025 Garner Contributors
// SPDX-License-Identifier: Apache-2.0, MIT

//! # Garner State
//!
//! The chain-side data model for Garner: addresses, transactions, receipts,
//! actors, the state-root snapshot, and the contract implementations backing
//! the storage marketplace.
//!
//! A [`StateRoot`] is an immutable snapshot. Readers resolve actors and
//! contracts against the snapshot they hold; the only way to mutate chain
//! state is through [`execute::apply`], which produces a new root.

pub mod actor;
pub mod address;
pub mod contract;
pub mod encoding;
mod error;
pub mod execute;
pub mod receipt;
mod root;
pub mod transaction;

pub use error::Error;
pub use root::StateRoot;
