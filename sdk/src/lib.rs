// Copyright 2025 Garner Contributors
// SPDX-License-Identifier: Apache-2.0, MIT

//! # Garner SDK
//!
//! The top-level user interface for the Garner storage marketplace: account
//! transfers, miner creation, and the order-book bid/ask/deal operations.

pub mod account;
mod helpers;
pub mod market;
pub mod miner;
pub mod network;

/// Arguments common to transactions.
#[derive(Clone, Default, Debug)]
pub struct TxParams {
    /// Sender account sequence (nonce). Unset means the sender's managed
    /// sequence is used.
    pub sequence: Option<u64>,
}
