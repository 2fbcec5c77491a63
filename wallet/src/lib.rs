// Copyright 2025 Garner Contributors
// SPDX-License-Identifier: Apache-2.0, MIT

//! # Garner Wallet
//!
//! Account handles for Garner: transaction construction with managed
//! sequence numbers.

mod sender;
mod void;
mod wallet;

pub use sender::Sender;
pub use void::Void;
pub use wallet::Wallet;
