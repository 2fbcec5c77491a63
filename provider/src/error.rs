// Copyright 2025 Garner Contributors
// SPDX-License-Identifier: Apache-2.0, MIT

use thiserror::Error;

use garner_state::transaction::TxId;

/// Errors surfaced by the provider.
///
/// `Timeout` and `Cancelled` leave the transaction's fate unresolved: the
/// submission is not retracted, and the transaction may still be accepted
/// after the waiting caller gave up. Treat them as "unknown outcome", not
/// "failed".
#[derive(Error, Debug)]
pub enum Error {
    #[error("timed out waiting for receipt of {0}")]
    Timeout(TxId),

    #[error("wait for receipt of {0} was cancelled")]
    Cancelled(TxId),

    #[error("transaction pool is closed")]
    PoolClosed,

    #[error(transparent)]
    State(#[from] garner_state::Error),
}
