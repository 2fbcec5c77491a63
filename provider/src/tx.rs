// Copyright 2025 Garner Contributors
// SPDX-License-Identifier: Apache-2.0, MIT

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use garner_state::receipt::Receipt;
use garner_state::transaction::{Transaction, TxId};

use crate::error::Error;

/// Default time a caller is willing to wait for a receipt.
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(60);

/// The current status of a transaction.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    /// The transaction is in the pending pool waiting to be executed.
    Pending(TxId),
    /// The transaction has been executed and its receipt recorded.
    Committed(Receipt),
}

/// Controls how long a caller suspends waiting for a receipt.
#[derive(Debug, Clone)]
pub struct WaitOptions {
    /// Give up with [`Error::Timeout`] after this long.
    pub timeout: Duration,
    /// Give up with [`Error::Cancelled`] when this token fires.
    pub cancel: CancellationToken,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_WAIT_TIMEOUT,
            cancel: CancellationToken::new(),
        }
    }
}

impl WaitOptions {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            ..Default::default()
        }
    }
}

/// Provider for submitting transactions.
#[async_trait]
pub trait TxProvider: Send + Sync {
    /// Enqueue a transaction for execution and return once it is accepted
    /// into the pending pool. Does not wait for execution.
    ///
    /// Fails with a validation error for a structurally invalid transaction
    /// (empty method, unknown recipient) before it reaches the pool.
    async fn send_transaction(&self, tx: Transaction) -> Result<TxId, Error>;

    /// Enqueue a transaction, then suspend until its receipt is observable
    /// or the wait options give up.
    ///
    /// Giving up does not retract the submission.
    async fn send_transaction_and_wait(
        &self,
        tx: Transaction,
        wait: WaitOptions,
    ) -> Result<Receipt, Error>;

    /// Suspend until the receipt for `id` is observable.
    ///
    /// Idempotent: waiting again on an already-resolved transaction returns
    /// the same receipt.
    async fn wait_for_receipt(&self, id: TxId, wait: WaitOptions) -> Result<Receipt, Error>;
}
