// Copyright 2025 Garner Contributors
// SPDX-License-Identifier: Apache-2.0, MIT

use async_trait::async_trait;

use garner_provider::tx::WaitOptions;
use garner_provider::Provider;
use garner_state::address::Address;
use garner_state::receipt::Receipt;
use garner_state::transaction::{Transaction, TxId, Value};

/// Trait that must be implemented by anything that originates transactions.
#[async_trait]
pub trait Sender: Clone + Send + Sync {
    /// Returns the sender address.
    fn address(&self) -> Address;

    /// Returns a [`Transaction`] ready for submission.
    ///
    /// With `sequence` unset, the sender's managed sequence is used and
    /// advanced. Callers must serialize transaction construction and
    /// submission per account; two transactions issued with the same
    /// sequence race, and the execution layer accepts at most one.
    async fn transaction(
        &mut self,
        to: Address,
        method: &str,
        params: Vec<Value>,
        sequence: Option<u64>,
    ) -> anyhow::Result<Transaction>;

    /// Build a transaction and enqueue it without waiting for execution.
    async fn send<P: Provider>(
        &mut self,
        provider: &P,
        to: Address,
        method: &str,
        params: Vec<Value>,
        sequence: Option<u64>,
    ) -> anyhow::Result<TxId>
    where
        Self: Sized,
    {
        let tx = self.transaction(to, method, params, sequence).await?;
        Ok(provider.send_transaction(tx).await?)
    }

    /// Build a transaction, enqueue it, and suspend until its receipt is
    /// observable or `wait` gives up.
    async fn send_and_wait<P: Provider>(
        &mut self,
        provider: &P,
        to: Address,
        method: &str,
        params: Vec<Value>,
        sequence: Option<u64>,
        wait: WaitOptions,
    ) -> anyhow::Result<Receipt>
    where
        Self: Sized,
    {
        let tx = self.transaction(to, method, params, sequence).await?;
        Ok(provider.send_transaction_and_wait(tx, wait).await?)
    }
}
