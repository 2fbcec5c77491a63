// Copyright 2025 Garner Contributors
// SPDX-License-Identifier: Apache-2.0, MIT

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use garner_provider::QueryProvider;
use garner_state::address::Address;
use garner_state::transaction::{Transaction, Value};

use crate::sender::Sender;

/// [`Sender`] implementation backed by a locally managed account.
///
/// Note, because [`Wallet`] manages the account's sequence (nonce) with a
/// mutex, using it across threads won't increase the speed at which it can
/// issue transactions.
#[derive(Debug, Clone)]
pub struct Wallet {
    addr: Address,
    sequence: Arc<Mutex<u64>>,
}

#[async_trait]
impl Sender for Wallet {
    fn address(&self) -> Address {
        self.addr
    }

    async fn transaction(
        &mut self,
        to: Address,
        method: &str,
        params: Vec<Value>,
        sequence: Option<u64>,
    ) -> anyhow::Result<Transaction> {
        let sequence = match sequence {
            Some(sequence) => sequence,
            None => {
                let mut guard = self.sequence.lock().await;
                let sequence = *guard;
                *guard += 1;
                sequence
            }
        };
        Ok(Transaction::new(self.addr, to, sequence, method, params))
    }
}

impl Wallet {
    /// Returns a new [`Wallet`] for the given address, starting at sequence 0.
    pub fn new(addr: Address) -> Self {
        Self {
            addr,
            sequence: Arc::new(Mutex::new(0)),
        }
    }

    /// Returns a new [`Wallet`] with a freshly generated address.
    pub fn new_random<R: rand::Rng>(rng: &mut R) -> Self {
        Self::new(Address::new_random(rng))
    }

    /// Initialize the sequence from the account's on-chain state.
    pub async fn init_sequence(&mut self, provider: &impl QueryProvider) -> anyhow::Result<()> {
        let sequence = provider.nonce(&self.addr).await?;
        let mut guard = self.sequence.lock().await;
        *guard = sequence;
        Ok(())
    }

    /// Set the sequence to the given value.
    /// If `maybe_sequence` is `None`, it's fetched from the account's
    /// on-chain state.
    pub async fn set_sequence(
        &mut self,
        maybe_sequence: Option<u64>,
        provider: &impl QueryProvider,
    ) -> anyhow::Result<()> {
        if let Some(sequence) = maybe_sequence {
            let mut guard = self.sequence.lock().await;
            *guard = sequence;
        } else {
            self.init_sequence(provider).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use garner_provider::{LocalConfig, LocalProvider};
    use garner_state::address::TOKEN_ACTOR_ADDR;

    #[tokio::test]
    async fn transactions_advance_the_sequence() {
        let mut wallet = Wallet::new(Address::id(10));
        let first = wallet
            .transaction(TOKEN_ACTOR_ADDR, "getBalance", vec![], None)
            .await
            .unwrap();
        let second = wallet
            .transaction(TOKEN_ACTOR_ADDR, "getBalance", vec![], None)
            .await
            .unwrap();
        assert_eq!(first.nonce, 0);
        assert_eq!(second.nonce, 1);
    }

    #[tokio::test]
    async fn explicit_sequence_does_not_advance() {
        let mut wallet = Wallet::new(Address::id(10));
        let pinned = wallet
            .transaction(TOKEN_ACTOR_ADDR, "getBalance", vec![], Some(40))
            .await
            .unwrap();
        assert_eq!(pinned.nonce, 40);
        let next = wallet
            .transaction(TOKEN_ACTOR_ADDR, "getBalance", vec![], None)
            .await
            .unwrap();
        assert_eq!(next.nonce, 0);
    }

    #[tokio::test]
    async fn set_sequence_reads_on_chain_state() {
        let addr = Address::id(10);
        let provider = LocalProvider::new(LocalConfig {
            accounts: vec![(addr, 100)],
            ..Default::default()
        })
        .unwrap();

        let mut wallet = Wallet::new(addr);
        wallet.set_sequence(Some(50), &provider).await.unwrap();
        assert_eq!(*wallet.sequence.lock().await, 50);

        wallet.set_sequence(None, &provider).await.unwrap();
        assert_eq!(*wallet.sequence.lock().await, 0);
    }
}
