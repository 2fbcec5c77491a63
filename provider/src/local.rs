// Copyright 2025 Garner Contributors
// SPDX-License-Identifier: Apache-2.0, MIT

use std::sync::Arc;

use async_trait::async_trait;
use fnv::FnvHashMap;
use tokio::sync::{broadcast, mpsc, Mutex, RwLock};
use tracing::{debug, warn};

use garner_state::address::Address;
use garner_state::execute;
use garner_state::receipt::Receipt;
use garner_state::transaction::{Transaction, TxId};
use garner_state::{Error as StateError, StateRoot};

use crate::error::Error;
use crate::tx::{TxProvider, TxStatus, WaitOptions};
use crate::QueryProvider;

/// Configuration for a [`LocalProvider`]'s chain.
#[derive(Clone, Debug)]
pub struct LocalConfig {
    /// Genesis accounts and their token balances.
    pub accounts: Vec<(Address, u64)>,
    /// Epochs an ask stays live after posting.
    pub ask_ttl: u64,
    /// Pending pool capacity.
    pub capacity: usize,
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            accounts: Vec::new(),
            ask_ttl: 100,
            capacity: 1024,
        }
    }
}

struct Shared {
    root: RwLock<StateRoot>,
    receipts: Mutex<FnvHashMap<TxId, Receipt>>,
    resolved: broadcast::Sender<TxId>,
}

/// An in-process provider backed by its own execution loop.
///
/// Transactions are applied strictly in arrival order against the current
/// state root; each application commits by swapping in the successor root,
/// so readers always see a consistent snapshot. This is the provider used by
/// tests and local development, standing where a remote node would.
#[derive(Clone)]
pub struct LocalProvider {
    pool: mpsc::Sender<Transaction>,
    shared: Arc<Shared>,
}

impl LocalProvider {
    /// Start a local chain from genesis. Must be called within a tokio
    /// runtime; the execution loop runs until the provider is dropped.
    pub fn new(config: LocalConfig) -> Result<Self, Error> {
        let root = StateRoot::genesis(&config.accounts, config.ask_ttl)?;
        let (pool, pool_rx) = mpsc::channel(config.capacity);
        let (resolved, _) = broadcast::channel(config.capacity);
        let shared = Arc::new(Shared {
            root: RwLock::new(root),
            receipts: Mutex::new(FnvHashMap::default()),
            resolved,
        });
        tokio::spawn(run_executor(Arc::clone(&shared), pool_rx));
        Ok(Self { pool, shared })
    }

    /// The status of a transaction: committed once its receipt is recorded,
    /// pending otherwise.
    pub async fn status(&self, id: TxId) -> TxStatus {
        match self.shared.receipts.lock().await.get(&id) {
            Some(receipt) => TxStatus::Committed(receipt.clone()),
            None => TxStatus::Pending(id),
        }
    }
}

async fn run_executor(shared: Arc<Shared>, mut pool: mpsc::Receiver<Transaction>) {
    while let Some(tx) = pool.recv().await {
        let id = tx.id();
        let current = shared.root.read().await.clone();
        let (next, receipt) = execute::apply(&current, &tx);
        *shared.root.write().await = next;

        if receipt.success {
            debug!(%id, from = %tx.from, method = %tx.method, "transaction applied");
        } else {
            warn!(%id, from = %tx.from, method = %tx.method, info = %receipt.info,
                "transaction soft-failed");
        }

        shared.receipts.lock().await.insert(id, receipt);
        // Nobody waiting is fine.
        let _ = shared.resolved.send(id);
    }
    debug!("pending pool closed, execution loop stopping");
}

#[async_trait]
impl QueryProvider for LocalProvider {
    async fn state_root(&self) -> StateRoot {
        self.shared.root.read().await.clone()
    }
}

#[async_trait]
impl TxProvider for LocalProvider {
    async fn send_transaction(&self, tx: Transaction) -> Result<TxId, Error> {
        tx.validate()?;
        {
            let root = self.shared.root.read().await;
            if root.get_actor(&tx.to).is_err() {
                return Err(StateError::Validation(format!("unknown recipient {}", tx.to)).into());
            }
        }
        let id = tx.id();
        self.pool.send(tx).await.map_err(|_| Error::PoolClosed)?;
        debug!(%id, "transaction accepted into pending pool");
        Ok(id)
    }

    async fn send_transaction_and_wait(
        &self,
        tx: Transaction,
        wait: WaitOptions,
    ) -> Result<Receipt, Error> {
        let id = self.send_transaction(tx).await?;
        self.wait_for_receipt(id, wait).await
    }

    async fn wait_for_receipt(&self, id: TxId, wait: WaitOptions) -> Result<Receipt, Error> {
        // Subscribe before the lookup so a receipt landing in between is not
        // missed.
        let mut resolved = self.shared.resolved.subscribe();
        if let Some(receipt) = self.shared.receipts.lock().await.get(&id) {
            return Ok(receipt.clone());
        }

        let deadline = tokio::time::sleep(wait.timeout);
        tokio::pin!(deadline);
        loop {
            tokio::select! {
                _ = &mut deadline => return Err(Error::Timeout(id)),
                _ = wait.cancel.cancelled() => return Err(Error::Cancelled(id)),
                event = resolved.recv() => match event {
                    Ok(done) if done == id => {
                        let receipts = self.shared.receipts.lock().await;
                        let receipt = receipts.get(&id).cloned();
                        // Recorded before the announcement.
                        return receipt.ok_or(Error::PoolClosed);
                    }
                    Ok(_) => continue,
                    Err(broadcast::error::RecvError::Lagged(_)) => {
                        if let Some(receipt) = self.shared.receipts.lock().await.get(&id) {
                            return Ok(receipt.clone());
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => return Err(Error::PoolClosed),
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio_util::sync::CancellationToken;

    use garner_state::address::{Address, TOKEN_ACTOR_ADDR};
    use garner_state::transaction::Value;

    use super::*;

    const ALICE: Address = Address::id(10);
    const BOB: Address = Address::id(11);

    fn provider() -> LocalProvider {
        LocalProvider::new(LocalConfig {
            accounts: vec![(ALICE, 1000), (BOB, 50)],
            ..Default::default()
        })
        .unwrap()
    }

    fn transfer(nonce: u64, amount: u64) -> Transaction {
        Transaction::new(
            ALICE,
            TOKEN_ACTOR_ADDR,
            nonce,
            "transfer",
            vec![Value::Address(BOB), Value::Uint(amount)],
        )
    }

    #[tokio::test]
    async fn rejects_structurally_invalid_transactions() {
        let provider = provider();

        let empty = Transaction::new(ALICE, TOKEN_ACTOR_ADDR, 0, "", vec![]);
        assert!(matches!(
            provider.send_transaction(empty).await,
            Err(Error::State(StateError::Validation(_)))
        ));

        let unknown = Transaction::new(ALICE, Address::id(99), 0, "transfer", vec![]);
        assert!(matches!(
            provider.send_transaction(unknown).await,
            Err(Error::State(StateError::Validation(_)))
        ));
    }

    #[tokio::test]
    async fn send_and_wait_resolves_a_receipt() {
        let provider = provider();
        let receipt = provider
            .send_transaction_and_wait(transfer(0, 100), WaitOptions::default())
            .await
            .unwrap();
        assert!(receipt.success);
        assert_eq!(provider.nonce(&ALICE).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn waiting_twice_returns_the_same_receipt() {
        let provider = provider();
        let id = provider.send_transaction(transfer(0, 100)).await.unwrap();
        let first = provider
            .wait_for_receipt(id, WaitOptions::default())
            .await
            .unwrap();
        let second = provider
            .wait_for_receipt(id, WaitOptions::default())
            .await
            .unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test(start_paused = true)]
    async fn wait_times_out_when_no_receipt_appears() {
        let provider = provider();
        // An identity that was never submitted.
        let id = transfer(7, 1).id();
        let err = provider
            .wait_for_receipt(id, WaitOptions::with_timeout(Duration::from_millis(100)))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Timeout(_)));
    }

    #[tokio::test]
    async fn cancelled_wait_does_not_retract_the_submission() {
        let provider = provider();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let tx = transfer(0, 100);
        let id = tx.id();
        let err = provider
            .send_transaction_and_wait(
                tx,
                WaitOptions {
                    timeout: Duration::from_secs(60),
                    cancel,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Cancelled(_)));

        // The transaction still executes; a later wait observes it.
        let receipt = provider
            .wait_for_receipt(id, WaitOptions::default())
            .await
            .unwrap();
        assert!(receipt.success);
    }

    #[tokio::test]
    async fn same_nonce_is_accepted_at_most_once() {
        let provider = provider();
        let a = transfer(0, 100);
        let b = transfer(0, 200);
        let id_a = provider.send_transaction(a).await.unwrap();
        let id_b = provider.send_transaction(b).await.unwrap();

        let ra = provider
            .wait_for_receipt(id_a, WaitOptions::default())
            .await
            .unwrap();
        let rb = provider
            .wait_for_receipt(id_b, WaitOptions::default())
            .await
            .unwrap();
        assert!(ra.success != rb.success, "exactly one may win the nonce");
        assert_eq!(provider.nonce(&ALICE).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn status_moves_from_pending_to_committed() {
        let provider = provider();
        let tx = transfer(0, 1);
        let id = tx.id();
        assert!(matches!(provider.status(id).await, TxStatus::Pending(_)));
        provider.send_transaction(tx).await.unwrap();
        provider
            .wait_for_receipt(id, WaitOptions::default())
            .await
            .unwrap();
        assert!(matches!(provider.status(id).await, TxStatus::Committed(_)));
    }
}
