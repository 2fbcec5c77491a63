// Copyright 2025 Garner Contributors
// SPDX-License-Identifier: Apache-2.0, MIT

use anyhow::Result;

use garner_provider::tx::WaitOptions;
use garner_provider::{Provider, QueryProvider};
use garner_state::address::{Address, TOKEN_ACTOR_ADDR};
use garner_state::contract::CallContext;
use garner_state::receipt::Receipt;
use garner_state::transaction::{TxId, Value};
use garner_wallet::Sender;

use crate::helpers::load_token;
use crate::TxParams;

/// A static wrapper around Garner account methods.
pub struct Account {}

impl Account {
    /// Get the sequence (nonce) for an address from the current state root.
    pub async fn sequence(provider: &impl QueryProvider, addr: &Address) -> Result<u64> {
        Ok(provider.nonce(addr).await?)
    }

    /// Get the token balance of `addr`.
    ///
    /// Fails for an address the ledger has never seen; an account holding
    /// zero resolves to `Ok(0)`.
    pub async fn balance(provider: &impl QueryProvider, addr: &Address) -> Result<u64> {
        let root = provider.state_root().await;
        let (token, state) = load_token(&root)?;
        let cctx = CallContext::read(root.epoch());
        Ok(token.balance(&cctx, state.as_token()?, addr)?)
    }

    /// Transfer tokens from the sender to `to`.
    ///
    /// Order placement style: fire-and-forget. The returned id can be used
    /// to wait for the receipt later.
    pub async fn transfer(
        provider: &impl Provider,
        sender: &mut impl Sender,
        to: Address,
        amount: u64,
        params: TxParams,
    ) -> Result<TxId> {
        sender
            .send(
                provider,
                TOKEN_ACTOR_ADDR,
                "transfer",
                vec![Value::Address(to), Value::Uint(amount)],
                params.sequence,
            )
            .await
    }

    /// Transfer tokens and wait for the receipt.
    ///
    /// A soft failure (e.g. insufficient balance) is not an error: it is
    /// returned as a receipt with `success == false` for the caller to
    /// inspect.
    pub async fn transfer_and_wait(
        provider: &impl Provider,
        sender: &mut impl Sender,
        to: Address,
        amount: u64,
        params: TxParams,
        wait: WaitOptions,
    ) -> Result<Receipt> {
        sender
            .send_and_wait(
                provider,
                TOKEN_ACTOR_ADDR,
                "transfer",
                vec![Value::Address(to), Value::Uint(amount)],
                params.sequence,
                wait,
            )
            .await
    }
}
