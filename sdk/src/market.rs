// Copyright 2025 Garner Contributors
// SPDX-License-Identifier: Apache-2.0, MIT

use anyhow::{bail, Result};
use serde::Serialize;

use garner_provider::tx::WaitOptions;
use garner_provider::{Provider, QueryProvider};
use garner_state::address::{Address, MARKET_ACTOR_ADDR};
use garner_state::contract::{Ask, Bid, CallContext, Deal};
use garner_state::encoding::Cid;
use garner_state::transaction::{TxId, Value};
use garner_wallet::Sender;

use crate::helpers::load_market;
use crate::TxParams;

/// The outcome of a committed deal: the transaction that sealed it and the
/// content identifier the payload is stored under.
#[derive(Clone, Debug, Serialize)]
pub struct DealReceipt {
    pub tx: TxId,
    pub data: Cid,
}

/// A static wrapper around the storage market's order-book methods.
pub struct Market {}

impl Market {
    /// Post a bid to buy `size` bytes at `price` per byte.
    ///
    /// Fire-and-forget: the assigned bid id appears in the receipt, which
    /// the caller can wait on with the returned transaction id, or recover
    /// later by listing bids.
    pub async fn add_bid(
        provider: &impl Provider,
        sender: &mut impl Sender,
        price: u64,
        size: u64,
        params: TxParams,
    ) -> Result<TxId> {
        sender
            .send(
                provider,
                MARKET_ACTOR_ADDR,
                "addBid",
                vec![Value::Uint(price), Value::Uint(size)],
                params.sequence,
            )
            .await
    }

    /// Post an ask to sell `size` bytes at `price` per byte on behalf of a
    /// registered miner.
    pub async fn add_ask(
        provider: &impl Provider,
        sender: &mut impl Sender,
        miner: Address,
        price: i64,
        size: u64,
        params: TxParams,
    ) -> Result<TxId> {
        sender
            .send(
                provider,
                MARKET_ACTOR_ADDR,
                "addAsk",
                vec![Value::Address(miner), Value::Int(price), Value::Uint(size)],
                params.sequence,
            )
            .await
    }

    /// Match a live bid and ask for `payload`, waiting for the receipt.
    ///
    /// The payload's content identifier is derived locally before
    /// submission, so the caller can verify what the deal log records.
    /// A soft failure (consumed or expired order) is surfaced as an error
    /// carrying the receipt's diagnostic.
    pub async fn make_deal(
        provider: &impl Provider,
        sender: &mut impl Sender,
        bid: u64,
        ask: u64,
        payload: &[u8],
        params: TxParams,
        wait: WaitOptions,
    ) -> Result<DealReceipt> {
        let data = Cid::from_content(payload);
        let tx = sender
            .send(
                provider,
                MARKET_ACTOR_ADDR,
                "makeDeal",
                vec![Value::Uint(bid), Value::Uint(ask), Value::Cid(data)],
                params.sequence,
            )
            .await?;
        let receipt = provider.wait_for_receipt(tx, wait).await?;
        if !receipt.success {
            bail!("deal was not committed: {}", receipt.info);
        }
        Ok(DealReceipt { tx, data })
    }

    /// List live bids, in registry order.
    pub async fn list_bids(provider: &impl QueryProvider) -> Result<Vec<(u64, Bid)>> {
        let root = provider.state_root().await;
        let (market, state) = load_market(&root)?;
        let cctx = CallContext::read(root.epoch());
        Ok(market.list_bids(&cctx, state.as_market()?)?)
    }

    /// List live asks, in registry order.
    pub async fn list_asks(provider: &impl QueryProvider) -> Result<Vec<(u64, Ask)>> {
        let root = provider.state_root().await;
        let (market, state) = load_market(&root)?;
        let cctx = CallContext::read(root.epoch());
        Ok(market.list_asks(&cctx, state.as_market()?)?)
    }

    /// List committed deals, in creation order.
    pub async fn list_deals(provider: &impl QueryProvider) -> Result<Vec<Deal>> {
        let root = provider.state_root().await;
        let (market, state) = load_market(&root)?;
        let cctx = CallContext::read(root.epoch());
        Ok(market.list_deals(&cctx, state.as_market()?)?)
    }
}
