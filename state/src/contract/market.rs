// Copyright 2025 Garner Contributors
// SPDX-License-Identifier: Apache-2.0, MIT

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{
    address_param, cid_param, expect_arity, int_param, uint_param, CallContext, CallError,
    ContractState, Fault, MinerState,
};
use crate::address::Address;
use crate::encoding::Cid;
use crate::error::Error;
use crate::receipt::ReturnValue;
use crate::transaction::Value;

fn default_ask_ttl() -> u64 {
    100
}

/// An offer to buy storage, posted by a client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bid {
    pub owner: Address,
    pub price: u64,
    pub size: u64,
    pub collateral: u64,
}

/// An offer to sell storage, posted on behalf of a miner.
///
/// Price is signed so that incentive pricing can go negative; sign semantics
/// are a pricing-policy concern outside the contract.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ask {
    pub miner: Address,
    pub price: i64,
    pub size: u64,
    pub expiry: u64,
}

/// A matched bid/ask pair, referencing the stored data by content identifier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deal {
    pub bid: u64,
    pub ask: u64,
    pub data: Cid,
}

/// The storage market's typed method table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MarketMethod {
    AddBid { price: u64, size: u64 },
    AddAsk { miner: Address, price: i64, size: u64 },
    CreateMiner { pledge: u64 },
    MakeDeal { bid: u64, ask: u64, data: Cid },
}

impl MarketMethod {
    pub fn parse(method: &str, params: &[Value]) -> Result<Self, Error> {
        match method {
            "addBid" => {
                expect_arity(method, params, 2)?;
                Ok(MarketMethod::AddBid {
                    price: uint_param(method, params, 0)?,
                    size: uint_param(method, params, 1)?,
                })
            }
            "addAsk" => {
                expect_arity(method, params, 3)?;
                Ok(MarketMethod::AddAsk {
                    miner: address_param(method, params, 0)?,
                    price: int_param(method, params, 1)?,
                    size: uint_param(method, params, 2)?,
                })
            }
            "createMiner" => {
                expect_arity(method, params, 1)?;
                Ok(MarketMethod::CreateMiner {
                    pledge: uint_param(method, params, 0)?,
                })
            }
            "makeDeal" => {
                expect_arity(method, params, 3)?;
                Ok(MarketMethod::MakeDeal {
                    bid: uint_param(method, params, 0)?,
                    ask: uint_param(method, params, 1)?,
                    data: cid_param(method, params, 2)?,
                })
            }
            _ => Err(Error::UnknownMethod(method.to_string())),
        }
    }
}

/// Order-book state: bid/ask registries keyed by monotonically assigned ids,
/// the deal log, and the miners the market has allocated.
///
/// Registry iteration order is id order, which is insertion order.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MarketState {
    next_bid: u64,
    next_ask: u64,
    bids: BTreeMap<u64, Bid>,
    asks: BTreeMap<u64, Ask>,
    deals: Vec<Deal>,
    miners: Vec<Address>,
    /// Epochs an ask stays live after posting.
    #[serde(default = "default_ask_ttl")]
    ask_ttl: u64,
}

impl MarketState {
    pub fn genesis(ask_ttl: u64) -> Self {
        Self {
            ask_ttl,
            ..Default::default()
        }
    }

    /// Append a bid for `owner`, assigning the next bid id.
    pub fn add_bid(&mut self, owner: Address, price: u64, size: u64) -> u64 {
        let id = self.next_bid;
        self.next_bid += 1;
        self.bids.insert(
            id,
            Bid {
                owner,
                price,
                size,
                collateral: price.saturating_mul(size),
            },
        );
        id
    }

    /// Append an ask for a registered miner, assigning the next ask id.
    pub fn add_ask(
        &mut self,
        miner: Address,
        price: i64,
        size: u64,
        epoch: u64,
    ) -> Result<u64, Fault> {
        if !self.miners.contains(&miner) {
            return Err(Fault::UnknownMiner(miner));
        }
        let id = self.next_ask;
        self.next_ask += 1;
        self.asks.insert(
            id,
            Ask {
                miner,
                price,
                size,
                expiry: epoch + self.ask_ttl,
            },
        );
        Ok(id)
    }

    pub fn register_miner(&mut self, miner: Address) {
        self.miners.push(miner);
    }

    /// Consume a live bid/ask pair and record the deal.
    ///
    /// Consumption is exactly-once: both orders are removed from their
    /// registries, so a second match against either fails. Races between
    /// concurrent matches are settled by execution order.
    pub fn make_deal(&mut self, bid: u64, ask: u64, data: Cid, epoch: u64) -> Result<(), Fault> {
        if !self.bids.contains_key(&bid) {
            return Err(Fault::BidNotLive(bid));
        }
        let posted = self.asks.get(&ask).ok_or(Fault::AskNotLive(ask))?;
        if posted.expiry <= epoch {
            return Err(Fault::AskExpired(ask, posted.expiry));
        }
        self.bids.remove(&bid);
        self.asks.remove(&ask);
        self.deals.push(Deal { bid, ask, data });
        Ok(())
    }

    pub fn bids(&self) -> impl Iterator<Item = (u64, &Bid)> {
        self.bids.iter().map(|(id, b)| (*id, b))
    }

    pub fn asks(&self) -> impl Iterator<Item = (u64, &Ask)> {
        self.asks.iter().map(|(id, a)| (*id, a))
    }

    pub fn deals(&self) -> &[Deal] {
        &self.deals
    }
}

/// The storage market contract.
#[derive(Clone, Copy, Debug, Default)]
pub struct MarketContract;

impl MarketContract {
    /// Read-only bid registry listing, in registry order.
    pub fn list_bids(
        &self,
        _cctx: &CallContext,
        state: &MarketState,
    ) -> Result<Vec<(u64, Bid)>, Error> {
        Ok(state.bids().map(|(id, b)| (id, b.clone())).collect())
    }

    /// Read-only ask registry listing, in registry order.
    pub fn list_asks(
        &self,
        _cctx: &CallContext,
        state: &MarketState,
    ) -> Result<Vec<(u64, Ask)>, Error> {
        Ok(state.asks().map(|(id, a)| (id, a.clone())).collect())
    }

    /// Read-only deal log listing, in creation order.
    pub fn list_deals(
        &self,
        _cctx: &CallContext,
        state: &MarketState,
    ) -> Result<Vec<Deal>, Error> {
        Ok(state.deals().to_vec())
    }

    pub(super) fn apply(
        &self,
        cctx: &mut CallContext,
        state: &mut MarketState,
        method: &MarketMethod,
    ) -> Result<ReturnValue, CallError> {
        match method {
            MarketMethod::AddBid { price, size } => {
                let id = state.add_bid(cctx.caller, *price, *size);
                Ok(ReturnValue::Typed(Value::Uint(id)))
            }
            MarketMethod::AddAsk { miner, price, size } => {
                let id = state.add_ask(*miner, *price, *size, cctx.epoch)?;
                Ok(ReturnValue::Typed(Value::Uint(id)))
            }
            MarketMethod::CreateMiner { pledge } => {
                let owner = cctx.caller;
                let miner = ContractState::Miner(MinerState {
                    owner,
                    pledge: *pledge,
                });
                let addr = cctx.create_miner_actor(&miner)?;
                cctx.move_tokens("createMiner", owner, addr, *pledge)?;
                state.register_miner(addr);
                Ok(ReturnValue::Typed(Value::Address(addr)))
            }
            MarketMethod::MakeDeal { bid, ask, data } => {
                state.make_deal(*bid, *ask, *data, cctx.epoch)?;
                Ok(ReturnValue::Empty)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn market_with_miner(miner: Address) -> MarketState {
        let mut st = MarketState::genesis(10);
        st.register_miner(miner);
        st
    }

    #[test]
    fn bid_ids_are_monotonic() {
        let mut st = MarketState::genesis(10);
        let owner = Address::id(9);
        assert_eq!(st.add_bid(owner, 10, 100), 0);
        assert_eq!(st.add_bid(owner, 11, 100), 1);
        let listed: Vec<u64> = st.bids().map(|(id, _)| id).collect();
        assert_eq!(listed, vec![0, 1]);
    }

    #[test]
    fn ask_requires_registered_miner() {
        let mut st = MarketState::genesis(10);
        let miner = Address::id(9);
        assert_eq!(st.add_ask(miner, 3, 100, 0), Err(Fault::UnknownMiner(miner)));
        st.register_miner(miner);
        assert_eq!(st.add_ask(miner, 3, 100, 0), Ok(0));
        let (_, ask) = st.asks().next().unwrap();
        assert_eq!(ask.expiry, 10);
    }

    #[test]
    fn deal_consumes_orders_exactly_once() {
        let miner = Address::id(9);
        let mut st = market_with_miner(miner);
        let bid = st.add_bid(Address::id(8), 10, 100);
        let ask = st.add_ask(miner, 10, 100, 0).unwrap();
        let data = Cid::from_content(b"piece");

        st.make_deal(bid, ask, data, 1).unwrap();
        assert_eq!(st.deals(), &[Deal { bid, ask, data }]);
        assert_eq!(st.bids().count(), 0);
        assert_eq!(st.asks().count(), 0);

        // Consumed orders are no longer eligible.
        assert_eq!(st.make_deal(bid, ask, data, 1), Err(Fault::BidNotLive(bid)));
        let other = st.add_bid(Address::id(8), 10, 100);
        assert_eq!(
            st.make_deal(other, ask, data, 1),
            Err(Fault::AskNotLive(ask))
        );
    }

    #[test]
    fn deal_rejects_expired_ask() {
        let miner = Address::id(9);
        let mut st = market_with_miner(miner);
        let bid = st.add_bid(Address::id(8), 10, 100);
        let ask = st.add_ask(miner, 10, 100, 0).unwrap();
        let data = Cid::from_content(b"piece");
        assert_eq!(
            st.make_deal(bid, ask, data, 10),
            Err(Fault::AskExpired(ask, 10))
        );
        // The failed match consumed nothing.
        assert_eq!(st.bids().count(), 1);
        assert_eq!(st.asks().count(), 1);
    }

    #[test]
    fn parse_covers_the_method_table() {
        let call = MarketMethod::parse("addBid", &[Value::Uint(10), Value::Uint(100)]).unwrap();
        assert_eq!(call, MarketMethod::AddBid { price: 10, size: 100 });
        assert!(matches!(
            MarketMethod::parse("addAsk", &[Value::Uint(1), Value::Int(2), Value::Uint(3)]),
            Err(Error::InvalidParams { .. })
        ));
        assert!(matches!(
            MarketMethod::parse("cancelBid", &[Value::Uint(0)]),
            Err(Error::UnknownMethod(_))
        ));
    }
}
