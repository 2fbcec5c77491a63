// Copyright 2025 Garner Contributors
// SPDX-License-Identifier: Apache-2.0, MIT

//! The closed set of contract implementations and their typed method tables.
//!
//! Dispatch is a two-step affair: [`MethodCall::parse`] turns a transaction's
//! string method name and parameter list into a typed call (rejecting unknown
//! names and arity/type mismatches up front), and [`Contract::apply`] matches
//! the tagged union of (contract, state, call).

mod market;
mod miner;
mod token;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use market::{Ask, Bid, Deal, MarketContract, MarketMethod, MarketState};
pub use miner::MinerState;
pub use token::{TokenContract, TokenMethod, TokenState};

use crate::actor::{Actor, MINER_CODE};
use crate::address::{Address, SYSTEM_ACTOR_ADDR, TOKEN_ACTOR_ADDR};
use crate::encoding::Cid;
use crate::error::Error;
use crate::receipt::ReturnValue;
use crate::root::StateRoot;
use crate::transaction::Value;

/// A fault raised by contract execution.
///
/// Faults are not hard errors: the enclosing transaction still resolves to a
/// receipt, with `success == false` and the fault description as its info.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Fault {
    #[error("insufficient balance: have {have}, need {need}")]
    InsufficientBalance { have: u64, need: u64 },

    #[error("stale nonce: expected {expected}, got {got}")]
    StaleNonce { expected: u64, got: u64 },

    #[error("bid {0} is not live")]
    BidNotLive(u64),

    #[error("ask {0} is not live")]
    AskNotLive(u64),

    #[error("ask {0} expired at epoch {1}")]
    AskExpired(u64, u64),

    #[error("miner {0} is not registered with the market")]
    UnknownMiner(Address),
}

/// Either a dispatch/state error or an execution fault.
#[derive(Error, Debug)]
pub enum CallError {
    #[error(transparent)]
    State(#[from] Error),
    #[error(transparent)]
    Fault(#[from] Fault),
}

/// The decoded, mutable form of an actor's memory, bound for one call.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum ContractState {
    Account,
    Token(TokenState),
    Market(MarketState),
    Miner(MinerState),
}

impl ContractState {
    pub fn as_token(&self) -> Result<&TokenState, Error> {
        match self {
            ContractState::Token(st) => Ok(st),
            _ => Err(Error::CorruptState("expected token state".to_string())),
        }
    }

    pub fn as_market(&self) -> Result<&MarketState, Error> {
        match self {
            ContractState::Market(st) => Ok(st),
            _ => Err(Error::CorruptState("expected market state".to_string())),
        }
    }

    pub fn as_miner(&self) -> Result<&MinerState, Error> {
        match self {
            ContractState::Miner(st) => Ok(st),
            _ => Err(Error::CorruptState("expected miner state".to_string())),
        }
    }
}

/// A contract implementation resolved from an actor's code reference.
#[derive(Clone, Debug)]
pub enum Contract {
    Account,
    Token(TokenContract),
    Market(MarketContract),
    Miner,
}

impl Contract {
    /// Execute a typed call against the loaded state.
    pub fn apply(
        &self,
        cctx: &mut CallContext,
        state: &mut ContractState,
        call: &MethodCall,
    ) -> Result<ReturnValue, CallError> {
        match (self, state, call) {
            (Contract::Token(c), ContractState::Token(st), MethodCall::Token(m)) => {
                c.apply(cctx, st, m)
            }
            (Contract::Market(c), ContractState::Market(st), MethodCall::Market(m)) => {
                c.apply(cctx, st, m)
            }
            _ => Err(Error::CorruptState(
                "contract, state and call do not belong together".to_string(),
            )
            .into()),
        }
    }
}

/// A typed method call, parsed from a transaction's method name and params.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MethodCall {
    Token(TokenMethod),
    Market(MarketMethod),
}

impl MethodCall {
    /// Parse a string-dispatched call against a contract's method table.
    pub fn parse(contract: &Contract, method: &str, params: &[Value]) -> Result<Self, Error> {
        match contract {
            Contract::Token(_) => TokenMethod::parse(method, params).map(MethodCall::Token),
            Contract::Market(_) => MarketMethod::parse(method, params).map(MethodCall::Market),
            Contract::Account | Contract::Miner => Err(Error::UnknownMethod(method.to_string())),
        }
    }
}

/// Scoped binding of one call to a loaded contract state.
///
/// Read-only calls carry no chain handle; the loaded state is discarded after
/// the call. During transaction execution the context holds a handle to the
/// scratch root, which is the one channel through which a method may reach
/// beyond its own actor (actor creation, pledge movement).
pub struct CallContext<'a> {
    pub caller: Address,
    pub epoch: u64,
    chain: Option<&'a mut StateRoot>,
}

impl<'a> CallContext<'a> {
    /// A context for a read-only query against a snapshot.
    pub fn read(epoch: u64) -> CallContext<'static> {
        CallContext {
            caller: SYSTEM_ACTOR_ADDR,
            epoch,
            chain: None,
        }
    }

    /// A context for applying one transaction to a scratch root.
    pub fn transacting(caller: Address, epoch: u64, chain: &'a mut StateRoot) -> Self {
        CallContext {
            caller,
            epoch,
            chain: Some(chain),
        }
    }

    fn chain(&mut self, method: &str) -> Result<&mut StateRoot, Error> {
        self.chain.as_deref_mut().ok_or_else(|| {
            Error::Validation(format!("{method} mutates state and requires a transaction"))
        })
    }

    /// Allocate a new miner actor with the given initial state.
    pub(crate) fn create_miner_actor(&mut self, state: &ContractState) -> Result<Address, Error> {
        let caller = self.caller;
        let epoch = self.epoch;
        let chain = self.chain("createMiner")?;
        let addr = chain.derive_address(caller, epoch);
        let mut actor = Actor::new(*MINER_CODE);
        actor.memory = Some(chain.put_blob(&crate::encoding::to_blob(state)?));
        chain.put_actor(addr, actor);
        Ok(addr)
    }

    /// Move tokens in the ledger on behalf of the caller.
    pub(crate) fn move_tokens(
        &mut self,
        method: &str,
        from: Address,
        to: Address,
        amount: u64,
    ) -> Result<(), CallError> {
        let chain = self.chain(method)?;
        let token = chain.get_actor(&TOKEN_ACTOR_ADDR)?.clone();
        let state = chain.load_contract_state(&token.code, token.memory.as_ref())?;
        let mut ledger = state.as_token()?.clone();
        ledger.transfer(&from, &to, amount)?;
        chain.set_actor_memory(&TOKEN_ACTOR_ADDR, &ContractState::Token(ledger))?;
        Ok(())
    }
}

pub(crate) fn expect_arity(method: &str, params: &[Value], arity: usize) -> Result<(), Error> {
    if params.len() != arity {
        return Err(Error::invalid_params(
            method,
            format!("expected {arity} params, got {}", params.len()),
        ));
    }
    Ok(())
}

pub(crate) fn address_param(method: &str, params: &[Value], i: usize) -> Result<Address, Error> {
    match &params[i] {
        Value::Address(a) => Ok(*a),
        other => Err(Error::invalid_params(
            method,
            format!("param {i}: expected address, got {}", other.kind()),
        )),
    }
}

pub(crate) fn uint_param(method: &str, params: &[Value], i: usize) -> Result<u64, Error> {
    match &params[i] {
        Value::Uint(v) => Ok(*v),
        other => Err(Error::invalid_params(
            method,
            format!("param {i}: expected uint, got {}", other.kind()),
        )),
    }
}

pub(crate) fn int_param(method: &str, params: &[Value], i: usize) -> Result<i64, Error> {
    match &params[i] {
        Value::Int(v) => Ok(*v),
        other => Err(Error::invalid_params(
            method,
            format!("param {i}: expected int, got {}", other.kind()),
        )),
    }
}

pub(crate) fn cid_param(method: &str, params: &[Value], i: usize) -> Result<Cid, Error> {
    match &params[i] {
        Value::Cid(c) => Ok(*c),
        other => Err(Error::invalid_params(
            method,
            format!("param {i}: expected cid, got {}", other.kind()),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_context_names_the_method_that_needs_a_transaction() {
        let mut cctx = CallContext::read(0);
        let err = cctx
            .move_tokens("transferPledge", Address::id(10), Address::id(11), 1)
            .unwrap_err();
        assert!(matches!(
            &err,
            CallError::State(Error::Validation(msg)) if msg.contains("transferPledge")
        ));
    }

    #[test]
    fn create_miner_is_rejected_without_a_chain_handle() {
        let contract = Contract::Market(MarketContract);
        let mut state = ContractState::Market(MarketState::default());
        let call = MethodCall::Market(MarketMethod::CreateMiner { pledge: 10 });

        let mut cctx = CallContext::read(0);
        let err = contract.apply(&mut cctx, &mut state, &call).unwrap_err();
        assert!(matches!(
            &err,
            CallError::State(Error::Validation(msg)) if msg.contains("createMiner")
        ));
    }
}
