// Copyright 2025 Garner Contributors
// SPDX-License-Identifier: Apache-2.0, MIT

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{address_param, expect_arity, uint_param, CallContext, CallError, Fault};
use crate::address::Address;
use crate::error::Error;
use crate::receipt::ReturnValue;
use crate::transaction::Value;

/// The token ledger's typed method table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenMethod {
    Transfer { to: Address, amount: u64 },
    GetBalance { addr: Address },
}

impl TokenMethod {
    pub fn parse(method: &str, params: &[Value]) -> Result<Self, Error> {
        match method {
            "transfer" => {
                expect_arity(method, params, 2)?;
                Ok(TokenMethod::Transfer {
                    to: address_param(method, params, 0)?,
                    amount: uint_param(method, params, 1)?,
                })
            }
            "getBalance" => {
                expect_arity(method, params, 1)?;
                Ok(TokenMethod::GetBalance {
                    addr: address_param(method, params, 0)?,
                })
            }
            _ => Err(Error::UnknownMethod(method.to_string())),
        }
    }
}

/// Ledger state: balances keyed by address.
///
/// Presence of an entry is meaningful: an address the ledger has never seen
/// is distinct from an address holding zero.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenState {
    balances: HashMap<Address, u64>,
}

impl TokenState {
    pub fn genesis(accounts: &[(Address, u64)]) -> Self {
        Self {
            balances: accounts.iter().copied().collect(),
        }
    }

    /// The balance of `addr`, or [`Error::BalanceNotFound`] for an address
    /// with no ledger entry.
    pub fn balance(&self, addr: &Address) -> Result<u64, Error> {
        self.balances
            .get(addr)
            .copied()
            .ok_or(Error::BalanceNotFound(*addr))
    }

    /// Move `amount` from `from` to `to`, creating the recipient's entry if
    /// needed.
    pub fn transfer(&mut self, from: &Address, to: &Address, amount: u64) -> Result<(), Fault> {
        let have = self.balances.get(from).copied().unwrap_or(0);
        if have < amount {
            return Err(Fault::InsufficientBalance { have, need: amount });
        }
        self.balances.insert(*from, have - amount);
        *self.balances.entry(*to).or_insert(0) += amount;
        Ok(())
    }
}

/// The fungible-token ledger contract.
#[derive(Clone, Copy, Debug, Default)]
pub struct TokenContract;

impl TokenContract {
    /// Read-only balance query.
    pub fn balance(
        &self,
        _cctx: &CallContext,
        state: &TokenState,
        addr: &Address,
    ) -> Result<u64, Error> {
        state.balance(addr)
    }

    pub(super) fn apply(
        &self,
        cctx: &mut CallContext,
        state: &mut TokenState,
        method: &TokenMethod,
    ) -> Result<ReturnValue, CallError> {
        match method {
            TokenMethod::Transfer { to, amount } => {
                state.transfer(&cctx.caller, to, *amount)?;
                Ok(ReturnValue::Empty)
            }
            TokenMethod::GetBalance { addr } => {
                Ok(ReturnValue::Typed(Value::Uint(state.balance(addr)?)))
            }
        }
    }
}
