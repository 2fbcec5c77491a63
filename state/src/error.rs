// Copyright 2025 Garner Contributors
// SPDX-License-Identifier: Apache-2.0, MIT

use thiserror::Error;

use crate::actor::CodeRef;
use crate::address::Address;

/// Errors surfaced by state resolution and contract dispatch.
///
/// These are hard errors, returned synchronously to the caller. A transaction
/// that was accepted but whose method faulted is not an error; it resolves to
/// a receipt with `success == false`.
#[derive(Error, Debug)]
pub enum Error {
    /// No actor entry at the address in the current state root.
    #[error("actor not found: {0}")]
    ActorNotFound(Address),

    /// The token ledger has no entry for the address. Distinct from an
    /// entry holding a zero balance.
    #[error("no ledger entry for {0}")]
    BalanceNotFound(Address),

    /// The actor's code reference does not resolve to a known contract.
    #[error("unknown contract code: {0}")]
    UnknownCode(CodeRef),

    /// The method name is not exported by the target contract.
    #[error("unknown method: {0}")]
    UnknownMethod(String),

    /// The method parameters do not match the method's arity/type contract.
    #[error("invalid params for {method}: {reason}")]
    InvalidParams { method: String, reason: String },

    /// The actor's memory could not be decoded into contract state.
    #[error("corrupt contract state: {0}")]
    CorruptState(String),

    /// The transaction is structurally invalid.
    #[error("invalid transaction: {0}")]
    Validation(String),

    /// The string is not a canonical address encoding.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

impl Error {
    pub(crate) fn invalid_params(method: &str, reason: impl Into<String>) -> Self {
        Error::InvalidParams {
            method: method.to_string(),
            reason: reason.into(),
        }
    }
}
