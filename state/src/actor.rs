// Copyright 2025 Garner Contributors
// SPDX-License-Identifier: Apache-2.0, MIT

use std::fmt::{self, Display};

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::encoding::Cid;

lazy_static! {
    /// Code reference for plain account actors.
    pub static ref ACCOUNT_CODE: CodeRef = CodeRef::builtin("garner/account/v1");
    /// Code reference for the token ledger contract.
    pub static ref TOKEN_CODE: CodeRef = CodeRef::builtin("garner/token/v1");
    /// Code reference for the storage market contract.
    pub static ref MARKET_CODE: CodeRef = CodeRef::builtin("garner/market/v1");
    /// Code reference for miner actors.
    pub static ref MINER_CODE: CodeRef = CodeRef::builtin("garner/miner/v1");
}

/// An opaque reference to a contract implementation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CodeRef(Cid);

impl CodeRef {
    fn builtin(tag: &str) -> Self {
        Self(Cid::from_content(tag.as_bytes()))
    }
}

impl Display for CodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An address-keyed entry in the state root.
///
/// `memory` points at the actor's isolated state blob in the root's blob
/// store; `None` means the actor has never persisted state and decodes to the
/// contract's default. `nonce` counts the transactions accepted from this
/// actor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Actor {
    pub code: CodeRef,
    pub memory: Option<Cid>,
    pub nonce: u64,
}

impl Actor {
    pub fn new(code: CodeRef) -> Self {
        Self {
            code,
            memory: None,
            nonce: 0,
        }
    }
}
