// Copyright 2025 Garner Contributors
// SPDX-License-Identifier: Apache-2.0, MIT

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::encoding::Cid;
use crate::error::Error;

/// Identity of a transaction: the content identifier of its canonical
/// serialization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxId(pub Cid);

impl Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A typed method parameter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Value {
    Address(Address),
    Uint(u64),
    Int(i64),
    Cid(Cid),
}

impl Value {
    /// A short tag naming the variant, used in dispatch errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Address(_) => "address",
            Value::Uint(_) => "uint",
            Value::Int(_) => "int",
            Value::Cid(_) => "cid",
        }
    }
}

/// An intended state transition, immutable once constructed.
///
/// `nonce` must equal the sender's current nonce when the transaction is
/// applied; resubmission with a stale nonce is a caller error, not a protocol
/// retry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub from: Address,
    pub to: Address,
    pub nonce: u64,
    pub method: String,
    pub params: Vec<Value>,
}

impl Transaction {
    pub fn new(
        from: Address,
        to: Address,
        nonce: u64,
        method: impl Into<String>,
        params: Vec<Value>,
    ) -> Self {
        Self {
            from,
            to,
            nonce,
            method: method.into(),
            params,
        }
    }

    /// The transaction's identity.
    pub fn id(&self) -> TxId {
        // A transaction is a tree of plain values and never fails to encode.
        let bytes = serde_json::to_vec(self).expect("transaction serializes");
        TxId(Cid::from_content(&bytes))
    }

    /// Structural validation performed before a transaction reaches the
    /// pending pool.
    pub fn validate(&self) -> Result<(), Error> {
        if self.method.is_empty() {
            return Err(Error::Validation("method is empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::{MARKET_ACTOR_ADDR, TOKEN_ACTOR_ADDR};

    fn tx(nonce: u64) -> Transaction {
        Transaction::new(
            Address::id(9),
            TOKEN_ACTOR_ADDR,
            nonce,
            "transfer",
            vec![Value::Address(Address::id(10)), Value::Uint(5)],
        )
    }

    #[test]
    fn id_is_stable_and_content_derived() {
        assert_eq!(tx(0).id(), tx(0).id());
        assert_ne!(tx(0).id(), tx(1).id());

        let mut other = tx(0);
        other.to = MARKET_ACTOR_ADDR;
        assert_ne!(tx(0).id(), other.id());
    }

    #[test]
    fn empty_method_fails_validation() {
        let bad = Transaction::new(Address::id(9), TOKEN_ACTOR_ADDR, 0, "", vec![]);
        assert!(matches!(bad.validate(), Err(Error::Validation(_))));
    }
}
