// Copyright 2025 Garner Contributors
// SPDX-License-Identifier: Apache-2.0, MIT

use serde::{Deserialize, Serialize};

use crate::transaction::Value;

/// A method's return value as observed through a receipt.
///
/// A node that executed the transaction itself records the typed value. A
/// node that only observed the result via replication may hold an opaque
/// echoed string instead of the structured value, and many methods return
/// nothing at all. Callers must handle all three arms; none is silently
/// coerced into another.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReturnValue {
    /// The structured value returned by local execution.
    Typed(Value),
    /// The value as echoed by a replicating node.
    Echo(String),
    /// The method returned nothing.
    Empty,
}

/// The immutable outcome record of a submitted transaction.
///
/// `success == false` is a soft failure: the transaction was accepted and
/// processed, but its effect was rolled back (e.g. insufficient balance,
/// stale nonce). `info` carries the fault description in that case.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub success: bool,
    pub result: ReturnValue,
    pub info: String,
}

impl Receipt {
    /// A successful receipt carrying the method's return value.
    pub fn ok(result: ReturnValue) -> Self {
        Self {
            success: true,
            result,
            info: String::new(),
        }
    }

    /// A soft failure: accepted, processed, effect rolled back.
    pub fn soft_failure(info: impl Into<String>) -> Self {
        Self {
            success: false,
            result: ReturnValue::Empty,
            info: info.into(),
        }
    }
}
