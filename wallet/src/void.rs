// Copyright 2025 Garner Contributors
// SPDX-License-Identifier: Apache-2.0, MIT

use anyhow::anyhow;
use async_trait::async_trait;

use garner_state::address::Address;
use garner_state::transaction::{Transaction, Value};

use crate::sender::Sender;

/// [`Sender`] implementation that is not capable of originating
/// transactions; useful where only an address is needed.
#[derive(Clone, Debug)]
pub struct Void {
    address: Address,
}

impl Void {
    pub fn new(address: Address) -> Self {
        Self { address }
    }
}

#[async_trait]
impl Sender for Void {
    fn address(&self) -> Address {
        self.address
    }

    async fn transaction(
        &mut self,
        _to: Address,
        _method: &str,
        _params: Vec<Value>,
        _sequence: Option<u64>,
    ) -> anyhow::Result<Transaction> {
        Err(anyhow!("void sender cannot create transactions"))
    }
}
