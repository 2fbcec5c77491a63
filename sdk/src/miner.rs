// Copyright 2025 Garner Contributors
// SPDX-License-Identifier: Apache-2.0, MIT

use anyhow::{anyhow, bail, Result};

use garner_provider::tx::WaitOptions;
use garner_provider::{Provider, QueryProvider};
use garner_state::address::{Address, MARKET_ACTOR_ADDR};
use garner_state::receipt::ReturnValue;
use garner_state::transaction::Value;
use garner_wallet::Sender;

use crate::TxParams;

/// The owner and pledge recorded on a miner actor.
#[derive(Clone, Copy, Debug)]
pub struct MinerInfo {
    pub owner: Address,
    pub pledge: u64,
}

/// A handle to a miner actor allocated by the storage market.
#[derive(Clone, Copy, Debug)]
pub struct Miner {
    address: Address,
}

impl Miner {
    /// Create a new miner with the given pledge, waiting for the creation
    /// receipt so the new actor's address can be read back.
    pub async fn create(
        provider: &impl Provider,
        sender: &mut impl Sender,
        pledge: u64,
        params: TxParams,
        wait: WaitOptions,
    ) -> Result<Self> {
        let receipt = sender
            .send_and_wait(
                provider,
                MARKET_ACTOR_ADDR,
                "createMiner",
                vec![Value::Uint(pledge)],
                params.sequence,
                wait,
            )
            .await?;
        if !receipt.success {
            bail!("miner creation failed: {}", receipt.info);
        }
        Ok(Self::attach(decode_address(&receipt.result)?))
    }

    /// A handle to an existing miner actor.
    pub fn attach(address: Address) -> Self {
        Self { address }
    }

    /// Returns the miner actor's address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Read the miner's recorded owner and pledge from the state root.
    pub async fn info(&self, provider: &impl QueryProvider) -> Result<MinerInfo> {
        let root = provider.state_root().await;
        let actor = root.get_actor(&self.address)?;
        let state = root.load_contract_state(&actor.code, actor.memory.as_ref())?;
        let miner = state.as_miner()?;
        Ok(MinerInfo {
            owner: miner.owner,
            pledge: miner.pledge,
        })
    }
}

/// Decode the address a `createMiner` receipt carries.
///
/// A receipt produced by local execution carries the typed address; one
/// observed via replication may only echo it as a string. Both are decoded
/// here, explicitly, and an absent result is an error.
fn decode_address(result: &ReturnValue) -> Result<Address> {
    match result {
        ReturnValue::Typed(Value::Address(addr)) => Ok(*addr),
        ReturnValue::Typed(other) => Err(anyhow!(
            "createMiner returned {}, not an address",
            other.kind()
        )),
        ReturnValue::Echo(s) => Ok(s.parse()?),
        ReturnValue::Empty => Err(anyhow!("createMiner returned no address")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_typed_and_echoed_addresses() {
        let addr = Address::id(42);
        let typed = ReturnValue::Typed(Value::Address(addr));
        assert_eq!(decode_address(&typed).unwrap(), addr);

        let echoed = ReturnValue::Echo(addr.to_string());
        assert_eq!(decode_address(&echoed).unwrap(), addr);
    }

    #[test]
    fn rejects_absent_and_mistyped_results() {
        assert!(decode_address(&ReturnValue::Empty).is_err());
        assert!(decode_address(&ReturnValue::Typed(Value::Uint(7))).is_err());
        assert!(decode_address(&ReturnValue::Echo("gibberish".to_string())).is_err());
    }
}
