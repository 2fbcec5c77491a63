// Copyright 2025 Garner Contributors
// SPDX-License-Identifier: Apache-2.0, MIT

use anyhow::{anyhow, Result};

use garner_state::address::{Address, MARKET_ACTOR_ADDR, TOKEN_ACTOR_ADDR};
use garner_state::contract::{ContractState, MarketContract, TokenContract};
use garner_state::StateRoot;

// Read-only calls compose the same resolver chain every time: actor entry,
// contract implementation, decoded contract state. The loaded state is a
// working copy for one call and is discarded afterwards.

pub(crate) fn load_token(root: &StateRoot) -> Result<(TokenContract, ContractState)> {
    let (contract, state) = load(root, &TOKEN_ACTOR_ADDR)?;
    match contract {
        garner_state::contract::Contract::Token(token) => Ok((token, state)),
        _ => Err(anyhow!("token actor does not hold the token contract")),
    }
}

pub(crate) fn load_market(root: &StateRoot) -> Result<(MarketContract, ContractState)> {
    let (contract, state) = load(root, &MARKET_ACTOR_ADDR)?;
    match contract {
        garner_state::contract::Contract::Market(market) => Ok((market, state)),
        _ => Err(anyhow!("market actor does not hold the market contract")),
    }
}

fn load(
    root: &StateRoot,
    addr: &Address,
) -> Result<(garner_state::contract::Contract, ContractState)> {
    let actor = root.get_actor(addr)?;
    let contract = root.get_contract(&actor.code)?;
    let state = root.load_contract_state(&actor.code, actor.memory.as_ref())?;
    Ok((contract, state))
}
