// Copyright 2025 Garner Contributors
// SPDX-License-Identifier: Apache-2.0, MIT

use std::collections::HashMap;

use crate::actor::{Actor, CodeRef, ACCOUNT_CODE, MARKET_CODE, MINER_CODE, TOKEN_CODE};
use crate::address::{Address, ADDRESS_LENGTH, MARKET_ACTOR_ADDR, TOKEN_ACTOR_ADDR};
use crate::contract::{Contract, ContractState, MarketContract, MarketState, TokenContract, TokenState};
use crate::encoding::{self, Cid};
use crate::error::Error;

/// An immutable snapshot of chain state.
///
/// Readers resolve actors, contracts and contract state against the snapshot
/// they hold; nothing in this type mutates a snapshot another reader can see.
/// The execution layer commits by building a new root and swapping it in.
#[derive(Clone, Debug, Default)]
pub struct StateRoot {
    actors: HashMap<Address, Actor>,
    /// Content-addressed actor memory blobs.
    blobs: HashMap<Cid, Vec<u8>>,
    epoch: u64,
}

impl StateRoot {
    /// Build a genesis root: the token ledger seeded with the given account
    /// balances, an empty market, and an account actor per funded address.
    pub fn genesis(accounts: &[(Address, u64)], ask_ttl: u64) -> Result<Self, Error> {
        let mut root = Self::default();

        let ledger = ContractState::Token(TokenState::genesis(accounts));
        let mut token = Actor::new(*TOKEN_CODE);
        token.memory = Some(root.put_blob(&encoding::to_blob(&ledger)?));
        root.put_actor(TOKEN_ACTOR_ADDR, token);

        let market = ContractState::Market(MarketState::genesis(ask_ttl));
        let mut market_actor = Actor::new(*MARKET_CODE);
        market_actor.memory = Some(root.put_blob(&encoding::to_blob(&market)?));
        root.put_actor(MARKET_ACTOR_ADDR, market_actor);

        for (addr, _) in accounts {
            root.put_actor(*addr, Actor::new(*ACCOUNT_CODE));
        }
        Ok(root)
    }

    /// The epoch this snapshot was taken at.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// The actor entry at `addr`.
    pub fn get_actor(&self, addr: &Address) -> Result<&Actor, Error> {
        self.actors.get(addr).ok_or(Error::ActorNotFound(*addr))
    }

    /// Resolve a code reference to its contract implementation.
    pub fn get_contract(&self, code: &CodeRef) -> Result<Contract, Error> {
        if *code == *ACCOUNT_CODE {
            Ok(Contract::Account)
        } else if *code == *TOKEN_CODE {
            Ok(Contract::Token(TokenContract))
        } else if *code == *MARKET_CODE {
            Ok(Contract::Market(MarketContract))
        } else if *code == *MINER_CODE {
            Ok(Contract::Miner)
        } else {
            Err(Error::UnknownCode(*code))
        }
    }

    /// Decode an actor's memory into a working contract state.
    ///
    /// An actor that never persisted state decodes to its contract's default.
    /// The decoded variant must belong to the actor's code.
    pub fn load_contract_state(
        &self,
        code: &CodeRef,
        memory: Option<&Cid>,
    ) -> Result<ContractState, Error> {
        let state = match memory {
            Some(memory) => {
                let bytes = self
                    .blobs
                    .get(memory)
                    .ok_or_else(|| Error::CorruptState(format!("missing blob {memory}")))?;
                encoding::from_blob::<ContractState>(bytes)?
            }
            None => match self.get_contract(code)? {
                Contract::Account => ContractState::Account,
                Contract::Token(_) => ContractState::Token(TokenState::default()),
                Contract::Market(_) => ContractState::Market(MarketState::default()),
                Contract::Miner => {
                    return Err(Error::CorruptState(
                        "miner actor has no persisted state".to_string(),
                    ))
                }
            },
        };
        let matches = matches!(
            (&state, self.get_contract(code)?),
            (ContractState::Account, Contract::Account)
                | (ContractState::Token(_), Contract::Token(_))
                | (ContractState::Market(_), Contract::Market(_))
                | (ContractState::Miner(_), Contract::Miner)
        );
        if !matches {
            return Err(Error::CorruptState(
                "actor memory does not belong to its code".to_string(),
            ));
        }
        Ok(state)
    }

    /// The count of transactions already accepted from `addr`.
    pub fn nonce_for_actor(&self, addr: &Address) -> Result<u64, Error> {
        Ok(self.get_actor(addr)?.nonce)
    }

    // Mutators below are the execution layer's commit API. They operate on a
    // scratch clone, never on a snapshot a reader holds.

    /// Store a memory blob, returning its content identifier.
    pub fn put_blob(&mut self, bytes: &[u8]) -> Cid {
        let id = Cid::from_content(bytes);
        self.blobs.insert(id, bytes.to_vec());
        id
    }

    /// Insert or replace an actor entry.
    pub fn put_actor(&mut self, addr: Address, actor: Actor) {
        self.actors.insert(addr, actor);
    }

    /// Persist a contract state as the actor's new memory.
    pub fn set_actor_memory(&mut self, addr: &Address, state: &ContractState) -> Result<(), Error> {
        let memory = self.put_blob(&encoding::to_blob(state)?);
        let actor = self
            .actors
            .get_mut(addr)
            .ok_or(Error::ActorNotFound(*addr))?;
        actor.memory = Some(memory);
        Ok(())
    }

    /// Record that a transaction from `addr` was accepted.
    pub fn bump_nonce(&mut self, addr: &Address) -> Result<(), Error> {
        let actor = self
            .actors
            .get_mut(addr)
            .ok_or(Error::ActorNotFound(*addr))?;
        actor.nonce += 1;
        Ok(())
    }

    /// Advance the epoch counter.
    pub fn advance_epoch(&mut self) {
        self.epoch += 1;
    }

    /// Derive the address of an actor allocated by `creator` at `epoch`.
    pub fn derive_address(&self, creator: Address, epoch: u64) -> Address {
        let mut seed = Vec::with_capacity(ADDRESS_LENGTH + 16);
        seed.extend_from_slice(creator.as_bytes());
        seed.extend_from_slice(&epoch.to_be_bytes());
        seed.extend_from_slice(&(self.actors.len() as u64).to_be_bytes());
        let digest = Cid::from_content(&seed);
        let hash = digest.0.hash().digest();
        let mut bytes = [0u8; ADDRESS_LENGTH];
        bytes.copy_from_slice(&hash[..ADDRESS_LENGTH]);
        Address::new(bytes)
    }
}
