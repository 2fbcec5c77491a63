// Copyright 2025 Garner Contributors
// SPDX-License-Identifier: Apache-2.0, MIT

use serde::{Deserialize, Serialize};

use crate::address::Address;

/// State of a miner actor allocated by the market's `createMiner` call.
///
/// The pledge is held on the miner's ledger entry; this records who owns the
/// miner and what was pledged at creation. Miner actors export no methods.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinerState {
    pub owner: Address,
    pub pledge: u64,
}
