// Copyright 2025 Garner Contributors
// SPDX-License-Identifier: Apache-2.0, MIT

//! Network presets and TOML-loadable chain configuration.

use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};

use garner_provider::LocalConfig;
use garner_state::address::Address;

const DEVNET_NETWORK_NAME: &str = "devnet";
const DEVNET_ASK_TTL: u64 = 100;
const DEVNET_MEMPOOL_CAPACITY: usize = 1024;
const DEVNET_ACCOUNT_FUNDING: u64 = 5000;

/// Addresses funded at genesis on the devnet preset.
const DEVNET_ACCOUNTS: [&str; 4] = [
    "0x000000000000000000000000000000000000000a",
    "0x000000000000000000000000000000000000000b",
    "0x000000000000000000000000000000000000000c",
    "0x000000000000000000000000000000000000000d",
];

/// The built-in network presets, keyed by network name.
pub fn default_networks() -> HashMap<String, NetworkSpec> {
    let mut hm = HashMap::new();

    hm.insert(
        DEVNET_NETWORK_NAME.to_owned(),
        NetworkSpec {
            accounts: DEVNET_ACCOUNTS
                .iter()
                .map(|addr| GenesisAccount {
                    address: Address::from_str(addr).unwrap(),
                    balance: DEVNET_ACCOUNT_FUNDING,
                })
                .collect(),
            ask_ttl: DEVNET_ASK_TTL,
            mempool_capacity: DEVNET_MEMPOOL_CAPACITY,
        },
    );
    hm
}

/// Load named network specs from a TOML file.
///
/// The path is shell-expanded, so `~/.config/garner/networks.toml` works.
pub fn load_networks(path: &str) -> anyhow::Result<HashMap<String, NetworkSpec>> {
    let path = shellexpand::full(path).with_context(|| format!("expanding '{path}'"))?;
    let path = Path::new(path.as_ref());
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading network config at {}", path.display()))?;
    toml::from_str(&content).context("parsing network config")
}

/// An account funded at genesis.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenesisAccount {
    pub address: Address,
    pub balance: u64,
}

/// A named network's chain parameters as they appear in a config file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NetworkSpec {
    /// Accounts funded at genesis.
    pub accounts: Vec<GenesisAccount>,
    /// Epochs an ask stays live after posting.
    pub ask_ttl: u64,
    /// Pending pool capacity.
    pub mempool_capacity: usize,
}

impl NetworkSpec {
    pub fn into_network_config(self) -> anyhow::Result<NetworkConfig> {
        if self.mempool_capacity == 0 {
            return Err(anyhow!("mempool capacity must be non-zero"));
        }
        Ok(NetworkConfig {
            accounts: self.accounts,
            ask_ttl: self.ask_ttl,
            mempool_capacity: self.mempool_capacity,
        })
    }
}

/// Validated chain configuration, ready to start a provider from.
#[derive(Clone, Debug)]
pub struct NetworkConfig {
    pub accounts: Vec<GenesisAccount>,
    pub ask_ttl: u64,
    pub mempool_capacity: usize,
}

impl NetworkConfig {
    /// The provider configuration for this network.
    pub fn local_config(&self) -> LocalConfig {
        LocalConfig {
            accounts: self
                .accounts
                .iter()
                .map(|a| (a.address, a.balance))
                .collect(),
            ask_ttl: self.ask_ttl,
            capacity: self.mempool_capacity,
        }
    }
}

/// Network presets.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Network {
    /// Preset for local development: a handful of funded accounts.
    Devnet,
}

impl Network {
    pub fn get_config(&self) -> NetworkConfig {
        match self {
            Network::Devnet => default_networks()
                .remove(DEVNET_NETWORK_NAME)
                .expect("devnet preset exists")
                .into_network_config()
                .expect("devnet preset is valid"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn devnet_preset_is_valid() {
        let config = Network::Devnet.get_config();
        assert!(!config.accounts.is_empty());
        assert!(config.ask_ttl > 0);
        let local = config.local_config();
        assert_eq!(local.accounts.len(), config.accounts.len());
    }

    #[test]
    fn specs_round_trip_through_toml() {
        let networks = default_networks();
        let encoded = toml::to_string(&networks).unwrap();
        let decoded: HashMap<String, NetworkSpec> = toml::from_str(&encoded).unwrap();
        let devnet = decoded.get(DEVNET_NETWORK_NAME).unwrap();
        assert_eq!(devnet.ask_ttl, DEVNET_ASK_TTL);
        assert_eq!(devnet.accounts.len(), DEVNET_ACCOUNTS.len());
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let spec = NetworkSpec {
            accounts: vec![],
            ask_ttl: 10,
            mempool_capacity: 0,
        };
        assert!(spec.into_network_config().is_err());
    }
}
