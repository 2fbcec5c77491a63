// Copyright 2025 Garner Contributors
// SPDX-License-Identifier: Apache-2.0, MIT
mod account;
mod market;

#[cfg(test)]
pub mod test_utils {
    use std::env;

    use garner_provider::LocalProvider;
    use garner_sdk::network::{self, NetworkConfig};
    use garner_wallet::Wallet;

    const DEFAULT_TEST_TARGET_NETWORK: &str = "devnet";

    /// The network configuration the tests run against.
    ///
    /// `GARNER_NETWORK_CONFIG` points at a TOML file of named specs;
    /// without it the built-in presets are used. `GARNER_NETWORK` selects
    /// the network by name, defaulting to devnet.
    pub fn get_network_config() -> NetworkConfig {
        let mut specs = match env::var("GARNER_NETWORK_CONFIG") {
            Ok(path) => network::load_networks(&path).unwrap(),
            Err(_) => network::default_networks(),
        };
        let name = env::var("GARNER_NETWORK")
            .unwrap_or_else(|_| DEFAULT_TEST_TARGET_NETWORK.to_string());
        specs
            .remove(&name)
            .unwrap()
            .into_network_config()
            .unwrap()
    }

    /// Start a chain from the configured genesis and return a wallet per
    /// funded account. Each test gets its own chain, so tests never race
    /// each other on nonces.
    pub fn fresh_chain() -> (LocalProvider, Vec<Wallet>) {
        let config = get_network_config();
        let provider = LocalProvider::new(config.local_config()).unwrap();
        let wallets = config
            .accounts
            .iter()
            .map(|account| Wallet::new(account.address))
            .collect();
        (provider, wallets)
    }
}
