// Copyright 2025 Garner Contributors
// SPDX-License-Identifier: Apache-2.0, MIT

use std::fmt::{self, Display};
use std::str::FromStr;

use rand::Rng;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;

/// Length in bytes of an [`Address`].
pub const ADDRESS_LENGTH: usize = 20;

/// Address of the system actor, used as the caller of read-only calls.
pub const SYSTEM_ACTOR_ADDR: Address = Address::id(0);
/// Address of the built-in token ledger actor.
pub const TOKEN_ACTOR_ADDR: Address = Address::id(1);
/// Address of the built-in storage market actor.
pub const MARKET_ACTOR_ADDR: Address = Address::id(2);

/// An opaque actor identifier with a canonical hex string encoding.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; ADDRESS_LENGTH]);

impl Address {
    pub const fn new(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    /// A well-known ID address reserved for built-in actors.
    pub const fn id(id: u64) -> Self {
        let mut bytes = [0u8; ADDRESS_LENGTH];
        let id = id.to_be_bytes();
        let mut i = 0;
        while i < id.len() {
            bytes[ADDRESS_LENGTH - id.len() + i] = id[i];
            i += 1;
        }
        Self(bytes)
    }

    /// A fresh address drawn from the given source of randomness.
    pub fn new_random<R: Rng>(rng: &mut R) -> Self {
        let mut bytes = [0u8; ADDRESS_LENGTH];
        rng.fill(&mut bytes);
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

impl FromStr for Address {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hexed = s.strip_prefix("0x").unwrap_or(s);
        let bytes =
            hex::decode(hexed).map_err(|e| Error::InvalidAddress(format!("{s}: {e}")))?;
        let bytes: [u8; ADDRESS_LENGTH] = bytes
            .try_into()
            .map_err(|_| Error::InvalidAddress(format!("{s}: wrong length")))?;
        Ok(Self(bytes))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_string().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(|e| de::Error::custom(format!("{e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_round_trip() {
        let addr = Address::new_random(&mut rand::thread_rng());
        let parsed = Address::from_str(&addr.to_string()).unwrap();
        assert_eq!(addr, parsed);
    }

    #[test]
    fn id_addresses_are_distinct() {
        assert_ne!(TOKEN_ACTOR_ADDR, MARKET_ACTOR_ADDR);
        assert_ne!(SYSTEM_ACTOR_ADDR, TOKEN_ACTOR_ADDR);
        assert_eq!(Address::id(1), TOKEN_ACTOR_ADDR);
    }

    #[test]
    fn rejects_malformed_strings() {
        assert!(Address::from_str("0x1234").is_err());
        assert!(Address::from_str("not an address").is_err());
    }

    #[test]
    fn serde_as_string() {
        let addr = Address::id(7);
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, format!("\"{addr}\""));
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(addr, back);
    }
}
