// Copyright 2025 Garner Contributors
// SPDX-License-Identifier: Apache-2.0, MIT

use std::fmt::{self, Display};
use std::str::FromStr;

use multihash::{Code, MultihashDigest};
use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;

/// Multicodec code for raw bytes.
const RAW_CODEC: u64 = 0x55;

/// JSON serialization friendly version of [`cid::Cid`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cid(pub cid::Cid);

impl Cid {
    /// Derive a content identifier for a raw byte payload.
    pub fn from_content(data: &[u8]) -> Self {
        Self(cid::Cid::new_v1(RAW_CODEC, Code::Sha2_256.digest(data)))
    }
}

impl From<cid::Cid> for Cid {
    fn from(v: cid::Cid) -> Self {
        Self(v)
    }
}

impl FromStr for Cid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let inner =
            cid::Cid::try_from(s).map_err(|e| Error::Validation(format!("invalid cid: {e}")))?;
        Ok(Self(inner))
    }
}

impl Display for Cid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for Cid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(|e| D::Error::custom(format!("{e}")))
    }
}

impl Serialize for Cid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_string().serialize(serializer)
    }
}

/// Encode a value into an actor memory blob.
pub fn to_blob<T: Serialize>(value: &T) -> Result<Vec<u8>, Error> {
    serde_json::to_vec(value).map_err(|e| Error::CorruptState(format!("encode: {e}")))
}

/// Decode an actor memory blob.
pub fn from_blob<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T, Error> {
    serde_json::from_slice(bytes).map_err(|e| Error::CorruptState(format!("decode: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_ids_are_stable() {
        let a = Cid::from_content(b"hello");
        let b = Cid::from_content(b"hello");
        let c = Cid::from_content(b"world");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn cid_string_round_trip() {
        let id = Cid::from_content(b"payload");
        let parsed = Cid::from_str(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn blob_decode_failure_is_corrupt_state() {
        let err = from_blob::<u64>(b"not json").unwrap_err();
        assert!(matches!(err, Error::CorruptState(_)));
    }
}
