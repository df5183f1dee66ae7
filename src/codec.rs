use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Error, Result};

/// Value serialization strategy.
///
/// Selected once per database when the store is opened, with per-database
/// configuration taking precedence over the environment-level one. The codec
/// must never change for the lifetime of the stored data: decoding old
/// values with a different codec is undefined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Codec {
    /// Compact binary encoding. The default.
    #[default]
    Bincode,
    /// Human-readable JSON encoding.
    Json,
}

impl Codec {
    /// Encode a value to bytes.
    pub fn encode<T>(&self, value: &T) -> Result<Vec<u8>>
    where
        T: Serialize + ?Sized,
    {
        match self {
            Codec::Bincode => bincode::serialize(value).map_err(|e| Error::Encode(e.to_string())),
            Codec::Json => serde_json::to_vec(value).map_err(|e| Error::Encode(e.to_string())),
        }
    }

    /// Decode a value from bytes.
    pub fn decode<T>(&self, bytes: &[u8]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        match self {
            Codec::Bincode => bincode::deserialize(bytes).map_err(|e| Error::Decode(e.to_string())),
            Codec::Json => serde_json::from_slice(bytes).map_err(|e| Error::Decode(e.to_string())),
        }
    }
}
