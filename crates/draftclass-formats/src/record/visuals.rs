//! Character visuals sub-block
//!
//! The first 4096 bytes of every prospect record hold a JSON document
//! describing the character's appearance, null-padded to the slot width.
//! The document is kept as a [`serde_json::Value`] and is not decomposed
//! further.

use crate::cursor::{ByteWriter, until_nul};
use crate::error::Result;
use crate::record::VISUALS_SIZE;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// What to do when a visuals block is not valid JSON
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VisualsPolicy {
    /// Abort the decode with `MalformedVisualsBlock`
    #[default]
    Strict,
    /// Keep the raw slot bytes and record a diagnostic
    Lenient,
}

/// Decoded visuals payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Visuals {
    /// Parsed JSON document
    Structured(Value),
    /// Raw slot bytes that did not parse; written back unchanged
    Opaque(Vec<u8>),
}

impl Default for Visuals {
    fn default() -> Self {
        Self::Structured(Value::Object(serde_json::Map::new()))
    }
}

impl Visuals {
    /// Parse the contents of a visuals slot
    ///
    /// Text ends at the first NUL byte.
    pub fn parse(slot: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(until_nul(slot)).map(Self::Structured)
    }

    /// Parsed document, if the block was valid JSON
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Structured(value) => Some(value),
            Self::Opaque(_) => None,
        }
    }

    /// Whether the block was kept as raw bytes
    pub fn is_opaque(&self) -> bool {
        matches!(self, Self::Opaque(_))
    }

    /// Bytes stored in the slot before padding
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        match self {
            Self::Structured(value) => Ok(serde_json::to_vec(value)?),
            Self::Opaque(raw) => Ok(raw.clone()),
        }
    }

    /// Append the visuals slot to `writer`
    ///
    /// Fails with `FieldTooLong` if the serialized text exceeds 4096 bytes.
    pub fn write(&self, writer: &mut ByteWriter) -> Result<()> {
        writer.write_fixed_bytes("visuals", &self.to_bytes()?, VISUALS_SIZE)
    }
}

// Structured visuals export as the document itself, opaque ones as a hex
// string. Real visuals documents are JSON objects, never bare strings.
impl Serialize for Visuals {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Structured(value) => value.serialize(serializer),
            Self::Opaque(raw) => serializer.serialize_str(&hex::encode(raw)),
        }
    }
}

impl<'de> Deserialize<'de> for Visuals {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::String(encoded) => hex::decode(&encoded)
                .map(Self::Opaque)
                .map_err(D::Error::custom),
            other => Ok(Self::Structured(other)),
        }
    }
}
