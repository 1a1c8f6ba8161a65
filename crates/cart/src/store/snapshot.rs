//! Persisted cart snapshot format.
//!
//! The slot holds a versioned envelope:
//!
//! ```json
//! {"state": {"items": [...], "recentlyAdded": [...]}, "version": 0}
//! ```

use serde::{Deserialize, Serialize};
use shopfront_core::CartLineItem;

use crate::error::StorageError;

/// Schema version written into every envelope.
pub const SNAPSHOT_VERSION: u32 = 0;

/// Point-in-time copy of the cart state, handed to subscribers and persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    /// Lines in display order.
    #[serde(default)]
    pub items: Vec<CartLineItem>,
    /// Most-recent-first.
    #[serde(default)]
    pub recently_added: Vec<CartLineItem>,
}

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    state: &'a CartSnapshot,
    version: u32,
}

#[derive(Deserialize)]
struct Envelope {
    state: CartSnapshot,
    #[serde(default)]
    version: u32,
}

impl CartSnapshot {
    /// Serialize into the persisted envelope.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if encoding fails.
    pub fn encode(&self) -> Result<String, StorageError> {
        Ok(serde_json::to_string(&EnvelopeRef {
            state: self,
            version: SNAPSHOT_VERSION,
        })?)
    }

    /// Parse a persisted envelope.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` for malformed input and
    /// `StorageError::VersionMismatch` for envelopes from another schema.
    pub fn decode(raw: &str) -> Result<Self, StorageError> {
        let envelope: Envelope = serde_json::from_str(raw)?;
        if envelope.version != SNAPSHOT_VERSION {
            return Err(StorageError::VersionMismatch {
                found: envelope.version,
                expected: SNAPSHOT_VERSION,
            });
        }
        Ok(envelope.state)
    }
}
