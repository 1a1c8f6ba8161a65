//! Product ids and the line identity tuple.
//!
//! Product ids are assigned by the catalog backend and treated as opaque
//! keys: the cart never validates them, it only compares them.

use core::fmt;

use serde::{Deserialize, Serialize};

/// An externally assigned product identifier.
///
/// The catalog hands out both numeric and string ids, so both are accepted.
/// Integer `1` and string `"1"` are different ids.
///
/// ```
/// use shopfront_core::ProductId;
///
/// assert_ne!(ProductId::from(1), ProductId::from("1"));
/// assert_eq!(ProductId::from("sku-42").to_string(), "sku-42");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductId {
    /// Numeric id.
    Int(i64),
    /// String id (handles, GIDs, slugs).
    Str(String),
}

impl ProductId {
    /// Parse a command-line or form value.
    ///
    /// Values that parse as integers become [`ProductId::Int`], everything
    /// else is kept verbatim.
    #[must_use]
    pub fn parse_lenient(s: &str) -> Self {
        s.parse::<i64>().map_or_else(|_| Self::Str(s.to_owned()), Self::Int)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(id) => write!(f, "{id}"),
            Self::Str(id) => write!(f, "{id}"),
        }
    }
}

impl From<i64> for ProductId {
    fn from(id: i64) -> Self {
        Self::Int(id)
    }
}

impl From<i32> for ProductId {
    fn from(id: i32) -> Self {
        Self::Int(i64::from(id))
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self::Str(id.to_owned())
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self::Str(id)
    }
}

/// The `(id, size, color)` identity of a cart line.
///
/// Two lines are the same entity iff all three components match exactly.
/// An absent variant and an empty-string variant are different.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LineKey {
    pub id: ProductId,
    pub size: Option<String>,
    pub color: Option<String>,
}

impl LineKey {
    /// Create a key from its parts.
    #[must_use]
    pub fn new(id: impl Into<ProductId>, size: Option<&str>, color: Option<&str>) -> Self {
        Self {
            id: id.into(),
            size: size.map(str::to_owned),
            color: color.map(str::to_owned),
        }
    }
}

impl fmt::Display for LineKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)?;
        if let Some(size) = &self.size {
            write!(f, " / {size}")?;
        }
        if let Some(color) = &self.color {
            write!(f, " / {color}")?;
        }
        Ok(())
    }
}
