//! Cart line items.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{LineKey, ProductId};

/// One purchasable selection in the cart.
///
/// Serialized with camelCase names and with absent optional fields omitted,
/// so a persisted snapshot keeps `None` and `Some("")` apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    /// Product identifier.
    pub id: ProductId,
    /// Display name (informational only).
    pub name: String,
    /// Unit price at the time the item was first added.
    pub price: Decimal,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default)]
    pub sku: String,
    /// Epoch milliseconds of the most recent add or merge.
    pub added_at: i64,
}

impl CartLineItem {
    /// The identity tuple of this line.
    #[must_use]
    pub fn key(&self) -> LineKey {
        LineKey {
            id: self.id.clone(),
            size: self.size.clone(),
            color: self.color.clone(),
        }
    }

    /// Whether this line has the given identity.
    #[must_use]
    pub fn matches(&self, key: &LineKey) -> bool {
        self.id == key.id && self.size == key.size && self.color == key.color
    }

    /// `price * quantity`, saturating at `Decimal::MAX`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price.saturating_mul(Decimal::from(self.quantity))
    }
}

/// Input to an add-to-cart operation.
///
/// Same shape as [`CartLineItem`] minus the timestamp, with an optional
/// quantity that defaults to 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLineItem {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub quantity: Option<u32>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub sku: String,
}

impl NewLineItem {
    /// Create an input with no variant, no image, and the default quantity.
    #[must_use]
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: Decimal) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            quantity: None,
            image: None,
            size: None,
            color: None,
            sku: String::new(),
        }
    }

    #[must_use]
    pub const fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = Some(quantity);
        self
    }

    #[must_use]
    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    #[must_use]
    pub fn with_sku(mut self, sku: impl Into<String>) -> Self {
        self.sku = sku.into();
        self
    }

    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// The quantity to add. Absent and zero both mean 1.
    #[must_use]
    pub fn effective_quantity(&self) -> u32 {
        match self.quantity {
            Some(0) | None => 1,
            Some(quantity) => quantity,
        }
    }

    /// The identity tuple this input would merge into.
    #[must_use]
    pub fn key(&self) -> LineKey {
        LineKey {
            id: self.id.clone(),
            size: self.size.clone(),
            color: self.color.clone(),
        }
    }

    /// Turn the input into a fresh line stamped with `added_at`.
    #[must_use]
    pub fn into_line_item(self, added_at: i64) -> CartLineItem {
        let quantity = self.effective_quantity();
        CartLineItem {
            id: self.id,
            name: self.name,
            price: self.price,
            quantity,
            image: self.image,
            size: self.size,
            color: self.color,
            sku: self.sku,
            added_at,
        }
    }
}
