//! The cart store.
//!
//! Lines live in a map keyed by their `(id, size, color)` identity, with a
//! separate key list recording first-add order for display. Every mutation
//! persists a full [`CartSnapshot`] and then notifies subscribers with it.
//!
//! The store is single-threaded and synchronous: each call runs to
//! completion on the caller's thread, and persistence failures are logged
//! rather than returned.

mod clock;
mod recent;
mod snapshot;

use std::collections::HashMap;
use std::fmt;

use rust_decimal::Decimal;
use shopfront_core::{CartLineItem, CurrencyCode, LineKey, NewLineItem};
use tracing::{debug, instrument, warn};

pub use clock::{Clock, ManualClock, SystemClock};
pub use recent::RECENTLY_ADDED_LIMIT;
pub use snapshot::{CartSnapshot, SNAPSHOT_VERSION};

use crate::checkout::{CheckoutError, OrderDraft};
use crate::storage::CartStorage;
use recent::RecentlyAdded;

/// Default slot name for the persisted cart.
pub const DEFAULT_STORAGE_KEY: &str = "cart-storage";

/// Handle returned by [`CartStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&CartSnapshot)>;

/// A durable, single-client shopping cart.
pub struct CartStore<S, C = SystemClock> {
    storage: S,
    storage_key: String,
    clock: C,
    lines: HashMap<LineKey, CartLineItem>,
    order: Vec<LineKey>,
    recent: RecentlyAdded,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
    hydrated: bool,
}

impl<S: CartStorage> CartStore<S, SystemClock> {
    /// Open the cart persisted under `storage_key`, stamping lines with
    /// wall-clock time.
    pub fn open(storage: S, storage_key: impl Into<String>) -> Self {
        Self::with_clock(storage, storage_key, SystemClock)
    }
}

impl<S: CartStorage, C: Clock> CartStore<S, C> {
    /// Open the cart persisted under `storage_key` with a custom clock.
    ///
    /// A missing, unreadable, or incompatible snapshot yields an empty cart.
    pub fn with_clock(storage: S, storage_key: impl Into<String>, clock: C) -> Self {
        let mut store = Self {
            storage,
            storage_key: storage_key.into(),
            clock,
            lines: HashMap::new(),
            order: Vec::new(),
            recent: RecentlyAdded::default(),
            listeners: Vec::new(),
            next_subscription: 0,
            hydrated: false,
        };
        store.hydrate();
        store
    }

    #[instrument(skip(self), fields(key = %self.storage_key))]
    fn hydrate(&mut self) {
        match self.storage.load(&self.storage_key) {
            Ok(Some(raw)) => match CartSnapshot::decode(&raw) {
                Ok(snapshot) => self.restore(snapshot),
                Err(e) => warn!(error = %e, "Discarding unreadable cart snapshot"),
            },
            Ok(None) => debug!("No persisted cart, starting empty"),
            Err(e) => warn!(error = %e, "Failed to load cart snapshot, starting empty"),
        }
        self.hydrated = true;
    }

    fn restore(&mut self, snapshot: CartSnapshot) {
        for item in snapshot.items {
            let key = item.key();
            if self.lines.contains_key(&key) {
                warn!(line = %key, "Dropping duplicate line from persisted cart");
                continue;
            }
            self.order.push(key.clone());
            self.lines.insert(key, item);
        }
        self.recent = RecentlyAdded::from_entries(snapshot.recently_added);
        debug!(lines = self.order.len(), "Restored persisted cart");
    }

    /// Whether the initial restore from storage has run.
    #[must_use]
    pub const fn has_hydrated(&self) -> bool {
        self.hydrated
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add an item, merging into an existing line with the same identity.
    ///
    /// A merge adds to the existing quantity and refreshes `added_at`; name,
    /// price, image and sku keep their original values. A new line is
    /// appended at the end. Either way the resulting line becomes the head of
    /// the recently-added log.
    pub fn add_item(&mut self, input: NewLineItem) {
        let key = input.key();
        let quantity = input.effective_quantity();
        let now = self.clock.now_millis();

        let line = if let Some(existing) = self.lines.get_mut(&key) {
            existing.quantity = existing.quantity.saturating_add(quantity);
            existing.added_at = now;
            debug!(line = %key, quantity = existing.quantity, "Merged into cart line");
            existing.clone()
        } else {
            let line = input.into_line_item(now);
            debug!(line = %key, quantity = line.quantity, "Added cart line");
            self.order.push(key.clone());
            self.lines.insert(key, line.clone());
            line
        };

        self.recent.record(line);
        self.commit();
    }

    /// Remove the line with this identity, and its recently-added entry.
    pub fn remove_item(&mut self, key: &LineKey) {
        if self.lines.remove(key).is_some() {
            self.order.retain(|k| k != key);
            debug!(line = %key, "Removed cart line");
        }
        self.recent.purge(key);
        self.commit();
    }

    /// Set the quantity of the line with this identity.
    ///
    /// Does not touch `added_at`. Unknown identities are ignored. Zero is
    /// stored as given; callers that want a floor must enforce it.
    pub fn update_quantity(&mut self, key: &LineKey, quantity: u32) {
        match self.lines.get_mut(key) {
            Some(line) => {
                line.quantity = quantity;
                debug!(line = %key, quantity, "Updated cart line quantity");
            }
            None => debug!(line = %key, "Quantity update for unknown line ignored"),
        }
        self.commit();
    }

    /// Empty the cart and the recently-added log.
    pub fn clear_cart(&mut self) {
        self.lines.clear();
        self.order.clear();
        self.recent.clear();
        debug!("Cleared cart");
        self.commit();
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Lines in display order.
    pub fn items(&self) -> impl Iterator<Item = &CartLineItem> + '_ {
        self.order.iter().filter_map(|key| self.lines.get(key))
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.lines.values().map(|line| u64::from(line.quantity)).sum()
    }

    /// Sum of `price * quantity` across all lines, saturating at
    /// `Decimal::MAX`.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.lines
            .values()
            .map(CartLineItem::line_total)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    /// Quantity of the line with this identity, or 0.
    #[must_use]
    pub fn item_quantity(&self, key: &LineKey) -> u32 {
        self.lines.get(key).map_or(0, |line| line.quantity)
    }

    #[must_use]
    pub fn is_in_cart(&self, key: &LineKey) -> bool {
        self.lines.contains_key(key)
    }

    /// Up to `count` recently added lines, most recent first.
    ///
    /// Never returns more than [`RECENTLY_ADDED_LIMIT`] entries.
    #[must_use]
    pub fn recently_added(&self, count: usize) -> &[CartLineItem] {
        self.recent.take(count)
    }

    /// Copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            items: self.items().cloned().collect(),
            recently_added: self.recent.as_slice().to_vec(),
        }
    }

    /// Build the order payload for checkout from the current lines.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError` if the cart is empty or holds a zero-quantity
    /// line.
    pub fn checkout_draft(&self, currency: CurrencyCode) -> Result<OrderDraft, CheckoutError> {
        OrderDraft::from_items(self.items(), currency)
    }

    // =========================================================================
    // Subscriptions
    // =========================================================================

    /// Register a listener called with a fresh snapshot after every mutation.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&CartSnapshot) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    fn commit(&mut self) {
        let snapshot = self.snapshot();

        if let Err(e) = snapshot
            .encode()
            .and_then(|raw| self.storage.save(&self.storage_key, &raw))
        {
            warn!(error = %e, key = %self.storage_key, "Failed to persist cart snapshot");
        }

        for (_, listener) in &mut self.listeners {
            listener(&snapshot);
        }
    }
}

impl<S, C> fmt::Debug for CartStore<S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("storage_key", &self.storage_key)
            .field("lines", &self.order.len())
            .field("recently_added", &self.recent.as_slice().len())
            .field("listeners", &self.listeners.len())
            .field("hydrated", &self.hydrated)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests;
