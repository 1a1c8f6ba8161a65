//! Bounded most-recent-first log of added lines.

use shopfront_core::{CartLineItem, LineKey};

/// Maximum number of entries kept in the recently-added log.
pub const RECENTLY_ADDED_LIMIT: usize = 3;

/// Most-recent-first, deduplicated by line identity, never longer than
/// [`RECENTLY_ADDED_LIMIT`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct RecentlyAdded {
    entries: Vec<CartLineItem>,
}

impl RecentlyAdded {
    /// Rebuild from persisted entries, enforcing the dedup and length rules.
    pub(crate) fn from_entries(entries: Vec<CartLineItem>) -> Self {
        let mut log = Self::default();
        for entry in entries {
            let key = entry.key();
            if log.entries.len() < RECENTLY_ADDED_LIMIT
                && !log.entries.iter().any(|e| e.matches(&key))
            {
                log.entries.push(entry);
            }
        }
        log
    }

    pub(crate) fn record(&mut self, item: CartLineItem) {
        let key = item.key();
        self.purge(&key);
        self.entries.insert(0, item);
        self.entries.truncate(RECENTLY_ADDED_LIMIT);
    }

    pub(crate) fn purge(&mut self, key: &LineKey) {
        self.entries.retain(|entry| !entry.matches(key));
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    /// The first `count` entries.
    pub(crate) fn take(&self, count: usize) -> &[CartLineItem] {
        let end = count.min(self.entries.len());
        self.entries.get(..end).unwrap_or_default()
    }

    pub(crate) fn as_slice(&self) -> &[CartLineItem] {
        &self.entries
    }
}
