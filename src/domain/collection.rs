use std::fmt;

use serde::{Deserialize, Serialize};

/// The two collections the store owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Subscriptions,
    Items,
}

impl Collection {
    pub fn table(self) -> &'static str {
        match self {
            Collection::Subscriptions => "subscriptions",
            Collection::Items => "items",
        }
    }

    /// Order key used when this collection is compacted.
    pub fn default_order(self) -> OrderKey {
        match self {
            Collection::Subscriptions => OrderKey::Position,
            Collection::Items => OrderKey::Id,
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Collection::Subscriptions => write!(f, "RSS feed"),
            Collection::Items => write!(f, "article"),
        }
    }
}

/// Ordering applied when surrogate ids are reassigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderKey {
    /// Keep the prior id order.
    #[default]
    Id,
    /// Oldest publication first, undated rows last.
    Published,
    /// Subscription position.
    Position,
}

impl OrderKey {
    /// `ORDER BY` clause for the given collection. Ties always fall back to
    /// the prior id so compaction is deterministic.
    pub fn order_clause(self, collection: Collection) -> &'static str {
        match (self, collection) {
            (OrderKey::Published, Collection::Items) => {
                "published_at IS NULL, published_at ASC, id ASC"
            }
            (OrderKey::Position, Collection::Subscriptions) => "position ASC, id ASC",
            _ => "id ASC",
        }
    }
}
