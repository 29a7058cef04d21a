mod compaction;
mod dedup;
mod sequencer;
pub mod sqlite;

use crate::app::Result;
use crate::domain::{Collection, Item, NewItem, OrderKey, Subscription};

pub use sqlite::SqliteStore;

/// Result of a batch delete.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteOutcome {
    /// Ids that existed and were removed, in the order they were requested.
    pub deleted: Vec<i64>,
    /// Ids that were not present.
    pub missing: Vec<i64>,
}

/// Persistent record of subscriptions and items.
///
/// Every completed mutation leaves each collection with ids `1..=N`, and
/// subscriptions additionally with positions `1..=N`.
pub trait Store {
    // Subscription operations
    fn add_subscription(&self, source_uri: &str) -> Result<i64>;
    fn get_subscription(&self, id: i64) -> Result<Option<Subscription>>;
    fn get_all_subscriptions(&self) -> Result<Vec<Subscription>>;
    fn move_subscription(&self, from_id: i64, to_id: i64) -> Result<()>;

    // Item operations
    fn add_item(&self, item: &NewItem) -> Result<i64>;
    fn get_item(&self, id: i64) -> Result<Option<Item>>;
    fn get_all_items(&self) -> Result<Vec<Item>>;

    // Collection operations
    fn exists(&self, collection: Collection, source_uri: &str) -> Result<bool>;
    fn count(&self, collection: Collection) -> Result<i64>;
    fn delete(&self, collection: Collection, ids: &[i64]) -> Result<DeleteOutcome>;
    fn compact(&self, collection: Collection, order: OrderKey) -> Result<usize>;
    fn next_surrogate_hint(&self, collection: Collection) -> Result<i64>;
}
