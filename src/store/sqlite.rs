use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use rusqlite_migration::{Migrations, M};

use crate::app::{BriefError, Result};
use crate::domain::{Collection, Item, NewItem, OrderKey, Subscription};
use crate::store::{compaction, dedup, sequencer, DeleteOutcome, Store};

const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct SqliteStore {
    conn: Mutex<Connection>,
    item_order: OrderKey,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
            item_order: OrderKey::Id,
        };
        store.run_migrations()?;
        Ok(store)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
            item_order: OrderKey::Id,
        };
        store.run_migrations()?;
        Ok(store)
    }

    /// Order applied to items whenever they are compacted.
    pub fn with_item_order(mut self, order: OrderKey) -> Self {
        self.item_order = order;
        self
    }

    pub fn item_order(&self) -> OrderKey {
        self.item_order
    }

    fn run_migrations(&self) -> Result<()> {
        let migrations = Migrations::new(vec![M::up(include_str!(
            "../../migrations/001-initial/up.sql"
        ))]);

        let mut conn = self.lock()?;
        migrations.to_latest(&mut conn)?;

        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| BriefError::Storage(format!("connection lock poisoned: {}", e)))
    }

    fn order_for(&self, collection: Collection) -> OrderKey {
        match collection {
            Collection::Items => self.item_order,
            Collection::Subscriptions => collection.default_order(),
        }
    }

    fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| s.parse::<DateTime<Utc>>().ok())
    }

    fn subscription_from_row(row: &Row) -> rusqlite::Result<Subscription> {
        Ok(Subscription {
            id: row.get(0)?,
            source_uri: row.get(1)?,
            position: row.get(2)?,
        })
    }

    fn item_from_row(row: &Row) -> rusqlite::Result<Item> {
        Ok(Item {
            id: row.get(0)?,
            source_uri: row.get(1)?,
            title: row.get(2)?,
            body: row.get(3)?,
            origin_uri: row.get(4)?,
            fetched_at: row
                .get::<_, Option<String>>(5)?
                .and_then(|s| Self::parse_datetime(&s)),
            published_at: row
                .get::<_, Option<String>>(6)?
                .and_then(|s| NaiveDate::parse_from_str(&s, DATE_FORMAT).ok()),
        })
    }
}

impl Store for SqliteStore {
    fn add_subscription(&self, source_uri: &str) -> Result<i64> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        dedup::ensure_absent(&tx, Collection::Subscriptions, source_uri)?;

        let count: i64 = tx.query_row("SELECT COUNT(*) FROM subscriptions", [], |row| {
            row.get(0)
        })?;
        tx.execute(
            "INSERT INTO subscriptions (source_uri, position) VALUES (?1, ?2)",
            params![source_uri, count + 1],
        )
        .map_err(|e| dedup::map_insert_error(e, Collection::Subscriptions, source_uri))?;
        let id = tx.last_insert_rowid();

        tx.commit()?;
        tracing::info!("Added subscription {} as ID {}", source_uri, id);
        Ok(id)
    }

    fn get_subscription(&self, id: i64) -> Result<Option<Subscription>> {
        let conn = self.lock()?;

        let result = conn
            .query_row(
                "SELECT id, source_uri, position FROM subscriptions WHERE id = ?1",
                params![id],
                Self::subscription_from_row,
            )
            .optional()?;

        Ok(result)
    }

    fn get_all_subscriptions(&self) -> Result<Vec<Subscription>> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(
            "SELECT id, source_uri, position FROM subscriptions ORDER BY position, id",
        )?;
        let subscriptions = stmt
            .query_map([], Self::subscription_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(subscriptions)
    }

    fn move_subscription(&self, from_id: i64, to_id: i64) -> Result<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        sequencer::move_to(&tx, from_id, to_id)?;
        compaction::compact(&tx, Collection::Subscriptions, OrderKey::Position)?;

        tx.commit()?;
        Ok(())
    }

    fn add_item(&self, item: &NewItem) -> Result<i64> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        dedup::ensure_absent(&tx, Collection::Items, &item.source_uri)?;

        tx.execute(
            "INSERT INTO items (source_uri, title, body, origin_uri, fetched_at, published_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                item.source_uri,
                item.title,
                item.body,
                item.origin_uri,
                item.fetched_at.map(|dt| dt.to_rfc3339()),
                item.published_at.map(|d| d.format(DATE_FORMAT).to_string()),
            ],
        )
        .map_err(|e| dedup::map_insert_error(e, Collection::Items, &item.source_uri))?;
        let id = tx.last_insert_rowid();

        tx.commit()?;
        tracing::info!("Saved item {} as ID {}", item.source_uri, id);
        Ok(id)
    }

    fn get_item(&self, id: i64) -> Result<Option<Item>> {
        let conn = self.lock()?;

        let result = conn
            .query_row(
                "SELECT id, source_uri, title, body, origin_uri, fetched_at, published_at
                 FROM items WHERE id = ?1",
                params![id],
                Self::item_from_row,
            )
            .optional()?;

        Ok(result)
    }

    fn get_all_items(&self) -> Result<Vec<Item>> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(
            "SELECT id, source_uri, title, body, origin_uri, fetched_at, published_at
             FROM items ORDER BY id",
        )?;
        let items = stmt
            .query_map([], Self::item_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(items)
    }

    fn exists(&self, collection: Collection, source_uri: &str) -> Result<bool> {
        let conn = self.lock()?;
        dedup::exists(&conn, collection, source_uri)
    }

    fn count(&self, collection: Collection) -> Result<i64> {
        let conn = self.lock()?;
        let count = conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", collection.table()),
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn delete(&self, collection: Collection, ids: &[i64]) -> Result<DeleteOutcome> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let mut outcome = DeleteOutcome::default();

        {
            let mut stmt = tx.prepare(&format!("DELETE FROM {} WHERE id = ?1", collection.table()))?;
            for &id in ids {
                if stmt.execute(params![id])? > 0 {
                    outcome.deleted.push(id);
                } else {
                    outcome.missing.push(id);
                }
            }
        }

        if !outcome.deleted.is_empty() {
            compaction::compact(&tx, collection, self.order_for(collection))?;
        }

        tx.commit()?;
        tracing::info!(
            "Deleted {} rows from {} ({} missing)",
            outcome.deleted.len(),
            collection.table(),
            outcome.missing.len()
        );
        Ok(outcome)
    }

    fn compact(&self, collection: Collection, order: OrderKey) -> Result<usize> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let count = compaction::compact(&tx, collection, order)?;
        tx.commit()?;
        Ok(count)
    }

    fn next_surrogate_hint(&self, collection: Collection) -> Result<i64> {
        let conn = self.lock()?;
        let table = collection.table();
        let next = conn.query_row(
            &format!(
                "SELECT MAX(
                    COALESCE((SELECT seq FROM sqlite_sequence WHERE name = ?1), 0),
                    COALESCE((SELECT MAX(id) FROM {table}), 0)
                 ) + 1"
            ),
            params![table],
            |row| row.get(0),
        )?;
        Ok(next)
    }
}
