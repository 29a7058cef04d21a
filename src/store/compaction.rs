//! Identifier compaction.
//!
//! Renumbering in place can collide on the primary key half way through, so
//! rows are first moved into the scratch range (negated ids, disjoint from
//! `1..=N`) and only then assigned their final ids one by one.

use rusqlite::{params, Transaction};

use crate::app::Result;
use crate::domain::{Collection, OrderKey};

/// Reassign ids `1..=N` to the rows of `collection` in `order`, then reset
/// the AUTOINCREMENT counter. Returns N.
pub(crate) fn compact(tx: &Transaction<'_>, collection: Collection, order: OrderKey) -> Result<usize> {
    if collection == Collection::Subscriptions {
        densify_positions(tx)?;
    }

    let table = collection.table();
    let ordered = ordered_ids(tx, table, order.order_clause(collection))?;

    tx.execute(&format!("UPDATE {table} SET id = -id"), [])?;
    {
        let mut stmt = tx.prepare(&format!("UPDATE {table} SET id = ?1 WHERE id = ?2"))?;
        for (index, old_id) in ordered.iter().enumerate() {
            stmt.execute(params![index as i64 + 1, -old_id])?;
        }
    }

    reset_sequence(tx, table, ordered.len() as i64)?;

    tracing::debug!("Compacted {} ({} rows, order {:?})", table, ordered.len(), order);
    Ok(ordered.len())
}

/// Close gaps in subscription positions, keeping their relative order.
fn densify_positions(tx: &Transaction<'_>) -> Result<()> {
    let ordered = ordered_ids(tx, "subscriptions", "position ASC, id ASC")?;

    tx.execute("UPDATE subscriptions SET position = -position", [])?;
    let mut stmt = tx.prepare("UPDATE subscriptions SET position = ?1 WHERE id = ?2")?;
    for (index, id) in ordered.iter().enumerate() {
        stmt.execute(params![index as i64 + 1, id])?;
    }

    Ok(())
}

fn ordered_ids(tx: &Transaction<'_>, table: &str, order_clause: &str) -> Result<Vec<i64>> {
    let mut stmt = tx.prepare(&format!("SELECT id FROM {table} ORDER BY {order_clause}"))?;
    let ids = stmt
        .query_map([], |row| row.get(0))?
        .collect::<std::result::Result<Vec<i64>, _>>()?;
    Ok(ids)
}

/// Point the AUTOINCREMENT counter at the last visible id so the next insert
/// gets `N + 1`. With no rows left the counter is dropped entirely.
fn reset_sequence(tx: &Transaction<'_>, table: &str, count: i64) -> Result<()> {
    if count == 0 {
        tx.execute("DELETE FROM sqlite_sequence WHERE name = ?1", params![table])?;
    } else {
        tx.execute(
            "UPDATE sqlite_sequence SET seq = ?1 WHERE name = ?2",
            params![count, table],
        )?;
    }
    Ok(())
}
