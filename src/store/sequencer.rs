//! Subscription position moves.

use rusqlite::{params, OptionalExtension, Transaction};

use crate::app::{BriefError, Result};
use crate::domain::Collection;

/// Position a row is parked at while its neighbours shift. Outside `1..=N`
/// and outside the negative scratch range.
const PARKED: i64 = 0;

/// Move the subscription `from_id` to the position currently held by
/// `to_id`. Rows in between shift one slot toward the vacated position.
///
/// Leaves positions dense; ids are realigned by the caller's compaction.
pub(crate) fn move_to(tx: &Transaction<'_>, from_id: i64, to_id: i64) -> Result<()> {
    let from = position_of(tx, from_id)?;
    let to = position_of(tx, to_id)?;

    if from == to {
        return Ok(());
    }

    tx.execute(
        "UPDATE subscriptions SET position = ?1 WHERE id = ?2",
        params![PARKED, from_id],
    )?;

    if from < to {
        tx.execute(
            "UPDATE subscriptions SET position = -(position - 1)
             WHERE position > ?1 AND position <= ?2",
            params![from, to],
        )?;
    } else {
        tx.execute(
            "UPDATE subscriptions SET position = -(position + 1)
             WHERE position >= ?1 AND position < ?2",
            params![to, from],
        )?;
    }
    tx.execute(
        "UPDATE subscriptions SET position = -position WHERE position < 0",
        [],
    )?;

    tx.execute(
        "UPDATE subscriptions SET position = ?1 WHERE id = ?2",
        params![to, from_id],
    )?;

    tracing::debug!("Moved subscription {} from position {} to {}", from_id, from, to);
    Ok(())
}

fn position_of(tx: &Transaction<'_>, id: i64) -> Result<i64> {
    tx.query_row(
        "SELECT position FROM subscriptions WHERE id = ?1",
        params![id],
        |row| row.get(0),
    )
    .optional()?
    .ok_or(BriefError::UnknownIdentifier {
        collection: Collection::Subscriptions,
        id,
    })
}
