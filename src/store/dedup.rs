//! Natural-key uniqueness per collection.
//!
//! `source_uri` carries a `UNIQUE` constraint in both tables; the checks here
//! turn a collision into [`BriefError::DuplicateKey`] instead of a storage
//! failure.

use rusqlite::{params, Connection, ErrorCode};

use crate::app::{BriefError, Result};
use crate::domain::Collection;

pub(crate) fn exists(conn: &Connection, collection: Collection, source_uri: &str) -> Result<bool> {
    let count: i64 = conn.query_row(
        &format!(
            "SELECT COUNT(*) FROM {} WHERE source_uri = ?1",
            collection.table()
        ),
        params![source_uri],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Fail with `DuplicateKey` if `source_uri` is already stored.
pub(crate) fn ensure_absent(conn: &Connection, collection: Collection, source_uri: &str) -> Result<()> {
    if exists(conn, collection, source_uri)? {
        return Err(duplicate(collection, source_uri));
    }
    Ok(())
}

/// Translate a unique violation on `source_uri` into `DuplicateKey`; any
/// other error passes through as a storage failure.
pub(crate) fn map_insert_error(err: rusqlite::Error, collection: Collection, source_uri: &str) -> BriefError {
    match &err {
        rusqlite::Error::SqliteFailure(e, Some(msg))
            if e.code == ErrorCode::ConstraintViolation && msg.contains(".source_uri") =>
        {
            duplicate(collection, source_uri)
        }
        _ => BriefError::Database(err),
    }
}

fn duplicate(collection: Collection, source_uri: &str) -> BriefError {
    BriefError::DuplicateKey {
        collection,
        uri: source_uri.to_string(),
    }
}
