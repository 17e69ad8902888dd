//! Database schema migrations for SQLite.
//!
//! We use a simple versioned migration system. Each migration is a SQL string
//! that transforms the schema from version N to N+1.

use rusqlite::Connection;

use crate::error::{Result, StoreError};

/// Current schema version.
pub const CURRENT_VERSION: u32 = 1;

/// Initialize or migrate the database schema.
///
/// This function is idempotent - it can be called multiple times safely.
pub fn migrate(conn: &mut Connection) -> Result<()> {
    // Create migrations table if it doesn't exist
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at INTEGER NOT NULL
        )",
        [],
    )?;

    // Get current version
    let current: u32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);

    // Apply migrations
    if current < CURRENT_VERSION {
        let tx = conn.transaction()?;

        for version in (current + 1)..=CURRENT_VERSION {
            apply_migration(&tx, version)?;

            tx.execute(
                "INSERT INTO schema_migrations (version, applied_at) VALUES (?1, ?2)",
                rusqlite::params![version, now_millis()],
            )?;
        }

        tx.commit()?;
    }

    Ok(())
}

/// Apply a specific migration version.
fn apply_migration(conn: &Connection, version: u32) -> Result<()> {
    match version {
        1 => apply_v1(conn),
        _ => Err(StoreError::Migration(format!(
            "unknown migration version: {}",
            version
        ))),
    }
}

/// Migration v1: Initial schema.
fn apply_v1(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- Canonical collection: blocks the node treats as integrated
        CREATE TABLE canonical_blocks (
            hash BLOB PRIMARY KEY,            -- 32 bytes, Blake3 of hashable bytes
            kind INTEGER NOT NULL,            -- BlockKind as u8
            previous BLOB,                    -- 32 bytes, NULL for open blocks
            source BLOB,                      -- 32 bytes, NULL for send/change
            bytes BLOB NOT NULL,              -- full canonical encoding
            stored_at INTEGER NOT NULL        -- local timestamp (Unix ms)
        );

        -- Staged collection: out-of-order blocks awaiting ancestry
        CREATE TABLE staged_blocks (
            hash BLOB PRIMARY KEY,
            kind INTEGER NOT NULL,
            previous BLOB,
            source BLOB,
            bytes BLOB NOT NULL,
            stored_at INTEGER NOT NULL
        );

        -- Unsynced marker set: canonical hashes not yet transmitted
        CREATE TABLE unsynced (
            hash BLOB PRIMARY KEY,
            marked_at INTEGER NOT NULL
        );

        -- Indexes for dependency lookups
        CREATE INDEX idx_canonical_previous ON canonical_blocks(previous);
        CREATE INDEX idx_canonical_source ON canonical_blocks(source);
        CREATE INDEX idx_staged_previous ON staged_blocks(previous);
        CREATE INDEX idx_staged_source ON staged_blocks(source);
        "#,
    )?;

    Ok(())
}

/// Get current time in milliseconds.
fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_millis() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migration_creates_tables() {
        let mut conn = Connection::open_in_memory().unwrap();
        migrate(&mut conn).unwrap();

        // Verify tables exist
        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap();

        assert!(tables.contains(&"canonical_blocks".to_string()));
        assert!(tables.contains(&"staged_blocks".to_string()));
        assert!(tables.contains(&"unsynced".to_string()));
        assert!(tables.contains(&"schema_migrations".to_string()));
    }

    #[test]
    fn test_migration_idempotent() {
        let mut conn = Connection::open_in_memory().unwrap();
        migrate(&mut conn).unwrap();
        migrate(&mut conn).unwrap(); // Should not error
        migrate(&mut conn).unwrap(); // Still should not error

        // Verify version is 1
        let version: u32 = conn
            .query_row(
                "SELECT MAX(version) FROM schema_migrations",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(version, 1);
    }
}
