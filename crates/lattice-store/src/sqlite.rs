//! SQLite implementation of the LedgerStore trait.
//!
//! This is the primary storage backend for the lattice ledger. It uses
//! rusqlite with bundled SQLite behind a connection mutex; every call is
//! synchronous, so a mutation is durably visible to the next lookup as
//! soon as the call returns.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection, OptionalExtension};

use lattice_core::{canonical_bytes, decode_block, Block, BlockHash};

use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::{InsertOutcome, LedgerStore};

/// SQLite-based ledger implementation.
///
/// Thread-safe via an internal Mutex on the connection.
pub struct SqliteLedger {
    conn: Mutex<Connection>,
}

impl SqliteLedger {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path.as_ref())?;
        migration::migrate(&mut conn)?;
        tracing::debug!(path = %path.as_ref().display(), "opened ledger database");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Execute an operation on the locked connection.
    fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.conn.lock().map_err(|e| {
            StoreError::Database(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_LOCKED),
                Some(format!("mutex poisoned: {}", e)),
            ))
        })?;
        f(&conn)
    }

    fn block_put(&self, table: &str, hash: &BlockHash, block: &Block) -> Result<InsertOutcome> {
        self.with_conn(|conn| {
            let existing: Option<Vec<u8>> = conn
                .query_row(
                    &format!("SELECT hash FROM {} WHERE hash = ?1", table),
                    params![hash.as_bytes().as_slice()],
                    |row| row.get(0),
                )
                .optional()?;

            if existing.is_some() {
                return Ok(InsertOutcome::AlreadyExists);
            }

            let bytes = canonical_bytes(block);
            conn.execute(
                &format!(
                    "INSERT INTO {} (hash, kind, previous, source, bytes, stored_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    table
                ),
                params![
                    hash.as_bytes().as_slice(),
                    block.kind().to_u8(),
                    block.previous().map(|h| h.0.to_vec()),
                    block.source().map(|h| h.0.to_vec()),
                    bytes,
                    now_millis(),
                ],
            )?;

            Ok(InsertOutcome::Inserted)
        })
    }

    fn block_get(&self, table: &str, hash: &BlockHash) -> Result<Option<Block>> {
        self.with_conn(|conn| {
            let bytes: Option<Vec<u8>> = conn
                .query_row(
                    &format!("SELECT bytes FROM {} WHERE hash = ?1", table),
                    params![hash.as_bytes().as_slice()],
                    |row| row.get(0),
                )
                .optional()?;

            match bytes {
                Some(bytes) => Ok(Some(decode_block(&bytes)?)),
                None => Ok(None),
            }
        })
    }

    fn block_contains(&self, table: &str, hash: &BlockHash) -> Result<bool> {
        self.with_conn(|conn| {
            let found: Option<i64> = conn
                .query_row(
                    &format!("SELECT 1 FROM {} WHERE hash = ?1", table),
                    params![hash.as_bytes().as_slice()],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(found.is_some())
        })
    }

    fn block_count(&self, table: &str) -> Result<u64> {
        self.with_conn(|conn| {
            let count: i64 =
                conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
                    row.get(0)
                })?;
            Ok(count as u64)
        })
    }
}

impl LedgerStore for SqliteLedger {
    fn canonical_put(&self, hash: &BlockHash, block: &Block) -> Result<InsertOutcome> {
        self.block_put("canonical_blocks", hash, block)
    }

    fn canonical_get(&self, hash: &BlockHash) -> Result<Option<Block>> {
        self.block_get("canonical_blocks", hash)
    }

    fn canonical_contains(&self, hash: &BlockHash) -> Result<bool> {
        self.block_contains("canonical_blocks", hash)
    }

    fn canonical_count(&self) -> Result<u64> {
        self.block_count("canonical_blocks")
    }

    fn staged_put(&self, hash: &BlockHash, block: &Block) -> Result<InsertOutcome> {
        self.block_put("staged_blocks", hash, block)
    }

    fn staged_get(&self, hash: &BlockHash) -> Result<Option<Block>> {
        self.block_get("staged_blocks", hash)
    }

    fn staged_contains(&self, hash: &BlockHash) -> Result<bool> {
        self.block_contains("staged_blocks", hash)
    }

    fn staged_remove(&self, hash: &BlockHash) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "DELETE FROM staged_blocks WHERE hash = ?1",
                params![hash.as_bytes().as_slice()],
            )?;
            Ok(())
        })
    }

    fn staged_count(&self) -> Result<u64> {
        self.block_count("staged_blocks")
    }

    fn unsynced_mark(&self, hash: &BlockHash) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT OR IGNORE INTO unsynced (hash, marked_at) VALUES (?1, ?2)",
                params![hash.as_bytes().as_slice(), now_millis()],
            )?;
            Ok(())
        })
    }

    fn unsynced_clear(&self, hash: &BlockHash) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "DELETE FROM unsynced WHERE hash = ?1",
                params![hash.as_bytes().as_slice()],
            )?;
            Ok(())
        })
    }

    fn unsynced_contains(&self, hash: &BlockHash) -> Result<bool> {
        self.with_conn(|conn| {
            let found: Option<i64> = conn
                .query_row(
                    "SELECT 1 FROM unsynced WHERE hash = ?1",
                    params![hash.as_bytes().as_slice()],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(found.is_some())
        })
    }

    fn unsynced_count(&self) -> Result<u64> {
        self.with_conn(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM unsynced", [], |row| row.get(0))?;
            Ok(count as u64)
        })
    }
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
    use lattice_core::{
        Amount, AccountId, ChangeBlock, Keypair, OpenBlock, ReceiveBlock, SendBlock,
    };

    fn sample_blocks() -> Vec<Block> {
        let keypair = Keypair::from_seed(&[0x42; 32]);
        let prev = BlockHash::from_bytes([0x10; 32]);
        let src = BlockHash::from_bytes([0x20; 32]);
        let mut blocks: Vec<Block> = vec![
            SendBlock::new(prev, AccountId::from_bytes([0xaa; 32]), Amount(9)).into(),
            ReceiveBlock::new(prev, src).into(),
            OpenBlock::new(src, AccountId::from_bytes([0xbb; 32]), keypair.account()).into(),
            ChangeBlock::new(prev, AccountId::from_bytes([0xcc; 32])).into(),
        ];
        for block in &mut blocks {
            block.sign(&keypair);
        }
        blocks
    }

    #[test]
    fn test_canonical_roundtrip_all_kinds() {
        let store = SqliteLedger::open_memory().unwrap();
        for block in sample_blocks() {
            let hash = block.hash();
            assert_eq!(
                store.canonical_put(&hash, &block).unwrap(),
                InsertOutcome::Inserted
            );
            assert_eq!(store.canonical_get(&hash).unwrap(), Some(block));
        }
        assert_eq!(store.canonical_count().unwrap(), 4);
    }

    #[test]
    fn test_canonical_put_idempotent() {
        let store = SqliteLedger::open_memory().unwrap();
        let block = sample_blocks().remove(0);
        let hash = block.hash();

        assert_eq!(
            store.canonical_put(&hash, &block).unwrap(),
            InsertOutcome::Inserted
        );
        assert_eq!(
            store.canonical_put(&hash, &block).unwrap(),
            InsertOutcome::AlreadyExists
        );
        assert_eq!(store.canonical_count().unwrap(), 1);
    }

    #[test]
    fn test_staged_roundtrip_and_remove() {
        let store = SqliteLedger::open_memory().unwrap();
        let block = sample_blocks().remove(1);
        let hash = block.hash();

        store.staged_put(&hash, &block).unwrap();
        assert!(store.staged_contains(&hash).unwrap());
        assert_eq!(store.staged_get(&hash).unwrap(), Some(block));

        store.staged_remove(&hash).unwrap();
        assert!(!store.staged_contains(&hash).unwrap());
        assert_eq!(store.staged_count().unwrap(), 0);
    }

    #[test]
    fn test_unsynced_mark_clear() {
        let store = SqliteLedger::open_memory().unwrap();
        let hash = BlockHash::from_bytes([0x55; 32]);

        store.unsynced_mark(&hash).unwrap();
        assert!(store.unsynced_contains(&hash).unwrap());

        // Marking twice is harmless
        store.unsynced_mark(&hash).unwrap();
        assert_eq!(store.unsynced_count().unwrap(), 1);

        store.unsynced_clear(&hash).unwrap();
        assert!(!store.unsynced_contains(&hash).unwrap());
        assert_eq!(store.unsynced_count().unwrap(), 0);
    }

    #[test]
    fn test_open_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.db");

        let block = sample_blocks().remove(0);
        let hash = block.hash();

        {
            let store = SqliteLedger::open(&path).unwrap();
            store.canonical_put(&hash, &block).unwrap();
        }

        // Reopen and verify persistence
        let store = SqliteLedger::open(&path).unwrap();
        assert_eq!(store.canonical_get(&hash).unwrap(), Some(block));
    }
}
