pub mod error;
pub mod listing;
pub mod migrations;
pub mod models;
pub mod queries;
pub mod store;

pub use error::{Result, StoreError};
pub use store::Store;

use rusqlite::functions::FunctionFlags;
use rusqlite::{Connection, OpenFlags, Transaction};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::{debug, info};

pub const DEFAULT_READERS: usize = 4;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Unicode-aware replacement for SQLite's ASCII-only `LOWER()`.
pub const FOLD_CASE_FN: &str = "lightbnb_lower";

#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub path: PathBuf,
    pub readers: usize,
}

impl PoolConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            readers: DEFAULT_READERS,
        }
    }
}

/// Connection pool: one writer plus a round-robin set of read-only readers.
///
/// Built once at startup and handed to whoever issues queries. Each
/// connection sits behind its own mutex, so concurrent callers only contend
/// when they land on the same connection.
pub struct Database {
    writer: Mutex<Connection>,
    readers: Vec<Mutex<Connection>>,
    reader_idx: AtomicUsize,
}

impl Database {
    pub fn open(config: &PoolConfig) -> Result<Self> {
        let writer = Connection::open(&config.path)?;
        writer.busy_timeout(BUSY_TIMEOUT)?;
        register_functions(&writer)?;

        // WAL mode for concurrent reads
        let mode: String =
            writer.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        debug!("journal_mode = {}", mode);
        writer.pragma_update(None, "foreign_keys", "ON")?;

        migrations::run(&writer)?;

        let count = config.readers.max(1);
        let mut readers = Vec::with_capacity(count);
        for _ in 0..count {
            readers.push(Mutex::new(open_reader(&config.path)?));
        }

        info!(
            "Database opened at {} (1 writer + {} readers)",
            config.path.display(),
            count
        );
        Ok(Self {
            writer: Mutex::new(writer),
            readers,
            reader_idx: AtomicUsize::new(0),
        })
    }

    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let idx = self.reader_idx.fetch_add(1, Ordering::Relaxed) % self.readers.len();
        let conn = self.readers[idx]
            .lock()
            .map_err(|_| StoreError::PoolPoisoned("reader"))?;
        f(&conn)
    }

    /// Writes go through the single writer connection.
    pub fn with_conn_mut<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self
            .writer
            .lock()
            .map_err(|_| StoreError::PoolPoisoned("writer"))?;
        f(&conn)
    }

    /// Run `f` inside one writer transaction. Any error rolls back every
    /// statement `f` issued.
    pub fn with_transaction<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T>,
    {
        self.with_conn_mut(|conn| {
            let tx = conn.unchecked_transaction()?;
            let out = f(&tx)?;
            tx.commit()?;
            Ok(out)
        })
    }

    pub fn reader_count(&self) -> usize {
        self.readers.len()
    }
}

fn open_reader(path: &Path) -> Result<Connection> {
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    register_functions(&conn)?;
    Ok(conn)
}

fn register_functions(conn: &Connection) -> Result<()> {
    conn.create_scalar_function(
        FOLD_CASE_FN,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let value: Option<String> = ctx.get(0)?;
            Ok(value.map(|v| v.to_lowercase()))
        },
    )?;
    Ok(())
}
