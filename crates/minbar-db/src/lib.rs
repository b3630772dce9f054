pub mod demo;
pub mod migrations;
pub mod queries;
pub mod storage;

use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Result;
use rusqlite::Connection;
use tracing::{info, warn};

pub use storage::{Storage, StorageStatus};

/// Environment variables checked for the database location, in order.
/// First non-empty value wins.
const DATABASE_URL_VARS: [&str; 2] = ["MINBAR_DATABASE_URL", "DATABASE_URL"];

/// How long a statement waits on a locked database before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_millis(2000);

pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;

        // WAL mode for concurrent reads
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.busy_timeout(BUSY_TIMEOUT)?;

        migrations::run(&conn)?;

        info!("Database opened at {}", path.display());
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|e| anyhow::anyhow!("DB lock poisoned: {}", e))?;
        f(&conn)
    }
}

/// Connection provisioner: a single attempt at startup, no retries.
///
/// Returns `None` when no database location is configured — the caller runs
/// the storage layer in demo mode for the rest of the process lifetime. A
/// configured but unopenable database is a hard error; query failures after
/// a successful open are handled per call by [`Storage`].
pub fn connect() -> Result<Option<Database>> {
    let url = DATABASE_URL_VARS
        .iter()
        .find_map(|var| std::env::var(var).ok().filter(|v| !v.is_empty()));

    match url {
        Some(url) => {
            info!("Connecting to database at {}", url);
            Ok(Some(Database::open(Path::new(&url))?))
        }
        None => {
            warn!(
                "No {} or {} set - running in demo mode",
                DATABASE_URL_VARS[0], DATABASE_URL_VARS[1]
            );
            Ok(None)
        }
    }
}
