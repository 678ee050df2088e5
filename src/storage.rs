// src/storage.rs
//
// Persistence adapter over the profile database. Single point of contact
// with the medium: every domain store reads and writes through here.
//
// Failure containment: no error leaves this module. A missing medium, an SQL
// failure or a malformed stored value is logged and degrades to `None` (or a
// silent no-op for writes). Callers never see an error type.

use log::{debug, error};
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use std::sync::Mutex;

use crate::database;

pub struct LocalStore {
    conn: Option<Mutex<Connection>>,
}

impl LocalStore {
    /// Opens (or creates) the profile database at `path`. When the medium
    /// cannot be opened the store still constructs, as a disabled store
    /// whose operations are all no-ops.
    pub fn open<P: AsRef<Path>>(path: P) -> LocalStore {
        let path = path.as_ref();
        match Connection::open(path) {
            Ok(conn) => match database::init_schema(&conn) {
                Ok(()) => {
                    debug!("[KV] Opened profile store at {:?}", path);
                    LocalStore {
                        conn: Some(Mutex::new(conn)),
                    }
                }
                Err(e) => {
                    error!("[KV] Schema init failed for {:?}: {}", path, e);
                    LocalStore::disabled()
                }
            },
            Err(e) => {
                error!("[KV] Cannot open profile store at {:?}: {}", path, e);
                LocalStore::disabled()
            }
        }
    }

    /// Profile store backed by an in-memory database. Used by tests and
    /// ephemeral contexts; contents vanish on drop.
    pub fn open_in_memory() -> LocalStore {
        match Connection::open_in_memory() {
            Ok(conn) => match database::init_schema(&conn) {
                Ok(()) => LocalStore {
                    conn: Some(Mutex::new(conn)),
                },
                Err(e) => {
                    error!("[KV] Schema init failed for in-memory store: {}", e);
                    LocalStore::disabled()
                }
            },
            Err(e) => {
                error!("[KV] Cannot open in-memory store: {}", e);
                LocalStore::disabled()
            }
        }
    }

    /// A store with no medium at all. Reads yield `None`, writes are no-ops.
    pub fn disabled() -> LocalStore {
        LocalStore { conn: None }
    }

    pub fn is_disabled(&self) -> bool {
        self.conn.is_none()
    }

    pub(crate) fn with_conn<T>(
        &self,
        op: &str,
        f: impl FnOnce(&Connection) -> rusqlite::Result<T>,
    ) -> Option<T> {
        let conn = self.conn.as_ref()?;
        let guard = match conn.lock() {
            Ok(guard) => guard,
            Err(e) => {
                error!("[KV] Connection lock poisoned during {}: {}", op, e);
                return None;
            }
        };
        match f(&guard) {
            Ok(value) => Some(value),
            Err(e) => {
                error!("[KV] {} failed: {}", op, e);
                None
            }
        }
    }

    /// Reads and deserializes the value under `key`. Absent key, disabled
    /// medium and malformed stored JSON all read as `None`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw: String = self.with_conn("get", |conn| {
            conn.query_row("SELECT value FROM kv WHERE key = ?", [key], |row| {
                row.get(0)
            })
            .optional()
        })??;

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                error!("[KV] Malformed value under key \"{}\": {}", key, e);
                None
            }
        }
    }

    /// Serializes `value` and replaces whatever is stored under `key`.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                error!("[KV] Cannot serialize value for key \"{}\": {}", key, e);
                return;
            }
        };
        self.with_conn("set", |conn| {
            conn.execute(
                "INSERT OR REPLACE INTO kv (key, value) VALUES (?, ?)",
                params![key, json],
            )
            .map(|_| ())
        });
    }

    pub fn remove(&self, key: &str) {
        self.with_conn("remove", |conn| {
            conn.execute("DELETE FROM kv WHERE key = ?", [key]).map(|_| ())
        });
    }

    /// Drops every key-value entry. Cookies are a separate medium and are
    /// not touched.
    pub fn clear(&self) {
        self.with_conn("clear", |conn| {
            conn.execute("DELETE FROM kv", []).map(|_| ())
        });
    }
}
