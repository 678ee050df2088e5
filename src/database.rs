// src/database.rs

use rusqlite::{Connection, Result};

/// Creates the profile schema: one `kv` table holding JSON-serialized values
/// (the local key-value medium) and a separate `cookies` table (cookies are
/// their own medium, not part of key-value storage).
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS kv (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS cookies (
            name TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            expires_at INTEGER NOT NULL,
            same_site TEXT NOT NULL,
            secure INTEGER NOT NULL
        );
        ",
    )
}
