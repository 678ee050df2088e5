// src/cookies.rs
//
// Cookie adapter over the profile's `cookies` table. Only used to mirror the
// current user id for correlation; never a source of truth. Same failure
// containment as the key-value side: errors are logged and read as absent.

use chrono::{Duration, Utc};
use log::debug;
use rusqlite::{params, OptionalExtension};

use crate::constants::COOKIE_MAX_AGE_DAYS;
use crate::storage::LocalStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    Lax,
    Strict,
    None,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Lax => "Lax",
            SameSite::Strict => "Strict",
            SameSite::None => "None",
        }
    }
}

pub struct CookieJar<'a> {
    store: &'a LocalStore,
}

impl<'a> CookieJar<'a> {
    pub fn new(store: &'a LocalStore) -> CookieJar<'a> {
        CookieJar { store }
    }

    /// Reads a cookie value. Expired entries read as absent.
    pub fn get(&self, name: &str) -> Option<String> {
        let now = Utc::now().timestamp();
        self.store.with_conn("cookie get", |conn| {
            conn.query_row(
                "SELECT value FROM cookies WHERE name = ? AND expires_at > ?",
                params![name, now],
                |row| row.get(0),
            )
            .optional()
        })?
    }

    /// Sets a cookie with the fixed policy: one-year expiry, SameSite=Lax,
    /// secure only in release builds (the production proxy).
    pub fn set(&self, name: &str, value: &str) {
        let expires_at = (Utc::now() + Duration::days(COOKIE_MAX_AGE_DAYS)).timestamp();
        let same_site = SameSite::Lax;
        let secure = !cfg!(debug_assertions);
        debug!(
            "[Cookie] Set \"{}\" (SameSite={}, Secure={})",
            name,
            same_site.as_str(),
            secure
        );
        self.store.with_conn("cookie set", |conn| {
            conn.execute(
                "INSERT OR REPLACE INTO cookies (name, value, expires_at, same_site, secure)
                 VALUES (?, ?, ?, ?, ?)",
                params![name, value, expires_at, same_site.as_str(), secure],
            )
            .map(|_| ())
        });
    }

    pub fn remove(&self, name: &str) {
        self.store.with_conn("cookie remove", |conn| {
            conn.execute("DELETE FROM cookies WHERE name = ?", [name])
                .map(|_| ())
        });
    }
}
