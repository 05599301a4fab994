// Credential persistence
// Durable holder of the current access/refresh token pair

use anyhow::{Context, Result};
use dashmap::DashMap;
use rusqlite::params;
use std::path::Path;
use std::sync::Mutex;

use crate::auth::TokenPair;

/// Persisted slot for the access token
const ACCESS_KEY: &str = "news_app_access";

/// Persisted slot for the refresh token
const REFRESH_KEY: &str = "news_app_refresh";

/// Key-value space the credential store persists into.
///
/// Reads of missing keys yield `None`, never an error. Write failures are
/// a backend concern; implementations log and swallow them so the store
/// surface stays infallible.
pub trait TokenBackend: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// In-memory backend; credentials live for the process lifetime only
#[derive(Default)]
pub struct MemoryBackend {
    entries: DashMap<String, String>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenBackend for MemoryBackend {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    fn set(&self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.remove(key);
    }
}

/// SQLite-backed key-value space, a single `auth_kv` table.
/// Survives process restarts.
pub struct SqliteBackend {
    conn: Mutex<rusqlite::Connection>,
}

impl SqliteBackend {
    /// Open (or create) the credential database at the given path
    pub fn open(path: &Path) -> Result<Self> {
        let conn = rusqlite::Connection::open(path)
            .with_context(|| format!("Failed to open credential database: {}", path.display()))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS auth_kv (key TEXT PRIMARY KEY, value TEXT NOT NULL)",
            [],
        )
        .context("Failed to create auth_kv table")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl TokenBackend for SqliteBackend {
    fn get(&self, key: &str) -> Option<String> {
        let conn = self.conn.lock().ok()?;
        conn.query_row("SELECT value FROM auth_kv WHERE key = ?1", [key], |row| {
            row.get(0)
        })
        .ok()
    }

    fn set(&self, key: &str, value: &str) {
        match self.conn.lock() {
            Ok(conn) => {
                if let Err(e) = conn.execute(
                    "INSERT INTO auth_kv (key, value) VALUES (?1, ?2) \
                     ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                    params![key, value],
                ) {
                    tracing::warn!("Failed to persist credential slot {}: {}", key, e);
                }
            }
            Err(_) => tracing::warn!("Credential database lock poisoned, write skipped"),
        }
    }

    fn remove(&self, key: &str) {
        match self.conn.lock() {
            Ok(conn) => {
                if let Err(e) = conn.execute("DELETE FROM auth_kv WHERE key = ?1", [key]) {
                    tracing::warn!("Failed to clear credential slot {}: {}", key, e);
                }
            }
            Err(_) => tracing::warn!("Credential database lock poisoned, delete skipped"),
        }
    }
}

/// Durable holder of the current token pair.
///
/// The store is either empty or holds both tokens. Both slots are written
/// together; a pair with only one slot present is treated as empty on read.
pub struct CredentialStore {
    backend: Box<dyn TokenBackend>,
}

impl CredentialStore {
    pub fn new(backend: impl TokenBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    /// Store backed by process memory, for tests and ephemeral sessions
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    /// Persist both halves of the pair
    pub fn save(&self, pair: &TokenPair) {
        self.backend.set(ACCESS_KEY, &pair.access_token);
        self.backend.set(REFRESH_KEY, &pair.refresh_token);
    }

    /// Remove both slots
    pub fn clear(&self) {
        self.backend.remove(ACCESS_KEY);
        self.backend.remove(REFRESH_KEY);
    }

    /// Current access token, if any
    pub fn access(&self) -> Option<String> {
        self.backend.get(ACCESS_KEY)
    }

    /// Current refresh token, if any
    pub fn refresh(&self) -> Option<String> {
        self.backend.get(REFRESH_KEY)
    }

    /// Reconstruct the stored pair. Returns `None` unless both slots are
    /// present.
    pub fn hydrate(&self) -> Option<TokenPair> {
        let access_token = self.backend.get(ACCESS_KEY)?;
        let refresh_token = self.backend.get(REFRESH_KEY)?;
        Some(TokenPair {
            access_token,
            refresh_token,
            token_type: "bearer".to_string(),
        })
    }
}
