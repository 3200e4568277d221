// src/session/store.rs

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use crate::config::{SESSION_KEY_DIGEST_LEN, SESSION_KEY_NAMESPACE, SESSION_KEY_PREFIX_LEN};

/// Per-device key-value storage for session state.
///
/// Access is synchronous; callers read before they write.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
}

/// Storage key for a token: a bounded prefix plus a short digest of the whole token.
///
/// Tokens sharing a prefix still get their own key.
pub fn session_key(token: &str) -> String {
    let token = token.trim();
    let prefix: String = token.chars().take(SESSION_KEY_PREFIX_LEN).collect();
    let digest = format!("{:x}", Sha256::digest(token.as_bytes()));
    format!(
        "{}:{}:{}",
        SESSION_KEY_NAMESPACE,
        prefix,
        &digest[..SESSION_KEY_DIGEST_LEN]
    )
}

/// Returns the persisted start of the session for `token`, recording `now` if there is none.
///
/// An unreadable stored value is replaced.
pub fn load_or_start(store: &dyn SessionStore, token: &str, now: DateTime<Utc>) -> DateTime<Utc> {
    let key = session_key(token);

    if let Some(raw) = store.get(&key) {
        match raw.trim().parse::<i64>().ok().and_then(DateTime::from_timestamp_millis) {
            Some(started) => return started,
            None => tracing::warn!("Discarding unreadable session start '{}' for {}", raw, key),
        }
    }

    store.set(&key, &now.timestamp_millis().to_string());
    tracing::debug!("Started new session {}", key);
    now
}

/// Process-local store, used by tests and short-lived clients.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_string());
    }
}

/// A JSON object on disk. Write failures are logged; the session keeps running
/// on its in-memory start time.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    fn read_all(&self) -> HashMap<String, String> {
        match std::fs::read_to_string(&self.path) {
            Ok(body) => serde_json::from_str(&body).unwrap_or_else(|e| {
                tracing::warn!("Ignoring corrupt session store {}: {}", self.path.display(), e);
                HashMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => {
                tracing::warn!("Failed to read session store {}: {}", self.path.display(), e);
                HashMap::new()
            }
        }
    }

    fn write_all(&self, entries: &HashMap<String, String>) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let body = serde_json::to_string_pretty(entries).map_err(std::io::Error::other)?;
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, body)?;
        std::fs::rename(&tmp, &self.path)
    }
}

impl SessionStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        self.read_all().remove(key)
    }

    fn set(&self, key: &str, value: &str) {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut entries = self.read_all();
        entries.insert(key.to_string(), value.to_string());
        if let Err(e) = self.write_all(&entries) {
            tracing::warn!("Failed to persist session store {}: {}", self.path.display(), e);
        }
    }
}
