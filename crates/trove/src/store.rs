//! Lazily cached settings store.
//!
//! Values are read from an [`EnvSource`] the first time they are asked for and
//! cached for the lifetime of the store. A handful of derived keys are
//! computed eagerly when the store is loaded.
//!
//! Strings and bools live in separate maps, each behind its own lock, so
//! lookups in one namespace never wait on the other.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Duration;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::constants::{
    is_secret_key, ENV_DATABASE_URL, ENV_IS_DEV, ENV_IS_HTTPS, ENV_REDIS_URL, KEY_CACHE_URL,
    KEY_CANONICAL_URL, KEY_DSN, KEY_IS_SECURED, KEY_MAX_IMAGE_WIDTH, KEY_PROTO, KEY_SERVER_IS,
    KEY_SERVER_IS_DEV, KEY_SERVER_IS_LVE, KEY_WEBSITE_BASE_URL, MODE_DEV, MODE_LIVE, PROTO_HTTP,
    PROTO_HTTPS, REDACTED,
};
use crate::duration;
use crate::env::{EnvSource, ProcessEnv};
use crate::error::{SettingsError, SettingsResult};

/// Process settings with read-through caching.
///
/// Build one with [`SettingsStore::load`] at startup and share it (for
/// example behind an `Arc`) with whatever needs configuration.
pub struct SettingsStore {
    env: Box<dyn EnvSource>,
    strings: RwLock<HashMap<String, String>>,
    bools: RwLock<HashMap<String, bool>>,
}

impl std::fmt::Debug for SettingsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let server_is = self.server_is();
        let strings = read(&self.strings).len();
        let bools = read(&self.bools).len();
        f.debug_struct("SettingsStore")
            .field("server_is", &server_is)
            .field("strings", &strings)
            .field("bools", &bools)
            .finish()
    }
}

/// Cached values at a point in time, with secrets redacted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SettingsSnapshot {
    pub strings: BTreeMap<String, String>,
    pub bools: BTreeMap<String, bool>,
}

impl SettingsStore {
    /// Load settings from the process environment.
    ///
    /// A `.env` file found in the working directory (or a parent) is loaded
    /// first; variables already set in the process take precedence over it.
    /// A missing file is fine, any other failure is returned.
    pub fn load() -> SettingsResult<Self> {
        match dotenvy::dotenv() {
            Ok(path) => debug!(path = %path.display(), "Loaded override file"),
            Err(e) if e.not_found() => debug!("No override file present"),
            Err(e) => return Err(SettingsError::override_file(None, e)),
        }
        Ok(Self::with_source(ProcessEnv))
    }

    /// Load settings from the process environment using a specific override
    /// file. A missing file is ignored like in [`SettingsStore::load`].
    pub fn load_from_path(path: impl AsRef<Path>) -> SettingsResult<Self> {
        let path = path.as_ref();
        match dotenvy::from_path(path) {
            Ok(()) => debug!(path = %path.display(), "Loaded override file"),
            Err(e) if e.not_found() => {
                debug!(path = %path.display(), "No override file present")
            }
            Err(e) => return Err(SettingsError::override_file(Some(path.to_path_buf()), e)),
        }
        Ok(Self::with_source(ProcessEnv))
    }

    /// Build a store over any source, computing the derived keys.
    pub fn with_source(env: impl EnvSource + 'static) -> Self {
        let store = Self {
            env: Box::new(env),
            strings: RwLock::new(HashMap::new()),
            bools: RwLock::new(HashMap::new()),
        };
        store.derive();
        info!(
            mode = %store.server_is(),
            secured = store.is_secured(),
            "Settings loaded"
        );
        store
    }

    /// Eagerly cache the keys other parts of the application rely on.
    fn derive(&self) {
        {
            let mut strings = write(&self.strings);
            let mut bools = write(&self.bools);

            if self.raw(ENV_IS_DEV) == "true" {
                strings.insert(KEY_SERVER_IS.to_string(), MODE_DEV.to_string());
                bools.insert(KEY_SERVER_IS_DEV.to_string(), true);
            } else {
                strings.insert(KEY_SERVER_IS.to_string(), MODE_LIVE.to_string());
                bools.insert(KEY_SERVER_IS_LVE.to_string(), true);
            }

            strings.insert(KEY_DSN.to_string(), self.raw(ENV_DATABASE_URL));

            // Only an empty width is cached; a configured one resolves lazily
            let image_width = self.raw(KEY_MAX_IMAGE_WIDTH);
            if image_width.is_empty() {
                strings.insert(KEY_MAX_IMAGE_WIDTH.to_string(), image_width);
            }

            let canonical_url = self.raw(KEY_CANONICAL_URL).to_lowercase();
            if !canonical_url.is_empty() {
                strings.insert(KEY_CANONICAL_URL.to_string(), canonical_url);
            }

            let secured = self.raw(ENV_IS_HTTPS).to_lowercase() == "true";
            bools.insert(KEY_IS_SECURED.to_string(), secured);
        }

        // Goes through the lazy bool path, which needs the bools lock
        let proto = if self.is_production() {
            PROTO_HTTPS
        } else {
            PROTO_HTTP
        };

        {
            let mut strings = write(&self.strings);
            strings.insert(KEY_PROTO.to_string(), proto.to_string());

            if self.raw(KEY_WEBSITE_BASE_URL).is_empty() {
                let canonical_url = strings
                    .get(KEY_CANONICAL_URL)
                    .map(String::as_str)
                    .unwrap_or_default();
                let base_url = format!("{}{}/", proto, canonical_url);
                strings.insert(KEY_WEBSITE_BASE_URL.to_string(), base_url);
            }
        }

        let redis_url = self.get(ENV_REDIS_URL);
        if !redis_url.is_empty() {
            write(&self.strings).insert(KEY_CACHE_URL.to_string(), redis_url);
        }

        let strings = read(&self.strings);
        debug!(
            proto = %proto,
            website_base_url = strings.get(KEY_WEBSITE_BASE_URL).map(String::as_str),
            has_dsn = strings.get(KEY_DSN).is_some_and(|v| !v.is_empty()),
            has_cache_url = strings.contains_key(KEY_CACHE_URL),
            "Derived settings cached"
        );
    }

    /// Raw value from the source, unset reading as empty.
    fn raw(&self, key: &str) -> String {
        self.env.var(key).unwrap_or_default()
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    /// Get a string setting, caching it on first read.
    pub fn get(&self, name: &str) -> String {
        self.get_with_default(name, "")
    }

    /// Get a string setting, falling back to `default` when it is empty.
    ///
    /// The default is returned but never cached, so a later [`get`] on the
    /// same key still sees the empty value.
    ///
    /// [`get`]: SettingsStore::get
    pub fn get_with_default(&self, name: &str, default: &str) -> String {
        if let Some(value) = read(&self.strings).get(name) {
            return value.clone();
        }

        let mut strings = write(&self.strings);
        if let Some(value) = strings.get(name) {
            return value.clone();
        }

        let value = self.raw(name);
        if value.is_empty() && !default.is_empty() {
            return default.to_string();
        }
        strings.insert(name.to_string(), value.clone());
        value
    }

    /// Get a bool setting, caching it on first read.
    ///
    /// `"true"` and `"1"` (any case) are true; anything else, including an
    /// unset variable, is false.
    pub fn get_bool(&self, name: &str) -> bool {
        if let Some(value) = read(&self.bools).get(name) {
            return *value;
        }

        let mut bools = write(&self.bools);
        *bools
            .entry(name.to_string())
            .or_insert_with(|| parse_bool(&self.raw(name)))
    }

    /// Get a duration setting.
    ///
    /// Returns [`duration::invalid_duration`] when the value does not parse.
    pub fn get_duration(&self, name: &str) -> Duration {
        self.try_get_duration(name).unwrap_or_else(|e| {
            warn!(error = %e, "Ignoring invalid duration setting");
            duration::invalid_duration()
        })
    }

    /// Get a duration setting, reporting why a value does not parse.
    pub fn try_get_duration(&self, name: &str) -> SettingsResult<Duration> {
        let value = self.get(name);
        duration::parse(&value).map_err(|e| SettingsError::invalid_duration(name, value, e))
    }

    pub fn is_production(&self) -> bool {
        self.get_bool(KEY_SERVER_IS_LVE)
    }

    pub fn is_development(&self) -> bool {
        self.get_bool(KEY_SERVER_IS_DEV)
    }

    // =========================================================================
    // Well-known settings
    // =========================================================================

    /// `DEV` or `LVE`
    pub fn server_is(&self) -> String {
        self.get(KEY_SERVER_IS)
    }

    /// Database connection string
    pub fn dsn(&self) -> String {
        self.get(KEY_DSN)
    }

    /// `http://` or `https://`
    pub fn proto(&self) -> String {
        self.get(KEY_PROTO)
    }

    pub fn canonical_url(&self) -> String {
        self.get(KEY_CANONICAL_URL)
    }

    pub fn website_base_url(&self) -> String {
        self.get(KEY_WEBSITE_BASE_URL)
    }

    /// Cache backend URL, empty when no Redis URL is configured
    pub fn cache_url(&self) -> String {
        self.get(KEY_CACHE_URL)
    }

    pub fn is_secured(&self) -> bool {
        self.get_bool(KEY_IS_SECURED)
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    /// Copy of everything cached so far, with secret values redacted.
    pub fn snapshot(&self) -> SettingsSnapshot {
        let strings = read(&self.strings)
            .iter()
            .map(|(k, v)| {
                let value = if is_secret_key(k) && !v.is_empty() {
                    REDACTED.to_string()
                } else {
                    v.clone()
                };
                (k.clone(), value)
            })
            .collect();
        let bools = read(&self.bools)
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .collect();

        SettingsSnapshot { strings, bools }
    }
}

fn parse_bool(raw: &str) -> bool {
    let raw = raw.to_lowercase();
    raw == "true" || raw == "1"
}

// A panic while holding a lock cannot leave a map half written, so poisoned
// locks are still safe to use.
fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
