//! Trove - lazily cached settings from the environment.
//!
//! This crate provides:
//! - A settings store with separate string and bool caches
//! - Derived defaults (mode, URL scheme, base URL, cache URL alias)
//! - Duration parsing for `1h30m`-style and `30days`-style values
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use trove::SettingsStore;
//!
//! let settings = Arc::new(SettingsStore::load()?);
//! if settings.is_development() {
//!     println!("serving {}", settings.website_base_url());
//! }
//! let ttl = settings.get_duration("SESSION_TTL");
//! # Ok::<(), trove::SettingsError>(())
//! ```

pub mod constants;
pub mod duration;
pub mod env;
pub mod error;
pub mod store;

pub use duration::{invalid_duration, is_invalid};
pub use env::{EnvSource, MapEnv, ProcessEnv};
pub use error::{DurationError, SettingsError, SettingsResult};
pub use store::{SettingsSnapshot, SettingsStore};

#[cfg(any(test, feature = "test-utils"))]
pub use env::MockEnvSource;
