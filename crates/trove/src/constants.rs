//! Setting names and fixed values
//!
//! Centralized location for the environment keys the store knows about.

// =============================================================================
// Environment Inputs
// =============================================================================

/// Selects development mode when set to exactly `"true"`
pub const ENV_IS_DEV: &str = "IS_DEV";

/// Database connection string, copied verbatim into [`KEY_DSN`]
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";

/// Maximum width for uploaded images
pub const KEY_MAX_IMAGE_WIDTH: &str = "MAX_IMAGE_WIDTH";

/// Site host name, stored lower-cased
pub const KEY_CANONICAL_URL: &str = "CANONICAL_URL";

/// Whether the site is served over TLS
pub const ENV_IS_HTTPS: &str = "IS_HTTPS";

/// Full base URL of the website; derived when absent
pub const KEY_WEBSITE_BASE_URL: &str = "WEBSITE_BASE_URL";

/// Redis connection URL, aliased into [`KEY_CACHE_URL`]
pub const ENV_REDIS_URL: &str = "REDIS_URL";

// =============================================================================
// Derived Keys
// =============================================================================

/// Mode label, either [`MODE_DEV`] or [`MODE_LIVE`]
pub const KEY_SERVER_IS: &str = "SERVER_IS";

/// Bool key set when running in development mode
pub const KEY_SERVER_IS_DEV: &str = "SERVER_IS_DEV";

/// Bool key set when running live
pub const KEY_SERVER_IS_LVE: &str = "SERVER_IS_LVE";

/// Database connection string
pub const KEY_DSN: &str = "DSN";

/// Bool key derived from [`ENV_IS_HTTPS`]
pub const KEY_IS_SECURED: &str = "IS_SECURED";

/// URL scheme prefix, `http://` or `https://`
pub const KEY_PROTO: &str = "PROTO";

/// Cache backend URL
pub const KEY_CACHE_URL: &str = "CACHE_URL";

pub const MODE_DEV: &str = "DEV";
pub const MODE_LIVE: &str = "LVE";

pub const PROTO_HTTP: &str = "http://";
pub const PROTO_HTTPS: &str = "https://";

// =============================================================================
// Site Settings
// =============================================================================
// Resolved on demand only; nothing is derived from these at load time.

pub const KEY_SITENAME: &str = "SITENAME";
pub const KEY_ENC_KEY: &str = "ENC_KEY";
pub const KEY_SERVER_PORT: &str = "SERVER_PORT";
pub const KEY_IMAGE_BASE_URL: &str = "IMAGE_BASE_URL";
pub const KEY_ATTACHMENTS_FOLDER: &str = "ATTACHMENTS_FOLDER";
pub const KEY_SLACK_LOG_URL: &str = "SLACK_LOG_URL";
pub const KEY_CHECK_CSRF_VIA_REFERRER: &str = "CHECK_CSRF_VIA_REFERRER";
pub const KEY_EMAIL_FROM_NAME: &str = "EMAIL_FROM_NAME";
pub const KEY_EMAIL_FROM_EMAIL: &str = "EMAIL_FROM_EMAIL";
pub const KEY_IS_SITE_BOUND: &str = "IS_SITE_BOUND";
pub const KEY_CACHE_NAMESPACE: &str = "CACHE_NAMESPACE";
pub const KEY_LOGGING_ENABLED: &str = "LOGGING_ENABLED";

// =============================================================================
// Redaction
// =============================================================================

/// Placeholder shown instead of secret values
pub const REDACTED: &str = "[REDACTED]";

/// Keys whose values never leave the store in snapshots or logs
pub const SECRET_KEYS: &[&str] = &[
    KEY_DSN,
    ENV_DATABASE_URL,
    ENV_REDIS_URL,
    KEY_CACHE_URL,
    KEY_ENC_KEY,
];

/// Check if a key holds a secret value
pub fn is_secret_key(key: &str) -> bool {
    SECRET_KEYS.contains(&key)
}

/// Hours in a day, for `"30days"`-style durations
pub const HOURS_PER_DAY: i64 = 24;
