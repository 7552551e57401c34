//! Environment sources the store reads raw values from.

use std::collections::HashMap;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Source of raw setting values.
///
/// `None` means unset; the store treats it the same as an empty value.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait EnvSource: Send + Sync {
    /// Look up the raw value of a variable
    fn var(&self, key: &str) -> Option<String>;
}

/// The process environment.
///
/// Variables that are not valid unicode read as unset.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// A fixed set of variables, independent of the process environment.
#[derive(Debug, Clone, Default)]
pub struct MapEnv {
    vars: HashMap<String, String>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a variable, replacing any previous value
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }
}

impl<K, V> FromIterator<(K, V)> for MapEnv
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl EnvSource for MapEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_env_lookup() {
        let env = MapEnv::new().with("A", "1").with("A", "2");
        assert_eq!(env.var("A").as_deref(), Some("2"));
        assert_eq!(env.var("B"), None);
    }

    #[test]
    fn test_map_env_from_iter() {
        let env: MapEnv = [("X", "x"), ("Y", "")].into_iter().collect();
        assert_eq!(env.var("X").as_deref(), Some("x"));
        assert_eq!(env.var("Y").as_deref(), Some(""));
    }
}
