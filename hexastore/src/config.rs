//! Store configuration module.
//!
//! Configuration is loaded from environment variables, with defaults for
//! everything.
//!
//! # Environment Variables
//!
//! - `HEXASTORE_SEED`: seed for skiplist balancing and fault injection
//!   (default: seeded from the OS)
//! - `HEXASTORE_NODE_ID`: node id stamped into K-order tokens (default: `0`)
//! - `HEXASTORE_MAX_LEVEL`: maximum skiplist tower height, `1..=32`
//!   (default: `16`)
//!
//! # Invariants
//!
//! - `max_level` is always in `1..=32`

use std::env::VarError;

/// Store configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Seed for the store's random source. `None` seeds from the OS, which
    /// makes index shapes differ between runs (query results never do).
    pub seed: Option<u64>,
    /// Node id stamped into every K-order token this store issues.
    pub node_id: u32,
    /// Maximum skiplist tower height.
    pub max_level: usize,
}

/// Error returned when loading configuration fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable is set but is not valid Unicode.
    NotUnicode(String),
    /// An environment variable has an invalid value.
    InvalidValue { name: String, message: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotUnicode(name) => {
                write!(f, "environment variable {name} is not valid unicode")
            }
            Self::InvalidValue { name, message } => {
                write!(f, "invalid value for {name}: {message}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            seed: None,
            node_id: Self::DEFAULT_NODE_ID,
            max_level: Self::DEFAULT_MAX_LEVEL,
        }
    }
}

impl StoreConfig {
    /// Default node id.
    pub const DEFAULT_NODE_ID: u32 = 0;
    /// Default maximum skiplist tower height.
    pub const DEFAULT_MAX_LEVEL: usize = crate::storage::DEFAULT_MAX_LEVEL;
    /// Largest accepted `max_level`.
    pub const MAX_LEVEL_LIMIT: usize = 32;

    /// A default configuration with a fixed seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but cannot be parsed, or if
    /// `HEXASTORE_MAX_LEVEL` is outside `1..=32`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name))
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Result<String, VarError>,
    {
        let seed = Self::load("HEXASTORE_SEED", &lookup)?;
        let node_id = Self::load("HEXASTORE_NODE_ID", &lookup)?.unwrap_or(Self::DEFAULT_NODE_ID);
        let max_level = Self::load("HEXASTORE_MAX_LEVEL", &lookup)?.unwrap_or(Self::DEFAULT_MAX_LEVEL);

        if !(1..=Self::MAX_LEVEL_LIMIT).contains(&max_level) {
            return Err(ConfigError::InvalidValue {
                name: "HEXASTORE_MAX_LEVEL".to_string(),
                message: format!("{max_level} is outside 1..={}", Self::MAX_LEVEL_LIMIT),
            });
        }

        Ok(Self {
            seed,
            node_id,
            max_level,
        })
    }

    /// Load and parse one variable. Unset variables yield `None`.
    fn load<T, F>(name: &str, lookup: &F) -> Result<Option<T>, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
        F: Fn(&str) -> Result<String, VarError>,
    {
        match lookup(name) {
            Ok(value) => value
                .trim()
                .parse::<T>()
                .map(Some)
                .map_err(|e| ConfigError::InvalidValue {
                    name: name.to_string(),
                    message: format!("'{value}': {e}"),
                }),
            Err(VarError::NotPresent) => Ok(None),
            Err(VarError::NotUnicode(_)) => Err(ConfigError::NotUnicode(name.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::ffi::OsString;

    use super::*;

    fn lookup_from(
        vars: &[(&str, &str)],
    ) -> impl Fn(&str) -> Result<String, VarError> + use<> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| vars.get(name).cloned().ok_or(VarError::NotPresent)
    }

    #[test]
    fn test_default_values() {
        let config = StoreConfig::default();
        assert_eq!(config.seed, None);
        assert_eq!(config.node_id, 0);
        assert_eq!(config.max_level, 16);
    }

    #[test]
    fn test_from_lookup_with_nothing_set() {
        let config = StoreConfig::from_lookup(lookup_from(&[])).expect("defaults load");
        assert_eq!(config, StoreConfig::default());
    }

    #[test]
    fn test_from_lookup_reads_all_variables() {
        let config = StoreConfig::from_lookup(lookup_from(&[
            ("HEXASTORE_SEED", "42"),
            ("HEXASTORE_NODE_ID", " 7 "),
            ("HEXASTORE_MAX_LEVEL", "8"),
        ]))
        .expect("valid config");
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.node_id, 7);
        assert_eq!(config.max_level, 8);
    }

    #[test]
    fn test_from_lookup_rejects_garbage() {
        let err = StoreConfig::from_lookup(lookup_from(&[("HEXASTORE_SEED", "abc")]))
            .expect_err("seed must be numeric");
        assert!(matches!(err, ConfigError::InvalidValue { ref name, .. } if name == "HEXASTORE_SEED"));
    }

    #[test]
    fn test_from_lookup_rejects_out_of_range_level() {
        for level in ["0", "33"] {
            let err = StoreConfig::from_lookup(lookup_from(&[("HEXASTORE_MAX_LEVEL", level)]))
                .expect_err("level out of range");
            assert!(err.to_string().starts_with("invalid value for HEXASTORE_MAX_LEVEL"));
        }
    }

    #[test]
    fn test_from_lookup_not_unicode() {
        let err = StoreConfig::from_lookup(|_| Err(VarError::NotUnicode(OsString::from("x"))))
            .expect_err("non-unicode value");
        assert_eq!(err, ConfigError::NotUnicode("HEXASTORE_SEED".to_string()));
    }

    #[test]
    fn test_config_error_display_invalid() {
        let error = ConfigError::InvalidValue {
            name: "TEST_VAR".to_string(),
            message: "bad value".to_string(),
        };
        assert_eq!(error.to_string(), "invalid value for TEST_VAR: bad value");
    }
}
