use storage_core::{StoreConfig, MAX_INITIAL_CAPACITY, MAX_SHARD_AMOUNT};

/// Environment variable holding the number of entries to pre-allocate
pub const INITIAL_CAPACITY_VAR: &str = "STORAGE_INITIAL_CAPACITY";

/// Environment variable holding the number of lock shards
pub const SHARDS_VAR: &str = "STORAGE_SHARDS";

/// Host process settings
///
/// Missing, unparsable or out-of-range values fall back to the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostConfig {
    pub initial_capacity: usize,
    pub shard_amount: Option<usize>,
}

impl HostConfig {
    /// Reads the configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let parse = |name: &str, max: usize| {
            let raw = lookup(name)?;
            match raw.trim().parse::<usize>() {
                Ok(n) if n <= max => Some(n),
                Ok(_) => {
                    tracing::warn!("ignoring {}={:?}: larger than {}", name, raw, max);
                    None
                }
                Err(_) => {
                    tracing::warn!("ignoring {}={:?}: not a non-negative integer", name, raw);
                    None
                }
            }
        };

        Self {
            initial_capacity: parse(INITIAL_CAPACITY_VAR, MAX_INITIAL_CAPACITY).unwrap_or(0),
            shard_amount: parse(SHARDS_VAR, MAX_SHARD_AMOUNT),
        }
    }

    /// The store configuration these settings describe
    pub fn store_config(&self) -> StoreConfig {
        let config = StoreConfig::default().with_initial_capacity(self.initial_capacity);
        match self.shard_amount {
            Some(shards) => config.with_shard_amount(shards),
            None => config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = HostConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config, HostConfig::default());
        assert_eq!(config.store_config(), StoreConfig::default());
    }

    #[test]
    fn test_parses_values() {
        let config = HostConfig::from_lookup(lookup_from(&[
            (INITIAL_CAPACITY_VAR, "1024"),
            (SHARDS_VAR, " 12 "),
        ]));
        assert_eq!(config.initial_capacity, 1024);
        assert_eq!(config.shard_amount, Some(12));

        let store_config = config.store_config();
        assert_eq!(store_config.initial_capacity, 1024);
        assert_eq!(store_config.shard_amount, Some(16));
    }

    #[test]
    fn test_unparsable_values_fall_back() {
        let config = HostConfig::from_lookup(lookup_from(&[
            (INITIAL_CAPACITY_VAR, "lots"),
            (SHARDS_VAR, "-4"),
        ]));
        assert_eq!(config, HostConfig::default());
    }

    #[test]
    fn test_out_of_range_values_fall_back() {
        let config = HostConfig::from_lookup(lookup_from(&[
            (INITIAL_CAPACITY_VAR, "18446744073709551615"),
            (SHARDS_VAR, "18446744073709551615"),
        ]));
        assert_eq!(config, HostConfig::default());

        let store = storage_core::KeyValueStore::with_config(config.store_config());
        assert!(store.set("k", "v"));
        assert_eq!(store.size(), 1);
    }

    #[test]
    fn test_limits_are_accepted() {
        let max_capacity = MAX_INITIAL_CAPACITY.to_string();
        let max_shards = MAX_SHARD_AMOUNT.to_string();
        let config = HostConfig::from_lookup(lookup_from(&[
            (INITIAL_CAPACITY_VAR, max_capacity.as_str()),
            (SHARDS_VAR, max_shards.as_str()),
        ]));
        assert_eq!(config.initial_capacity, MAX_INITIAL_CAPACITY);
        assert_eq!(config.store_config().shard_amount, Some(MAX_SHARD_AMOUNT));

        let config = HostConfig::from_lookup(lookup_from(&[(SHARDS_VAR, "1025")]));
        assert_eq!(config.shard_amount, None);
    }
}
