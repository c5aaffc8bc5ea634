//! Cache configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use memorise_core::constants::DEFAULT_CAPACITY;
use memorise_core::error::{MemoriseError, Result};

/// Cache configuration.
///
/// Every field has a default, so a partial JSON document such as
/// `{"ttl_ms": 500}` is a valid configuration. In memory the time-to-live
/// keeps full `Duration` precision; on disk it is whole milliseconds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of entries (0 = unbounded)
    pub max_entries: usize,
    /// Time-to-live (None = entries never expire)
    #[serde(rename = "ttl_ms", with = "ttl_millis")]
    pub ttl: Option<Duration>,
    /// Whether to drop expired entries before evicting live ones
    pub auto_cleanup: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_CAPACITY,
            ttl: None,
            auto_cleanup: true,
        }
    }
}

impl CacheConfig {
    /// Sets the entry limit.
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    /// Sets the time-to-live.
    ///
    /// A zero duration passes through unchecked here and expires every entry
    /// as soon as it is stored; `validate` rejects it.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Returns the time-to-live.
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    /// Returns true if the cache never evicts by capacity.
    pub fn is_unbounded(&self) -> bool {
        self.max_entries == 0
    }

    /// Checks the configuration for values that cannot work.
    pub fn validate(&self) -> Result<()> {
        if self.ttl.is_some_and(|ttl| ttl.is_zero()) {
            return Err(MemoriseError::ZeroTimeToLive);
        }
        Ok(())
    }

    /// Loads and validates a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }
}

/// `Option<Duration>` as whole milliseconds, rounding a partial millisecond up
/// so a non-zero TTL never serializes as zero.
mod ttl_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(ttl: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        ttl.map(|ttl| {
            let partial = u128::from(ttl.subsec_nanos() % 1_000_000 != 0);
            u64::try_from(ttl.as_millis() + partial).unwrap_or(u64::MAX)
        })
        .serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_millis))
    }
}
