//! # xApp Configuration
//!
//! Read once from the environment at startup.
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `ranList` | (required) | Comma separated target nodes |
//! | `influxAddr` | unset | Database base URL; unset logs points instead |
//! | `influxDatabase` | `kpimon` | Database name |
//! | `influxPrecision` | `ms` | `ns`, `u`, `ms` or `s` |
//! | `influxUser` / `influxPassword` | unset | Basic auth |
//! | `KPIMON_CREATE_EXPIRY_SECS` | 5 | Create-expiry timer |
//! | `KPIMON_DELETE_EXPIRY_SECS` | 5 | Delete-expiry timer |
//! | `KPIMON_MAX_SUB_ATTEMPTS` | 100 | Create send attempts |
//! | `KPIMON_RETRY_DELAY_SECS` | 5 | Delay between Create attempts |
//! | `KPIMON_STARTUP_DELAY_SECS` | 5 | Wait before the first subscription |
//! | `KPIMON_CLEANUP_ON_EXPIRY` | `false` | Send Delete when a Create expires |
//! | `KPIMON_INBOUND_CAPACITY` | 1000 | Inbound queue depth |
//!
//! A `ranList` entry is either `ranName` or `ranName|plmnHex|nodeIdBits`.

use std::str::FromStr;
use std::time::Duration;

use kpm_01_subscription::{ExpiryCleanup, LifecycleConfig};
use kpm_02_indication::Precision;
use shared_types::{BitString, IdentityError, NodeIdentity};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no target nodes configured (set ranList)")]
    NoTargetNodes,

    #[error("invalid value {value:?} for {var}: {reason}")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("invalid ranList entry {entry:?}: {source}")]
    InvalidNode {
        entry: String,
        #[source]
        source: IdentityError,
    },

    #[error("invalid lifecycle settings: {0}")]
    Lifecycle(String),
}

/// Complete xApp configuration.
#[derive(Debug, Clone)]
pub struct XappConfig {
    /// Nodes to subscribe to at startup.
    pub nodes: Vec<NodeIdentity>,
    /// RAN function id used for every subscription.
    pub func_id: u16,
    pub lifecycle: LifecycleConfig,
    pub sink: SinkConfig,
    pub startup_delay: Duration,
    pub inbound_capacity: usize,
}

/// Time-series database settings.
#[derive(Debug, Clone)]
pub struct SinkConfig {
    /// Base URL, e.g. `http://influxdb:8086`. `None` logs points instead.
    pub addr: Option<String>,
    pub database: String,
    pub precision: Precision,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            addr: None,
            database: "kpimon".to_string(),
            precision: Precision::Milliseconds,
            username: None,
            password: None,
        }
    }
}

impl Default for XappConfig {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            func_id: 0,
            lifecycle: LifecycleConfig::default(),
            sink: SinkConfig::default(),
            startup_delay: Duration::from_secs(5),
            inbound_capacity: shared_bus::DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl XappConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = XappConfig::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(list) = get("ranList") {
            config.nodes = parse_ran_list(&list)?;
        }

        config.sink.addr = get("influxAddr").map(|a| a.trim_end_matches('/').to_string());
        if let Some(db) = get("influxDatabase") {
            config.sink.database = db;
        }
        if let Some(precision) = get("influxPrecision") {
            config.sink.precision =
                Precision::from_str(precision.trim()).map_err(|e| ConfigError::InvalidValue {
                    var: "influxPrecision",
                    value: precision.clone(),
                    reason: e.to_string(),
                })?;
        }
        config.sink.username = get("influxUser");
        config.sink.password = get("influxPassword");

        if let Some(secs) = parse_number::<u64>(&get, "KPIMON_CREATE_EXPIRY_SECS")? {
            config.lifecycle.create_expiry = Duration::from_secs(secs);
        }
        if let Some(secs) = parse_number::<u64>(&get, "KPIMON_DELETE_EXPIRY_SECS")? {
            config.lifecycle.delete_expiry = Duration::from_secs(secs);
        }
        if let Some(attempts) = parse_number::<u32>(&get, "KPIMON_MAX_SUB_ATTEMPTS")? {
            config.lifecycle.max_send_attempts = attempts;
        }
        if let Some(secs) = parse_number::<u64>(&get, "KPIMON_RETRY_DELAY_SECS")? {
            config.lifecycle.retry_delay = Duration::from_secs(secs);
        }
        if let Some(secs) = parse_number::<u64>(&get, "KPIMON_STARTUP_DELAY_SECS")? {
            config.startup_delay = Duration::from_secs(secs);
        }
        if let Some(capacity) = parse_number::<usize>(&get, "KPIMON_INBOUND_CAPACITY")? {
            config.inbound_capacity = capacity;
        }
        if let Some(flag) = get("KPIMON_CLEANUP_ON_EXPIRY") {
            config.lifecycle.expiry_cleanup = if parse_flag(&flag) {
                ExpiryCleanup::SendDelete
            } else {
                ExpiryCleanup::Disabled
            };
        }

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.nodes.is_empty() {
            return Err(ConfigError::NoTargetNodes);
        }
        if self.inbound_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                var: "KPIMON_INBOUND_CAPACITY",
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        self.lifecycle
            .validate()
            .map_err(|e| ConfigError::Lifecycle(e.to_string()))
    }
}

fn parse_number<T>(
    get: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match get(var) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError::InvalidValue {
                var,
                value: raw.clone(),
                reason: e.to_string(),
            }),
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Parse a comma separated node list.
pub fn parse_ran_list(list: &str) -> Result<Vec<NodeIdentity>, ConfigError> {
    list.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(parse_node)
        .collect()
}

fn parse_node(entry: &str) -> Result<NodeIdentity, ConfigError> {
    let mut parts = entry.split('|').map(str::trim);
    let ran_name = parts.next().unwrap_or_default();

    let (plmn, bits) = match (parts.next(), parts.next()) {
        (None, _) => return Ok(NodeIdentity::named(ran_name)),
        (Some(plmn), Some(bits)) => (plmn, bits),
        (Some(_), None) => {
            return Err(ConfigError::InvalidNode {
                entry: entry.to_string(),
                source: IdentityError::InvalidPlmn {
                    input: entry.to_string(),
                    reason: "expected ranName|plmnHex|nodeIdBits".to_string(),
                },
            })
        }
    };

    let invalid = |source| ConfigError::InvalidNode {
        entry: entry.to_string(),
        source,
    };
    let plmn_id = hex::decode(plmn).map_err(|e| {
        invalid(IdentityError::InvalidPlmn {
            input: plmn.to_string(),
            reason: e.to_string(),
        })
    })?;
    let node_id_bits = BitString::from_str(bits).map_err(invalid)?;

    Ok(NodeIdentity::new(ran_name, plmn_id, node_id_bits))
}
