use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use crate::models::enums::FirePolicy;

/// Application-level constants
pub const APP_NAME: &str = "MedReminder";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Port the query service listens on unless overridden.
pub const DEFAULT_PORT: u16 = 3001;

pub const ENV_PORT: &str = "MED_REMINDER_PORT";
pub const ENV_BIND: &str = "MED_REMINDER_BIND";
pub const ENV_DB: &str = "MED_REMINDER_DB";
pub const ENV_SEED: &str = "MED_REMINDER_SEED";
pub const ENV_ALARMS: &str = "MED_REMINDER_ALARMS";
pub const ENV_FIRE_POLICY: &str = "MED_REMINDER_FIRE_POLICY";

/// Tracing filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "med_reminder_lib=info,med_reminder=info,tower_http=warn"
}

/// Get the application data directory
/// ~/MedReminder/ on all platforms, falling back to the working directory
/// when no home directory can be determined.
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Default SQLite file location.
pub fn default_db_path() -> PathBuf {
    app_data_dir().join("med_reminder.db")
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} has invalid value {value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Runtime configuration for the binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind: IpAddr,
    pub port: u16,
    pub db_path: PathBuf,
    /// Insert the demo ward into an empty database on startup.
    pub seed_demo_data: bool,
    /// Run the per-second alarm ticker.
    pub alarms_enabled: bool,
    pub fire_policy: FirePolicy,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            db_path: default_db_path(),
            seed_demo_data: true,
            alarms_enabled: true,
            fire_policy: FirePolicy::EveryTick,
        }
    }
}

impl ServerConfig {
    /// Defaults overridden by `MED_REMINDER_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            bind: parse_var(&lookup, ENV_BIND, defaults.bind)?,
            port: parse_var(&lookup, ENV_PORT, defaults.port)?,
            db_path: lookup(ENV_DB)
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            seed_demo_data: bool_var(&lookup, ENV_SEED, defaults.seed_demo_data)?,
            alarms_enabled: bool_var(&lookup, ENV_ALARMS, defaults.alarms_enabled)?,
            fire_policy: parse_var(&lookup, ENV_FIRE_POLICY, defaults.fire_policy)?,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}

fn parse_var<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(var) {
        None => Ok(default),
        Some(value) => {
            let parsed = value.trim().parse::<T>();
            parsed.map_err(|e| ConfigError::Invalid {
                var,
                reason: e.to_string(),
                value,
            })
        }
    }
}

fn bool_var<F>(lookup: &F, var: &'static str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        None => Ok(default),
        Some(value) => {
            let parsed = match value.trim() {
                "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
                "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
                _ => None,
            };
            parsed.ok_or_else(|| ConfigError::Invalid {
                var,
                value,
                reason: "expected true/false".into(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn app_data_dir_ends_with_app_name() {
        assert!(app_data_dir().ends_with("MedReminder"));
        assert!(default_db_path().starts_with(app_data_dir()));
    }

    #[test]
    fn defaults_without_env() {
        let config = ServerConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.port, 3001);
        assert_eq!(config.fire_policy, FirePolicy::EveryTick);
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3001");
    }

    #[test]
    fn env_overrides_apply() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            (ENV_PORT, "8080"),
            (ENV_BIND, "0.0.0.0"),
            (ENV_DB, "/tmp/ward.db"),
            (ENV_SEED, "false"),
            (ENV_ALARMS, "0"),
            (ENV_FIRE_POLICY, "once_per_minute"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.bind, IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        assert_eq!(config.db_path, PathBuf::from("/tmp/ward.db"));
        assert!(!config.seed_demo_data);
        assert!(!config.alarms_enabled);
        assert_eq!(config.fire_policy, FirePolicy::OncePerMinute);
    }

    #[test]
    fn invalid_port_is_reported() {
        let err = ServerConfig::from_lookup(lookup_from(&[(ENV_PORT, "http")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: ENV_PORT, .. }));
    }

    #[test]
    fn invalid_bool_is_reported() {
        let err = ServerConfig::from_lookup(lookup_from(&[(ENV_ALARMS, "maybe")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: ENV_ALARMS, .. }));
    }

    #[test]
    fn invalid_fire_policy_is_reported() {
        let err =
            ServerConfig::from_lookup(lookup_from(&[(ENV_FIRE_POLICY, "hourly")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: ENV_FIRE_POLICY, .. }));
    }

    #[test]
    fn blank_db_path_falls_back_to_default() {
        let config = ServerConfig::from_lookup(lookup_from(&[(ENV_DB, "  ")])).unwrap();
        assert_eq!(config.db_path, default_db_path());
    }
}
