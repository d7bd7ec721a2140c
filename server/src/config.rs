use std::{env, fmt::Display, str::FromStr};

use larder_core::Limits;
use thiserror::Error;
use tracing::{info, warn};
use url::Url;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("Invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    /// Base for every absolute URL the API hands out.
    pub public_url: Url,
    pub page_size: i64,
    pub max_page_size: i64,
    pub limits: Limits,
    pub session_days: i64,
}

impl Config {
    pub fn load() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
            .map_err(|e| {
                warn!("{e}");
            })
            .expect("Environment misconfigured!")
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        Ok(Self {
            database_url,
            bind_addr: try_load(&lookup, "LARDER_BIND_ADDR", "0.0.0.0:3000")?,
            public_url: try_load(&lookup, "LARDER_PUBLIC_URL", "http://localhost:3000")?,
            page_size: try_load_positive(&lookup, "LARDER_PAGE_SIZE", "6")?,
            max_page_size: try_load_positive(&lookup, "LARDER_MAX_PAGE_SIZE", "100")?,
            limits: Limits {
                min_amount: try_load_positive(&lookup, "LARDER_MIN_AMOUNT", "1")?,
                min_cooking_time: try_load_positive(&lookup, "LARDER_MIN_COOKING_TIME", "1")?,
            },
            session_days: try_load_positive(&lookup, "LARDER_SESSION_DAYS", "30")?,
        })
    }

    pub fn public_base(&self) -> &str {
        self.public_url.as_str().trim_end_matches('/')
    }
}

fn try_load<T, F>(lookup: &F, key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    let value = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    value.parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        reason: e.to_string(),
        value,
    })
}

/// Like [`try_load`], for settings that must be at least 1. The schema's
/// CHECK constraints hold amounts and cooking times to the same floor.
fn try_load_positive<T, F>(lookup: &F, key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr + PartialOrd + From<i8> + Display,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    let value: T = try_load(lookup, key, default)?;
    if value < T::from(1) {
        return Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[("DATABASE_URL", "postgres://localhost/larder")]).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert_eq!(config.public_base(), "http://localhost:3000");
        assert_eq!(config.page_size, 6);
        assert_eq!(config.max_page_size, 100);
        assert_eq!(config.limits, Limits::default());
        assert_eq!(config.session_days, 30);
    }

    #[test]
    fn test_database_url_required() {
        assert!(matches!(
            config(&[]),
            Err(ConfigError::Missing("DATABASE_URL"))
        ));
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("DATABASE_URL", "postgres://db/larder"),
            ("LARDER_PUBLIC_URL", "https://larder.example.com/"),
            ("LARDER_PAGE_SIZE", "10"),
            ("LARDER_MIN_AMOUNT", "5"),
        ])
        .unwrap();
        assert_eq!(config.public_base(), "https://larder.example.com");
        assert_eq!(config.page_size, 10);
        assert_eq!(config.limits.min_amount, 5);
    }

    #[test]
    fn test_minimums_below_one_rejected() {
        for key in ["LARDER_MIN_AMOUNT", "LARDER_MIN_COOKING_TIME", "LARDER_PAGE_SIZE"] {
            let err = config(&[("DATABASE_URL", "postgres://db/larder"), (key, "0")]).unwrap_err();
            assert!(
                matches!(&err, ConfigError::Invalid { key: k, .. } if *k == key),
                "{key}: {err}"
            );
        }
    }

    #[test]
    fn test_invalid_value() {
        let err = config(&[
            ("DATABASE_URL", "postgres://db/larder"),
            ("LARDER_PAGE_SIZE", "six"),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: "LARDER_PAGE_SIZE",
                ..
            }
        ));
    }
}
