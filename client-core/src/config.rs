//! Client configuration with environment overrides.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Height bounds for the auto-sizing input field, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutosizeConfig {
    pub min_height: u32,
    pub max_height: u32,
}

impl Default for AutosizeConfig {
    fn default() -> Self {
        Self {
            min_height: 50,
            max_height: 300,
        }
    }
}

/// Tunables for one client session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Input history size, counting the scratch slot.
    pub history_capacity: usize,
    /// Period of the idle keep-alive message.
    pub keepalive_interval: Duration,
    /// Maximum number of blocks kept in the message log.
    pub scrollback_capacity: usize,
    pub autosize: AutosizeConfig,
}

impl ClientConfig {
    pub const DEFAULT_HISTORY_CAPACITY: usize = 21;
    pub const DEFAULT_KEEPALIVE_INTERVAL: Duration = Duration::from_secs(3 * 60);
    pub const DEFAULT_SCROLLBACK_CAPACITY: usize = 10_000;

    /// Build a config from `LANTERN_*` environment variables, falling back to
    /// defaults for anything unset, blank or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let autosize = AutosizeConfig {
            min_height: env_parse("LANTERN_INPUT_MIN_HEIGHT")
                .unwrap_or(defaults.autosize.min_height),
            max_height: env_parse("LANTERN_INPUT_MAX_HEIGHT")
                .unwrap_or(defaults.autosize.max_height),
        };

        Self {
            history_capacity: env_parse("LANTERN_HISTORY_MAX")
                .unwrap_or(defaults.history_capacity),
            keepalive_interval: env_parse("LANTERN_KEEPALIVE_SECS")
                .filter(|secs| *secs > 0)
                .map_or(defaults.keepalive_interval, Duration::from_secs),
            scrollback_capacity: env_parse("LANTERN_SCROLLBACK_MAX")
                .unwrap_or(defaults.scrollback_capacity),
            autosize,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            history_capacity: Self::DEFAULT_HISTORY_CAPACITY,
            keepalive_interval: Self::DEFAULT_KEEPALIVE_INTERVAL,
            scrollback_capacity: Self::DEFAULT_SCROLLBACK_CAPACITY,
            autosize: AutosizeConfig::default(),
        }
    }
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|value| {
        let value = value.trim();
        if value.is_empty() {
            None
        } else {
            value.parse().ok()
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, OnceLock};

    fn env_lock() -> &'static Mutex<()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
    }

    struct EnvGuard {
        key: &'static str,
        previous: Option<String>,
    }

    impl EnvGuard {
        fn set(key: &'static str, value: &str) -> Self {
            let previous = env::var(key).ok();
            env::set_var(key, value);
            Self { key, previous }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            if let Some(value) = &self.previous {
                env::set_var(self.key, value);
            } else {
                env::remove_var(self.key);
            }
        }
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.history_capacity, 21);
        assert_eq!(config.keepalive_interval, Duration::from_secs(180));
        assert_eq!(config.scrollback_capacity, 10_000);
        assert_eq!(config.autosize.min_height, 50);
        assert_eq!(config.autosize.max_height, 300);
    }

    #[test]
    fn test_from_env_overrides() {
        let _lock = env_lock().lock().unwrap();
        let _history = EnvGuard::set("LANTERN_HISTORY_MAX", "50");
        let _keepalive = EnvGuard::set("LANTERN_KEEPALIVE_SECS", " 60 ");
        let _max = EnvGuard::set("LANTERN_INPUT_MAX_HEIGHT", "400");

        let config = ClientConfig::from_env();
        assert_eq!(config.history_capacity, 50);
        assert_eq!(config.keepalive_interval, Duration::from_secs(60));
        assert_eq!(config.autosize.max_height, 400);
        assert_eq!(config.autosize.min_height, 50);
    }

    #[test]
    fn test_from_env_ignores_garbage() {
        let _lock = env_lock().lock().unwrap();
        let _history = EnvGuard::set("LANTERN_HISTORY_MAX", "lots");
        let _keepalive = EnvGuard::set("LANTERN_KEEPALIVE_SECS", "0");
        let _scrollback = EnvGuard::set("LANTERN_SCROLLBACK_MAX", "   ");

        let config = ClientConfig::from_env();
        assert_eq!(config.history_capacity, 21);
        assert_eq!(config.keepalive_interval, Duration::from_secs(180));
        assert_eq!(config.scrollback_capacity, 10_000);
    }
}
