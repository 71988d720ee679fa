use std::{env, path::PathBuf, time::Duration};

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DATA_PATH: &str = "data/state.json";
pub const DEFAULT_REMINDER_HOUR: u32 = 21;
pub const MIN_REMINDER_POLL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_path: PathBuf,
    pub reminder_hour: u32,
    pub reminder_poll: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            reminder_hour: DEFAULT_REMINDER_HOUR,
            reminder_poll: MIN_REMINDER_POLL,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable source. Unparseable values
    /// fall back to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let port = lookup("PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(defaults.port);

        let data_path = lookup("APP_DATA_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_path);

        let reminder_hour = lookup("UL_REMINDER_HOUR")
            .and_then(|value| value.parse::<u32>().ok())
            .filter(|hour| *hour < 24)
            .unwrap_or(defaults.reminder_hour);

        // Polling faster than once a minute buys nothing: the check is hour-granular.
        let reminder_poll = lookup("UL_REMINDER_POLL_SECS")
            .and_then(|value| value.parse::<u64>().ok())
            .map(Duration::from_secs)
            .map(|poll| poll.max(MIN_REMINDER_POLL))
            .unwrap_or(defaults.reminder_poll);

        Self {
            port,
            data_path,
            reminder_hour,
            reminder_poll,
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
        move |key| map.get(key).cloned()
    }

    #[test]
    fn missing_variables_use_defaults() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config.port, 8080);
        assert_eq!(config.data_path, PathBuf::from("data/state.json"));
        assert_eq!(config.reminder_hour, 21);
        assert_eq!(config.reminder_poll, Duration::from_secs(60));
    }

    #[test]
    fn variables_override_defaults() {
        let config = Config::from_lookup(lookup_from(&[
            ("PORT", "9090"),
            ("APP_DATA_PATH", "/tmp/ul.json"),
            ("UL_REMINDER_HOUR", "7"),
            ("UL_REMINDER_POLL_SECS", "300"),
        ]));
        assert_eq!(config.port, 9090);
        assert_eq!(config.data_path, PathBuf::from("/tmp/ul.json"));
        assert_eq!(config.reminder_hour, 7);
        assert_eq!(config.reminder_poll, Duration::from_secs(300));
    }

    #[test]
    fn invalid_values_fall_back() {
        let config = Config::from_lookup(lookup_from(&[
            ("PORT", "not-a-port"),
            ("UL_REMINDER_HOUR", "24"),
            ("UL_REMINDER_POLL_SECS", "5"),
        ]));
        assert_eq!(config.port, 8080);
        assert_eq!(config.reminder_hour, 21);
        assert_eq!(config.reminder_poll, Duration::from_secs(60));
    }
}
