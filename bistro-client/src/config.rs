//! Client configuration

use chrono_tz::Tz;
use std::path::PathBuf;

/// Client configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | BISTRO_PREFS_PATH | ./bistro/preferences.json | local preference file |
/// | BISTRO_TIMEZONE | Europe/Warsaw | zone for order timestamps |
/// | BISTRO_EVENT_CAPACITY | 256 | session event channel capacity |
/// | BISTRO_LOG_LEVEL | info | log filter |
/// | BISTRO_LOG_JSON | false | JSON console logs |
/// | BISTRO_LOG_DIR | (unset) | daily rotating log files |
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Local durable preference file (last table number)
    pub prefs_path: PathBuf,
    /// Time zone used to render creation times
    pub timezone: Tz,
    /// Capacity of the session event broadcast channel
    pub event_capacity: usize,
    pub log_level: String,
    pub log_json: bool,
    pub log_dir: Option<String>,
}

impl ClientConfig {
    pub fn new() -> Self {
        Self {
            prefs_path: PathBuf::from("./bistro/preferences.json"),
            timezone: chrono_tz::Europe::Warsaw,
            event_capacity: 256,
            log_level: "info".to_string(),
            log_json: false,
            log_dir: None,
        }
    }

    /// Load from environment, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::new();
        Self {
            prefs_path: std::env::var("BISTRO_PREFS_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.prefs_path),
            timezone: std::env::var("BISTRO_TIMEZONE")
                .ok()
                .and_then(|tz| tz.parse().ok())
                .unwrap_or(defaults.timezone),
            event_capacity: std::env::var("BISTRO_EVENT_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|v| *v > 0)
                .unwrap_or(defaults.event_capacity),
            log_level: std::env::var("BISTRO_LOG_LEVEL").unwrap_or(defaults.log_level),
            log_json: std::env::var("BISTRO_LOG_JSON")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.log_json),
            log_dir: std::env::var("BISTRO_LOG_DIR").ok(),
        }
    }

    pub fn with_prefs_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.prefs_path = path.into();
        self
    }

    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity.max(1);
        self
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}
