//! Engine configuration.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

/// Tunable engine settings.
///
/// Thresholds and delays are defaults rather than algorithmic requirements.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use seamless_lib::FilterConfig;
///
/// let config = FilterConfig::default()
///     .score_threshold(0.4)
///     .search_debounce(Duration::from_millis(100))
///     .sort_by_score(true);
/// assert_eq!(config.score_threshold, 0.4);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FilterConfig {
    /// Items scoring strictly above this value are shown.
    ///
    /// Default: 0.3
    pub score_threshold: f64,
    /// Delay between the last keystroke and the filter pass.
    ///
    /// Default: 150 ms
    pub search_debounce: Duration,
    /// Delay between a foreign filter signal and the sync decision.
    ///
    /// Default: 50 ms
    pub sync_debounce: Duration,
    /// Settle time before checked states are restored.
    ///
    /// Default: 200 ms
    pub restore_delay: Duration,
    /// Rank shown items with `style.order` by score.
    pub sort_by_score: bool,
    /// Upper bound on concurrently fetched pages in parallel mode.
    ///
    /// Default: 6
    pub max_in_flight_pages: usize,
    /// Per-request timeout for page fetches.
    ///
    /// Default: 30 seconds
    pub request_timeout: Duration,
    /// Log swallowed failures and engine decisions.
    pub debug: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            score_threshold: 0.3,
            search_debounce: Duration::from_millis(150),
            sync_debounce: Duration::from_millis(50),
            restore_delay: Duration::from_millis(200),
            sort_by_score: false,
            max_in_flight_pages: 6,
            request_timeout: Duration::from_secs(30),
            debug: false,
        }
    }
}

impl FilterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a JSON config file; missing keys keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let file: FilterConfigFile = serde_json::from_str(raw)?;
        file.into_config()
    }

    pub fn score_threshold(mut self, threshold: f64) -> Self {
        self.score_threshold = threshold;
        self
    }

    pub fn search_debounce(mut self, delay: Duration) -> Self {
        self.search_debounce = delay;
        self
    }

    pub fn sync_debounce(mut self, delay: Duration) -> Self {
        self.sync_debounce = delay;
        self
    }

    pub fn restore_delay(mut self, delay: Duration) -> Self {
        self.restore_delay = delay;
        self
    }

    pub fn sort_by_score(mut self, enabled: bool) -> Self {
        self.sort_by_score = enabled;
        self
    }

    pub fn max_in_flight_pages(mut self, n: usize) -> Self {
        self.max_in_flight_pages = n;
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn debug(mut self, enabled: bool) -> Self {
        self.debug = enabled;
        self
    }
}

/// On-disk form of [`FilterConfig`], durations in milliseconds.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FilterConfigFile {
    score_threshold: Option<f64>,
    search_debounce_ms: Option<u64>,
    sync_debounce_ms: Option<u64>,
    restore_delay_ms: Option<u64>,
    sort_by_score: Option<bool>,
    max_in_flight_pages: Option<usize>,
    request_timeout_ms: Option<u64>,
    debug: Option<bool>,
}

impl FilterConfigFile {
    fn into_config(self) -> Result<FilterConfig, ConfigError> {
        let defaults = FilterConfig::default();
        let score_threshold = self.score_threshold.unwrap_or(defaults.score_threshold);
        if !(0.0..=1.0).contains(&score_threshold) {
            return Err(ConfigError::invalid(
                "score_threshold",
                format!("{score_threshold} is outside 0.0..=1.0"),
            ));
        }
        let max_in_flight_pages = self
            .max_in_flight_pages
            .unwrap_or(defaults.max_in_flight_pages);
        if max_in_flight_pages == 0 {
            return Err(ConfigError::invalid("max_in_flight_pages", "must be at least 1"));
        }

        Ok(FilterConfig {
            score_threshold,
            search_debounce: self
                .search_debounce_ms
                .map_or(defaults.search_debounce, Duration::from_millis),
            sync_debounce: self
                .sync_debounce_ms
                .map_or(defaults.sync_debounce, Duration::from_millis),
            restore_delay: self
                .restore_delay_ms
                .map_or(defaults.restore_delay, Duration::from_millis),
            sort_by_score: self.sort_by_score.unwrap_or(defaults.sort_by_score),
            max_in_flight_pages,
            request_timeout: self
                .request_timeout_ms
                .map_or(defaults.request_timeout, Duration::from_millis),
            debug: self.debug.unwrap_or(defaults.debug),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FilterConfig::default();
        assert_eq!(config.score_threshold, 0.3);
        assert_eq!(config.search_debounce, Duration::from_millis(150));
        assert_eq!(config.sync_debounce, Duration::from_millis(50));
        assert_eq!(config.restore_delay, Duration::from_millis(200));
        assert!(!config.sort_by_score);
    }

    #[test]
    fn test_json_partial_override() {
        let config =
            FilterConfig::from_json_str(r#"{"score_threshold": 0.5, "sync_debounce_ms": 10}"#)
                .unwrap();
        assert_eq!(config.score_threshold, 0.5);
        assert_eq!(config.sync_debounce, Duration::from_millis(10));
        assert_eq!(config.search_debounce, Duration::from_millis(150));
    }

    #[test]
    fn test_json_rejects_bad_values() {
        assert!(matches!(
            FilterConfig::from_json_str(r#"{"score_threshold": 2.0}"#),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(
            FilterConfig::from_json_str(r#"{"max_in_flight_pages": 0}"#),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(
            FilterConfig::from_json_str(r#"{"unknown": 1}"#),
            Err(ConfigError::Json(_))
        ));
    }
}
