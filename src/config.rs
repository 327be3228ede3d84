use anyhow::{anyhow, Context, Result};
use once_cell::sync::OnceCell;
use std::env;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "https://esp32-mongodb-idev3.onrender.com";
pub const DEFAULT_COLLECTION: &str = "gA5kPz7RqL2mS8vBwT9E";
pub const DEFAULT_REFRESH_SECS: u64 = 10;

/// Intervals offered by the refresh selector, in seconds.
pub const REFRESH_CHOICES_SECS: [u64; 5] = [3, 5, 10, 30, 60];

pub static CONFIG: OnceCell<DashboardConfig> = OnceCell::new();

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub api_base_url: String,
    pub collection: String,
    pub refresh_interval: Duration,
    /// `None` leaves requests unbounded.
    pub request_timeout: Option<Duration>,
    pub render_delay: Duration,
    pub day_render_delay: Duration,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
            refresh_interval: Duration::from_secs(DEFAULT_REFRESH_SECS),
            request_timeout: None,
            render_delay: Duration::from_millis(500),
            day_render_delay: Duration::from_millis(300),
        }
    }
}

impl DashboardConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Applies every valid override. A bad value is logged and leaves that one
    /// setting at its default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();
        if let Some(url) = lookup("SENSOR_API_BASE_URL").filter(|s| !s.trim().is_empty()) {
            cfg.api_base_url = url.trim().trim_end_matches('/').to_string();
        }
        if let Some(c) = lookup("SENSOR_COLLECTION").filter(|s| !s.trim().is_empty()) {
            cfg.collection = c.trim().to_string();
        }
        if let Some(secs) = setting(&lookup, "SENSOR_REFRESH_SECS", |v| {
            parse_u64(v).and_then(|secs| match secs {
                0 => Err(anyhow!("must be greater than zero")),
                secs => Ok(secs),
            })
        }) {
            cfg.refresh_interval = Duration::from_secs(secs);
        }
        if let Some(secs) = setting(&lookup, "SENSOR_HTTP_TIMEOUT_SECS", parse_u64) {
            cfg.request_timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }
        if let Some(ms) = setting(&lookup, "SENSOR_RENDER_DELAY_MS", parse_u64) {
            cfg.render_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = setting(&lookup, "SENSOR_DAY_RENDER_DELAY_MS", parse_u64) {
            cfg.day_render_delay = Duration::from_millis(ms);
        }
        cfg
    }
}

fn setting<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    parse: impl Fn(&str) -> Result<T>,
) -> Option<T> {
    let raw = lookup(key)?;
    match parse(&raw).with_context(|| format!("{key}={raw:?}")) {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!("[config] {e:#}; keeping the default");
            None
        }
    }
}

fn parse_u64(value: &str) -> Result<u64> {
    value
        .trim()
        .parse::<u64>()
        .context("not a non-negative integer")
}

/// Global config; falls back to defaults if `main` did not install one.
pub fn get() -> &'static DashboardConfig {
    CONFIG.get_or_init(DashboardConfig::default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_when_nothing_set() {
        let cfg = DashboardConfig::from_lookup(lookup(&[]));
        assert_eq!(cfg, DashboardConfig::default());
        assert_eq!(cfg.refresh_interval, Duration::from_secs(10));
        assert!(cfg.request_timeout.is_none());
    }

    #[test]
    fn overrides_are_applied() {
        let cfg = DashboardConfig::from_lookup(lookup(&[
            ("SENSOR_API_BASE_URL", "http://localhost:3000/"),
            ("SENSOR_COLLECTION", "abc"),
            ("SENSOR_REFRESH_SECS", "3"),
            ("SENSOR_HTTP_TIMEOUT_SECS", "15"),
        ]));
        assert_eq!(cfg.api_base_url, "http://localhost:3000");
        assert_eq!(cfg.collection, "abc");
        assert_eq!(cfg.refresh_interval, Duration::from_secs(3));
        assert_eq!(cfg.request_timeout, Some(Duration::from_secs(15)));
    }

    #[test]
    fn zero_or_garbage_interval_keeps_default() {
        for bad in ["0", "ten", "-5"] {
            let cfg = DashboardConfig::from_lookup(lookup(&[("SENSOR_REFRESH_SECS", bad)]));
            assert_eq!(cfg.refresh_interval, Duration::from_secs(DEFAULT_REFRESH_SECS));
        }
    }

    #[test]
    fn bad_value_only_resets_its_own_setting() {
        let cfg = DashboardConfig::from_lookup(lookup(&[
            ("SENSOR_API_BASE_URL", "http://my-sensor:3000"),
            ("SENSOR_COLLECTION", "estufa"),
            ("SENSOR_REFRESH_SECS", "5"),
            ("SENSOR_HTTP_TIMEOUT_SECS", "abc"),
            ("SENSOR_RENDER_DELAY_MS", "soon"),
            ("SENSOR_DAY_RENDER_DELAY_MS", "120"),
        ]));
        assert_eq!(cfg.api_base_url, "http://my-sensor:3000");
        assert_eq!(cfg.collection, "estufa");
        assert_eq!(cfg.refresh_interval, Duration::from_secs(5));
        assert_eq!(cfg.request_timeout, None);
        assert_eq!(cfg.render_delay, Duration::from_millis(500));
        assert_eq!(cfg.day_render_delay, Duration::from_millis(120));
    }
}
