// Copyright 2026 Pricehound Contributors
// SPDX-License-Identifier: Apache-2.0

//! Process-level engine settings, resolved from the environment.

use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

pub const ENV_RENDER: &str = "PRICEHOUND_RENDER";
pub const ENV_RENDER_POOL: &str = "PRICEHOUND_RENDER_POOL";
pub const ENV_RENDER_SETTLE_MS: &str = "PRICEHOUND_RENDER_SETTLE_MS";
pub const ENV_NAV_TIMEOUT_MS: &str = "PRICEHOUND_NAV_TIMEOUT_MS";
pub const ENV_CHROMIUM_PATH: &str = "PRICEHOUND_CHROMIUM_PATH";

pub const MAX_POOL_SIZE: usize = 8;

/// Knobs for the markup acquirer and renderer pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    /// Launch a browser for rendering providers.
    pub render_enabled: bool,
    /// Concurrent browser contexts, `1..=MAX_POOL_SIZE`.
    pub pool_size: usize,
    /// Settle time every render waits after navigation.
    pub baseline_settle: Duration,
    pub navigation_timeout: Duration,
    pub chromium_path: Option<PathBuf>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            render_enabled: true,
            pool_size: 1,
            baseline_settle: Duration::from_millis(1000),
            navigation_timeout: Duration::from_millis(30_000),
            chromium_path: None,
        }
    }
}

impl EngineSettings {
    /// Read settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read settings through `lookup`. Unset or unparseable values keep
    /// their defaults; the pool size is clamped into range.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let render_enabled = match read(ENV_RENDER).as_deref() {
            None => defaults.render_enabled,
            Some(v) => !matches!(v.to_ascii_lowercase().as_str(), "0" | "false" | "off" | "no"),
        };

        let pool_size = read_number(&read, ENV_RENDER_POOL)
            .map(|n| n.clamp(1, MAX_POOL_SIZE as u64) as usize)
            .unwrap_or(defaults.pool_size);

        let baseline_settle = read_number(&read, ENV_RENDER_SETTLE_MS)
            .map(Duration::from_millis)
            .unwrap_or(defaults.baseline_settle);

        let navigation_timeout = read_number(&read, ENV_NAV_TIMEOUT_MS)
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
            .unwrap_or(defaults.navigation_timeout);

        Self {
            render_enabled,
            pool_size,
            baseline_settle,
            navigation_timeout,
            chromium_path: read(ENV_CHROMIUM_PATH).map(PathBuf::from),
        }
    }

    /// Disable rendering, consuming and returning the settings.
    pub fn without_rendering(mut self) -> Self {
        self.render_enabled = false;
        self
    }
}

fn read_number(read: &impl Fn(&str) -> Option<String>, name: &str) -> Option<u64> {
    let raw = read(name)?;
    match raw.parse::<u64>() {
        Ok(n) => Some(n),
        Err(_) => {
            warn!(variable = name, value = %raw, "ignoring non-numeric setting");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from(pairs: &[(&str, &str)]) -> EngineSettings {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        EngineSettings::from_lookup(|name| env.get(name).cloned())
    }

    #[test]
    fn test_defaults_when_unset() {
        assert_eq!(from(&[]), EngineSettings::default());
    }

    #[test]
    fn test_values_are_read() {
        let s = from(&[
            (ENV_RENDER, "off"),
            (ENV_RENDER_POOL, "3"),
            (ENV_RENDER_SETTLE_MS, "250"),
            (ENV_NAV_TIMEOUT_MS, "5000"),
            (ENV_CHROMIUM_PATH, "/opt/chrome/chrome"),
        ]);
        assert!(!s.render_enabled);
        assert_eq!(s.pool_size, 3);
        assert_eq!(s.baseline_settle, Duration::from_millis(250));
        assert_eq!(s.navigation_timeout, Duration::from_secs(5));
        assert_eq!(s.chromium_path, Some(PathBuf::from("/opt/chrome/chrome")));
    }

    #[test]
    fn test_pool_size_is_clamped() {
        assert_eq!(from(&[(ENV_RENDER_POOL, "0")]).pool_size, 1);
        assert_eq!(from(&[(ENV_RENDER_POOL, "64")]).pool_size, MAX_POOL_SIZE);
    }

    #[test]
    fn test_garbage_keeps_default() {
        let s = from(&[(ENV_RENDER_POOL, "many"), (ENV_NAV_TIMEOUT_MS, "0")]);
        assert_eq!(s.pool_size, 1);
        assert_eq!(s.navigation_timeout, Duration::from_millis(30_000));
    }
}
