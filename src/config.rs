use crate::error::{Error, Result};
use std::env;

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Upper bound for hour-valued settings: one year.
pub const MAX_HOURS: u64 = 24 * 365;

#[derive(Debug, Clone)]
pub struct Config {
    pub github_token: Option<String>,
    pub cache_path: String,
    pub cache_ttl_hours: u64,
    pub refresh_interval_hours: u64,
    pub top_repos: usize,
    pub api_base_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let github_token = lookup("GITHUB_TOKEN").filter(|t| !t.trim().is_empty());

        let cache_path = lookup("STATS_CACHE_PATH")
            .unwrap_or_else(|| "github_stats.db".to_string());

        let cache_ttl_hours = hours_setting(&lookup, "CACHE_TTL_HOURS", 6)?;
        let refresh_interval_hours = hours_setting(&lookup, "REFRESH_INTERVAL_HOURS", 6)?;

        let top_repos = lookup("TOP_REPOS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(10);

        let api_base_url = lookup("GITHUB_API_URL")
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        Ok(Self {
            github_token,
            cache_path,
            cache_ttl_hours,
            refresh_interval_hours,
            top_repos,
            api_base_url,
        })
    }

    pub fn refresh_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.refresh_interval_hours.min(MAX_HOURS) * 60 * 60)
    }
}

fn hours_setting<F>(lookup: &F, key: &str, default: u64) -> Result<u64>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };

    match raw.trim().parse::<u64>() {
        Ok(hours) if (1..=MAX_HOURS).contains(&hours) => Ok(hours),
        _ => Err(Error::Config(format!(
            "{} must be a whole number of hours between 1 and {}, got '{}'",
            key, MAX_HOURS, raw
        ))),
    }
}

#[derive(Debug, Clone)]
pub struct StatsConfig {
    pub cache_ttl: chrono::Duration,
    pub top_repos: usize,
    /// Reported when the contribution calendar yields nothing.
    pub fallback_total_contributions: u32,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            cache_ttl: chrono::Duration::hours(6),
            top_repos: 10,
            fallback_total_contributions: 250,
        }
    }
}

impl From<&Config> for StatsConfig {
    fn from(config: &Config) -> Self {
        Self {
            cache_ttl: chrono::Duration::hours(config.cache_ttl_hours.min(MAX_HOURS) as i64),
            top_repos: config.top_repos,
            ..Self::default()
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
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.github_token, None);
        assert_eq!(config.cache_path, "github_stats.db");
        assert_eq!(config.cache_ttl_hours, 6);
        assert_eq!(config.top_repos, 10);
        assert_eq!(config.api_base_url, DEFAULT_API_URL);

        let stats = StatsConfig::from(&config);
        assert_eq!(stats.cache_ttl, chrono::Duration::hours(6));
        assert_eq!(stats.fallback_total_contributions, 250);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("GITHUB_TOKEN", "ghp_abc"),
            ("CACHE_TTL_HOURS", "2"),
            ("TOP_REPOS", "6"),
            ("GITHUB_API_URL", "http://localhost:8080/"),
        ]))
        .unwrap();
        assert_eq!(config.github_token.as_deref(), Some("ghp_abc"));
        assert_eq!(config.api_base_url, "http://localhost:8080");
        assert_eq!(StatsConfig::from(&config).top_repos, 6);
        assert_eq!(StatsConfig::from(&config).cache_ttl, chrono::Duration::hours(2));
    }

    #[test]
    fn test_rejects_zero_ttl() {
        let result = Config::from_lookup(lookup_from(&[("CACHE_TTL_HOURS", "0")]));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_rejects_out_of_range_hours() {
        for (key, value) in [
            ("CACHE_TTL_HOURS", "9000000000000000"),
            ("REFRESH_INTERVAL_HOURS", "5124095576030432"),
            ("REFRESH_INTERVAL_HOURS", "-3"),
            ("CACHE_TTL_HOURS", "8761"),
        ] {
            let result = Config::from_lookup(lookup_from(&[(key, value)]));
            assert!(matches!(result, Err(Error::Config(_))), "{}={} accepted", key, value);
        }
    }

    #[test]
    fn test_upper_bound_hours_are_usable() {
        let limit = MAX_HOURS.to_string();
        let config = Config::from_lookup(lookup_from(&[
            ("CACHE_TTL_HOURS", limit.as_str()),
            ("REFRESH_INTERVAL_HOURS", limit.as_str()),
        ]))
        .unwrap();
        assert_eq!(config.refresh_interval(), std::time::Duration::from_secs(MAX_HOURS * 3600));
        assert_eq!(StatsConfig::from(&config).cache_ttl, chrono::Duration::days(365));
    }

    #[test]
    fn test_blank_token_is_ignored() {
        let config = Config::from_lookup(lookup_from(&[("GITHUB_TOKEN", "  ")])).unwrap();
        assert!(config.github_token.is_none());
    }
}
