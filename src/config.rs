use std::env;
use std::time::Duration;

pub const MIN_STREAK_LENGTH: usize = 1;
pub const MAX_STREAK_LENGTH: usize = 10;

const DEFAULT_STREAK_LENGTH: usize = 3;
const DEFAULT_FETCH_DELAY_SECS: u64 = 3;
const DEFAULT_CACHE_TTL_SECS: u64 = 3600;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub win_length: usize,
    pub loss_length: usize,
    // Pause between consecutive network fetches.
    pub fetch_delay: Duration,
    pub cache_ttl: Duration,
    pub request_timeout: Duration,
    // Empty means every league in the table.
    pub leagues: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            win_length: DEFAULT_STREAK_LENGTH,
            loss_length: DEFAULT_STREAK_LENGTH,
            fetch_delay: Duration::from_secs(DEFAULT_FETCH_DELAY_SECS),
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            leagues: Vec::new(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`] but reading through `lookup`, so callers
    /// (and tests) can supply values without touching the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let num = |key: &str| lookup(key).and_then(|v| v.trim().parse::<u64>().ok());

        let win_length = num("STREAK_WIN_LENGTH")
            .map(|v| clamp_streak(v as usize))
            .unwrap_or(DEFAULT_STREAK_LENGTH);
        let loss_length = num("STREAK_LOSS_LENGTH")
            .map(|v| clamp_streak(v as usize))
            .unwrap_or(DEFAULT_STREAK_LENGTH);
        let fetch_delay = num("STREAK_FETCH_DELAY_SECS")
            .unwrap_or(DEFAULT_FETCH_DELAY_SECS)
            .min(60);
        let cache_ttl = num("STREAK_CACHE_TTL_SECS").unwrap_or(DEFAULT_CACHE_TTL_SECS);
        let request_timeout = num("STREAK_REQUEST_TIMEOUT_SECS")
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS)
            .clamp(1, 120);
        let leagues = lookup("STREAK_LEAGUES")
            .map(|raw| parse_name_list(&raw))
            .unwrap_or_default();

        Self {
            win_length,
            loss_length,
            fetch_delay: Duration::from_secs(fetch_delay),
            cache_ttl: Duration::from_secs(cache_ttl),
            request_timeout: Duration::from_secs(request_timeout),
            leagues,
        }
    }
}

pub fn clamp_streak(value: usize) -> usize {
    value.clamp(MIN_STREAK_LENGTH, MAX_STREAK_LENGTH)
}

/// League names contain spaces, so only `,` and `;` separate entries.
pub fn parse_name_list(raw: &str) -> Vec<String> {
    raw.split([',', ';'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
