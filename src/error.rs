use serde::Serialize;
use thiserror::Error;

/// Why a single league produced no records.
///
/// These never abort a scrape run; the fetch loop records them per league and
/// moves on to the next one.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum LeagueFailure {
    #[error("rate limited (HTTP 429), wait a few minutes and try again")]
    RateLimited,

    #[error("HTTP {0}")]
    HttpStatus(u16),

    #[error("request failed: {0}")]
    Transport(String),

    #[error("no schedule table found")]
    NoScheduleTable,

    #[error("schedule table has no header row")]
    NoHeaderRow,

    #[error("schedule table is missing the `{0}` column")]
    MissingColumn(&'static str),
}

impl LeagueFailure {
    /// Transport-level failures, as opposed to a page that loaded but did not
    /// look like a schedule.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            LeagueFailure::RateLimited | LeagueFailure::HttpStatus(_) | LeagueFailure::Transport(_)
        )
    }
}
