//! Football win/loss streak tracker.
//!
//! Schedule pages are reduced to [`schedule::MatchRecord`]s, merged across
//! leagues and scanned by [`streaks::find_streaks`].

pub mod config;
pub mod error;
pub mod http_cache;
pub mod http_client;
pub mod leagues;
pub mod probe;
pub mod report;
pub mod schedule;
pub mod scrape;
pub mod streaks;
