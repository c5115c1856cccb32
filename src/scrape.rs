use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::Utc;
use reqwest::blocking::Client;
use serde::Serialize;

use crate::config::AppConfig;
use crate::error::LeagueFailure;
use crate::http_cache;
use crate::http_client::http_client;
use crate::leagues::League;
use crate::schedule::{MatchRecord, parse_schedule_html};

/// One raw schedule page.
#[derive(Debug, Clone)]
pub struct Page {
    pub body: String,
    pub from_cache: bool,
}

/// Where schedule pages come from.
pub trait PageSource {
    fn fetch(&mut self, league: &League) -> Result<Page, LeagueFailure>;
}

/// Live pages over HTTP, behind the on-disk page cache, paced so consecutive
/// network requests are at least `delay` apart.
pub struct HttpPageSource {
    client: &'static Client,
    cache_ttl: Duration,
    bypass_cache: bool,
    delay: Duration,
    last_request: Option<Instant>,
}

impl HttpPageSource {
    pub fn new(config: &AppConfig, bypass_cache: bool) -> Result<Self> {
        Ok(Self {
            client: http_client(config.request_timeout)?,
            cache_ttl: config.cache_ttl,
            bypass_cache,
            delay: config.fetch_delay,
            last_request: None,
        })
    }

    fn pace(&mut self) {
        if let Some(last) = self.last_request {
            let waited = last.elapsed();
            if waited < self.delay {
                thread::sleep(self.delay - waited);
            }
        }
        self.last_request = Some(Instant::now());
    }
}

impl PageSource for HttpPageSource {
    fn fetch(&mut self, league: &League) -> Result<Page, LeagueFailure> {
        let url = league.schedule_url();
        if !self.bypass_cache
            && let Some(body) = http_cache::fresh_page(&url, self.cache_ttl)
        {
            return Ok(Page {
                body,
                from_cache: true,
            });
        }
        self.pace();
        log::debug!("GET {url}");
        let body = http_cache::fetch_page(self.client, &url)?;
        Ok(Page {
            body,
            from_cache: false,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LeagueOutcome {
    pub league: League,
    pub matches: usize,
    pub from_cache: bool,
    pub failure: Option<LeagueFailure>,
}

impl LeagueOutcome {
    pub fn has_data(&self) -> bool {
        self.failure.is_none() && self.matches > 0
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScrapeRun {
    pub outcomes: Vec<LeagueOutcome>,
    #[serde(skip)]
    pub matches: Vec<MatchRecord>,
    pub elapsed_secs: f64,
    pub finished_at: String,
}

impl ScrapeRun {
    pub fn leagues_with_data(&self) -> usize {
        self.outcomes.iter().filter(|o| o.has_data()).count()
    }

    /// True when every league failed or came back empty.
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&League, &LeagueFailure)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.failure.as_ref().map(|f| (&o.league, f)))
    }
}

/// Fetches and extracts every league in order. A failing league is recorded
/// in its outcome and never stops the run.
pub fn scrape_leagues<S, F>(source: &mut S, leagues: &[League], mut on_progress: F) -> ScrapeRun
where
    S: PageSource + ?Sized,
    F: FnMut(usize, usize, &League),
{
    let started = Instant::now();
    let total = leagues.len();
    let mut outcomes = Vec::with_capacity(total);
    let mut matches = Vec::new();

    for (idx, league) in leagues.iter().enumerate() {
        on_progress(idx, total, league);

        let fetched = source.fetch(league);
        let from_cache = fetched.as_ref().is_ok_and(|p| p.from_cache);
        let parsed =
            fetched.and_then(|page| parse_schedule_html(&page.body, &league.name, league.id));

        let outcome = match parsed {
            Ok(records) => {
                if records.is_empty() {
                    log::warn!("{}: no data", league.name);
                } else {
                    log::info!("{}: {} matches", league.name, records.len());
                }
                let count = records.len();
                matches.extend(records);
                LeagueOutcome {
                    league: league.clone(),
                    matches: count,
                    from_cache,
                    failure: None,
                }
            }
            Err(failure) => {
                if failure.is_transport() {
                    log::warn!("{}: {failure}", league.name);
                } else {
                    log::error!("{}: page loaded but {failure}", league.name);
                }
                LeagueOutcome {
                    league: league.clone(),
                    matches: 0,
                    from_cache,
                    failure: Some(failure),
                }
            }
        };
        outcomes.push(outcome);
    }

    ScrapeRun {
        outcomes,
        matches,
        elapsed_secs: started.elapsed().as_secs_f64(),
        finished_at: Utc::now().to_rfc3339(),
    }
}
