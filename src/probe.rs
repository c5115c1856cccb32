use once_cell::sync::Lazy;
use reqwest::blocking::Client;
use scraper::{Html, Selector};

use crate::leagues::League;

static DIV_WITH_ID: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div[id]").expect("valid selector"));

const MAX_LISTED_DIVS: usize = 3;

/// Result of hitting one league's schedule page directly, bypassing the cache.
#[derive(Debug, Clone)]
pub struct ProbeReport {
    pub league: League,
    pub url: String,
    pub status: Option<u16>,
    pub schedule_divs_found: usize,
    pub schedule_div_ids: Vec<String>,
    pub error: Option<String>,
}

impl ProbeReport {
    pub fn ok(&self) -> bool {
        self.status == Some(200) && self.error.is_none()
    }
}

/// Transport problems land in `error`; this never fails outright.
pub fn probe_league(client: &Client, league: &League) -> ProbeReport {
    let url = league.schedule_url();
    let mut report = ProbeReport {
        league: league.clone(),
        url: url.clone(),
        status: None,
        schedule_divs_found: 0,
        schedule_div_ids: Vec::new(),
        error: None,
    };

    let resp = match client.get(&url).send() {
        Ok(resp) => resp,
        Err(err) => {
            report.error = Some(err.to_string());
            return report;
        }
    };
    let status = resp.status();
    report.status = Some(status.as_u16());
    if !status.is_success() {
        report.error = Some("failed to load page".to_string());
        return report;
    }

    let body = match resp.text() {
        Ok(body) => body,
        Err(err) => {
            report.error = Some(format!("failed reading body: {err}"));
            return report;
        }
    };
    let ids = schedule_div_ids(&body);
    report.schedule_divs_found = ids.len();
    report.schedule_div_ids = ids.into_iter().take(MAX_LISTED_DIVS).collect();
    report
}

/// Ids of every `div` whose id mentions `sched`, in document order.
pub fn schedule_div_ids(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    document
        .select(&DIV_WITH_ID)
        .filter_map(|div| div.value().attr("id"))
        .filter(|id| id.contains("sched"))
        .map(str::to_string)
        .collect()
}
