use std::collections::HashMap;

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};

use crate::error::LeagueFailure;

static SCHED_DIV: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div[id^='div_sched_']").expect("valid selector"));
static TABLE: Lazy<Selector> = Lazy::new(|| Selector::parse("table").expect("valid selector"));
static SCHED_TABLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("table[id^='sched_']").expect("valid selector"));
static THEAD_ROW: Lazy<Selector> =
    Lazy::new(|| Selector::parse("thead > tr").expect("valid selector"));
static TBODY_ROW: Lazy<Selector> =
    Lazy::new(|| Selector::parse("tbody > tr").expect("valid selector"));

const COL_DATE: &str = "Date";
const COL_HOME: &str = "Home";
const COL_SCORE: &str = "Score";
const COL_AWAY: &str = "Away";
const COL_XG: &str = "xG";

const EN_DASH: char = '\u{2013}';

/// One played fixture, as read from a league schedule table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub league_name: String,
    pub league_id: u32,
    // Source-native text, e.g. "2024-08-17". Only used for ordering and display.
    pub date: String,
    pub home_team: String,
    pub away_team: String,
    pub home_score: u32,
    pub away_score: u32,
    pub home_xg: String,
    pub away_xg: String,
}

/// Header name to position, built fresh for every table.
#[derive(Debug, Clone, Default)]
pub struct ColumnMap {
    headers: Vec<String>,
    by_name: HashMap<String, usize>,
}

impl ColumnMap {
    pub fn from_headers(headers: Vec<String>) -> Self {
        let mut by_name = HashMap::with_capacity(headers.len());
        // Later duplicates overwrite earlier ones.
        for (idx, name) in headers.iter().enumerate() {
            by_name.insert(name.clone(), idx);
        }
        Self { headers, by_name }
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    /// Every position whose header is exactly `name`, left to right.
    pub fn positions_of(&self, name: &str) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .filter(|(_, h)| h.as_str() == name)
            .map(|(idx, _)| idx)
            .collect()
    }

    pub fn resolve(&self) -> Result<ScheduleColumns, LeagueFailure> {
        let required = |name: &'static str| {
            self.index_of(name).ok_or(LeagueFailure::MissingColumn(name))
        };
        let date = required(COL_DATE)?;
        let home = required(COL_HOME)?;
        let score = required(COL_SCORE)?;
        let away = required(COL_AWAY)?;

        let xg = self.positions_of(COL_XG);
        Ok(ScheduleColumns {
            date,
            home,
            score,
            away,
            home_xg: xg.first().copied(),
            away_xg: xg.get(1).copied(),
        })
    }
}

/// Resolved positions of the columns the extractor reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleColumns {
    pub date: usize,
    pub home: usize,
    pub score: usize,
    pub away: usize,
    pub home_xg: Option<usize>,
    pub away_xg: Option<usize>,
}

impl ScheduleColumns {
    pub fn max_required(&self) -> usize {
        self.date.max(self.home).max(self.score).max(self.away)
    }
}

/// Extracts match records, folding any document-level failure into an empty
/// result. Use [`extract_schedule`] when the reason matters.
pub fn extract(document: &Html, league_name: &str, league_id: u32) -> Vec<MatchRecord> {
    match extract_schedule(document, league_name, league_id) {
        Ok(rows) => rows,
        Err(err) => {
            log::warn!("{league_name}: {err}");
            Vec::new()
        }
    }
}

pub fn parse_schedule_html(
    html: &str,
    league_name: &str,
    league_id: u32,
) -> Result<Vec<MatchRecord>, LeagueFailure> {
    let document = Html::parse_document(html);
    extract_schedule(&document, league_name, league_id)
}

pub fn extract_schedule(
    document: &Html,
    league_name: &str,
    league_id: u32,
) -> Result<Vec<MatchRecord>, LeagueFailure> {
    let table = find_schedule_table(document).ok_or(LeagueFailure::NoScheduleTable)?;

    // Tables may carry a grouping row above the real column names.
    let header_row = table
        .select(&THEAD_ROW)
        .last()
        .ok_or(LeagueFailure::NoHeaderRow)?;
    let headers = row_cells(header_row).into_iter().map(cell_text).collect();
    let columns = ColumnMap::from_headers(headers).resolve()?;
    let min_cells = columns.max_required() + 1;

    let mut out = Vec::new();
    let mut skipped = 0usize;
    for row in table.select(&TBODY_ROW) {
        if row.value().classes().any(|c| c == "spacer") {
            continue;
        }
        let cells = row_cells(row);
        if cells.len() < min_cells {
            skipped += 1;
            continue;
        }
        match parse_row(&cells, &columns, league_name, league_id) {
            Some(record) => out.push(record),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        log::debug!("{league_name}: skipped {skipped} rows without a usable score");
    }
    Ok(out)
}

/// Splits a score cell like `2–1` or `0-0` into (home, away).
pub fn parse_score(raw: &str) -> Option<(u32, u32)> {
    let sep = if raw.contains(EN_DASH) {
        EN_DASH
    } else if raw.contains('-') {
        '-'
    } else {
        return None;
    };
    let (home, away) = raw.split_once(sep)?;
    let home = home.trim().parse::<u32>().ok()?;
    let away = away.trim().parse::<u32>().ok()?;
    Some((home, away))
}

/// The table inside the first `div_sched_*` wrapper. Later wrappers are not
/// consulted. Pages without any wrapper fall back to a bare `sched_*` table.
fn find_schedule_table(document: &Html) -> Option<ElementRef<'_>> {
    match document.select(&SCHED_DIV).next() {
        Some(div) => div.select(&TABLE).next(),
        None => document.select(&SCHED_TABLE).next(),
    }
}

fn parse_row(
    cells: &[ElementRef<'_>],
    columns: &ScheduleColumns,
    league_name: &str,
    league_id: u32,
) -> Option<MatchRecord> {
    let score = cell_text(cells[columns.score]);
    if score.is_empty() {
        return None;
    }
    let (home_score, away_score) = parse_score(&score)?;

    let optional = |idx: Option<usize>| {
        idx.and_then(|i| cells.get(i))
            .map(|cell| cell_text(*cell))
            .unwrap_or_default()
    };

    Some(MatchRecord {
        league_name: league_name.to_string(),
        league_id,
        date: cell_text(cells[columns.date]),
        home_team: cell_text(cells[columns.home]),
        away_team: cell_text(cells[columns.away]),
        home_score,
        away_score,
        home_xg: optional(columns.home_xg),
        away_xg: optional(columns.away_xg),
    })
}

/// Direct `th`/`td` children only, so nested markup can't shift positions.
fn row_cells(row: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|el| matches!(el.value().name(), "th" | "td"))
        .collect()
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .concat()
}
