use std::fmt::Write as _;

use serde::Serialize;

use crate::leagues::LeagueFilter;
use crate::scrape::ScrapeRun;
use crate::streaks::{StreakGroup, StreakReport, StreakSummary};

const GAME_COLUMNS: [&str; 8] = [
    "Date", "Opponent", "H/A", "Score", "Opp", "xG", "Opp xG", "Result",
];

pub const NO_DATA_HELP: &str = "\
No data scraped from any league.

If the site answered with HTTP 429 it is rate limiting this client:
  1. Wait 5-10 minutes before trying again.
  2. Re-run with --refresh only once the wait is over.
  3. Probe a single league with the `probe` binary.
Pages are cached for an hour, so a second run right away costs no requests.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakKind {
    Win,
    Loss,
}

impl StreakKind {
    fn plural(self) -> &'static str {
        match self {
            StreakKind::Win => "Wins",
            StreakKind::Loss => "Losses",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub filter: &'a str,
    pub scrape: &'a ScrapeRun,
    pub summary: StreakSummary,
    pub streaks: &'a StreakReport,
}

impl<'a> JsonReport<'a> {
    pub fn new(run: &'a ScrapeRun, filter: &'a LeagueFilter, streaks: &'a StreakReport) -> Self {
        Self {
            filter: filter.label(),
            scrape: run,
            summary: streaks.summary(),
            streaks,
        }
    }
}

/// Per-league status lines plus the run total.
pub fn render_outcomes(run: &ScrapeRun) -> String {
    let mut out = String::new();
    for outcome in &run.outcomes {
        let name = &outcome.league.name;
        match &outcome.failure {
            Some(failure) => {
                let _ = writeln!(out, "x {name}: {failure}");
            }
            None if outcome.matches == 0 => {
                let _ = writeln!(out, "x {name}: No data");
            }
            None => {
                let cached = if outcome.from_cache { " (cached)" } else { "" };
                let _ = writeln!(out, "+ {name}: {} matches{cached}", outcome.matches);
            }
        }
    }
    let _ = writeln!(out, "Scraping completed in {:.1} seconds", run.elapsed_secs);
    if !run.is_empty() {
        let _ = writeln!(
            out,
            "Loaded {} matches from {} leagues",
            run.matches.len(),
            run.leagues_with_data()
        );
    }
    out
}

pub fn render_streaks(report: &StreakReport, filter: &LeagueFilter) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "League: {}", filter.label());
    let _ = writeln!(out);
    out.push_str(&render_section(&report.wins, report.win_length, StreakKind::Win));
    let _ = writeln!(out);
    out.push_str(&render_section(&report.losses, report.loss_length, StreakKind::Loss));
    let _ = writeln!(out);

    let summary = report.summary();
    let _ = writeln!(out, "Summary");
    let _ = writeln!(
        out,
        "  Teams on {}-Win Streak: {}",
        report.win_length, summary.teams_on_win_streak
    );
    let _ = writeln!(
        out,
        "  Teams on {}-Loss Streak: {}",
        report.loss_length, summary.teams_on_loss_streak
    );
    out
}

pub fn render_section(groups: &[StreakGroup], length: usize, kind: StreakKind) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Teams with {length} Consecutive {}", kind.plural());
    if groups.is_empty() {
        let _ = writeln!(
            out,
            "  No teams with exactly {length} consecutive {}",
            kind.plural().to_lowercase()
        );
        return out;
    }
    for group in groups {
        let _ = writeln!(out, "  {} ({})", group.team, group.league_name);
        out.push_str(&render_games(group));
    }
    out
}

fn render_games(group: &StreakGroup) -> String {
    let rows: Vec<[String; 8]> = group
        .games
        .iter()
        .map(|g| {
            [
                g.date.clone(),
                g.opponent.clone(),
                g.location.code().to_string(),
                g.team_score.to_string(),
                g.opp_score.to_string(),
                g.team_xg.clone(),
                g.opp_xg.clone(),
                g.result.code().to_string(),
            ]
        })
        .collect();

    let mut widths = GAME_COLUMNS.map(|h| h.chars().count());
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, GAME_COLUMNS.iter().copied(), &widths);
    for row in &rows {
        push_row(&mut out, row.iter().map(String::as_str), &widths);
    }
    out
}

fn push_row<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    out.push_str("    ");
    let line = cells
        .zip(widths)
        .map(|(cell, w)| {
            let pad = w.saturating_sub(cell.chars().count());
            format!("{cell}{}", " ".repeat(pad))
        })
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::{StreakKind, render_section};
    use crate::streaks::{Location, MatchResult, StreakGroup, TeamResultRow};

    fn game(date: &str, opponent: &str) -> TeamResultRow {
        TeamResultRow {
            date: date.to_string(),
            opponent: opponent.to_string(),
            location: Location::Home,
            team_score: 2,
            opp_score: 0,
            team_xg: "1.8".to_string(),
            opp_xg: String::new(),
            result: MatchResult::Win,
            league_name: "Eredivisie".to_string(),
            league_id: 23,
        }
    }

    #[test]
    fn empty_section_says_so() {
        let text = render_section(&[], 4, StreakKind::Loss);
        assert!(text.starts_with("Teams with 4 Consecutive Losses"));
        assert!(text.contains("No teams with exactly 4 consecutive losses"));
    }

    #[test]
    fn section_lists_games_under_team() {
        let group = StreakGroup {
            team: "Ajax".to_string(),
            league_name: "Eredivisie".to_string(),
            league_id: 23,
            games: vec![game("2024-09-15", "PSV"), game("2024-09-01", "AZ Alkmaar")],
        };
        let text = render_section(&[group], 2, StreakKind::Win);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Teams with 2 Consecutive Wins");
        assert_eq!(lines[1], "  Ajax (Eredivisie)");
        assert!(lines[2].trim_start().starts_with("Date"));
        assert!(lines[3].contains("2024-09-15") && lines[3].contains("PSV"));
        assert!(lines[4].contains("AZ Alkmaar"));
        assert!(lines[4].trim_end().ends_with('W'));
    }
}
