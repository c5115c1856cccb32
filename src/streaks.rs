use std::cmp::Ordering;
use std::collections::BTreeSet;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schedule::MatchRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Location {
    Home,
    Away,
}

impl Location {
    pub fn code(self) -> &'static str {
        match self {
            Location::Home => "H",
            Location::Away => "A",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchResult {
    Win,
    Loss,
    Draw,
}

impl MatchResult {
    pub fn from_scores(team_score: u32, opp_score: u32) -> Self {
        match team_score.cmp(&opp_score) {
            Ordering::Greater => MatchResult::Win,
            Ordering::Less => MatchResult::Loss,
            Ordering::Equal => MatchResult::Draw,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            MatchResult::Win => "W",
            MatchResult::Loss => "L",
            MatchResult::Draw => "D",
        }
    }
}

/// A fixture seen from one participant's side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamResultRow {
    pub date: String,
    pub opponent: String,
    pub location: Location,
    pub team_score: u32,
    pub opp_score: u32,
    pub team_xg: String,
    pub opp_xg: String,
    pub result: MatchResult,
    pub league_name: String,
    pub league_id: u32,
}

impl TeamResultRow {
    fn home_side(m: &MatchRecord) -> Self {
        Self {
            date: m.date.clone(),
            opponent: m.away_team.clone(),
            location: Location::Home,
            team_score: m.home_score,
            opp_score: m.away_score,
            team_xg: m.home_xg.clone(),
            opp_xg: m.away_xg.clone(),
            result: MatchResult::from_scores(m.home_score, m.away_score),
            league_name: m.league_name.clone(),
            league_id: m.league_id,
        }
    }

    fn away_side(m: &MatchRecord) -> Self {
        Self {
            date: m.date.clone(),
            opponent: m.home_team.clone(),
            location: Location::Away,
            team_score: m.away_score,
            opp_score: m.home_score,
            team_xg: m.away_xg.clone(),
            opp_xg: m.home_xg.clone(),
            result: MatchResult::from_scores(m.away_score, m.home_score),
            league_name: m.league_name.clone(),
            league_id: m.league_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakGroup {
    pub team: String,
    pub league_name: String,
    pub league_id: u32,
    pub games: Vec<TeamResultRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakReport {
    pub win_length: usize,
    pub loss_length: usize,
    pub wins: Vec<StreakGroup>,
    pub losses: Vec<StreakGroup>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StreakSummary {
    pub teams_on_win_streak: usize,
    pub teams_on_loss_streak: usize,
}

impl StreakReport {
    pub fn summary(&self) -> StreakSummary {
        StreakSummary {
            teams_on_win_streak: self.wins.len(),
            teams_on_loss_streak: self.losses.len(),
        }
    }
}

/// Every distinct home or away name, sorted.
pub fn teams(matches: &[MatchRecord]) -> Vec<String> {
    let mut set = BTreeSet::new();
    for m in matches {
        set.insert(m.home_team.as_str());
        set.insert(m.away_team.as_str());
    }
    set.into_iter().map(str::to_string).collect()
}

/// All results for `team`, most recent first.
///
/// Ordering compares the raw `date` text, so it is only chronological when the
/// source uses a sortable format such as `YYYY-MM-DD`. Rows with equal dates
/// keep home-before-away, table order.
pub fn team_results(matches: &[MatchRecord], team: &str) -> Vec<TeamResultRow> {
    let home = matches
        .iter()
        .filter(|m| m.home_team == team)
        .map(TeamResultRow::home_side);
    let away = matches
        .iter()
        .filter(|m| m.away_team == team)
        .map(TeamResultRow::away_side);

    let mut rows: Vec<TeamResultRow> = home.chain(away).collect();
    rows.sort_by(|a, b| b.date.cmp(&a.date));
    rows
}

/// Teams whose latest `win_length` results are all wins, and separately those
/// whose latest `loss_length` results are all losses.
pub fn find_streaks(
    matches: &[MatchRecord],
    win_length: usize,
    loss_length: usize,
) -> StreakReport {
    let needed = win_length.max(loss_length);

    let per_team: Vec<(Option<StreakGroup>, Option<StreakGroup>)> = teams(matches)
        .into_par_iter()
        .filter_map(|team| {
            let results = team_results(matches, &team);
            if results.len() < needed {
                return None;
            }
            let win = leading_streak(&team, &results, win_length, MatchResult::Win);
            let loss = leading_streak(&team, &results, loss_length, MatchResult::Loss);
            Some((win, loss))
        })
        .collect();

    let mut wins = Vec::new();
    let mut losses = Vec::new();
    for (win, loss) in per_team {
        wins.extend(win);
        losses.extend(loss);
    }
    wins.sort_by(group_order);
    losses.sort_by(group_order);

    StreakReport {
        win_length,
        loss_length,
        wins,
        losses,
    }
}

fn leading_streak(
    team: &str,
    results: &[TeamResultRow],
    length: usize,
    want: MatchResult,
) -> Option<StreakGroup> {
    if length == 0 || results.len() < length {
        return None;
    }
    let window = &results[..length];
    if !window.iter().all(|r| r.result == want) {
        return None;
    }
    let latest = &window[0];
    Some(StreakGroup {
        team: team.to_string(),
        league_name: latest.league_name.clone(),
        league_id: latest.league_id,
        games: window.to_vec(),
    })
}

fn group_order(a: &StreakGroup, b: &StreakGroup) -> Ordering {
    a.league_name
        .cmp(&b.league_name)
        .then_with(|| a.team.cmp(&b.team))
}
