use std::fs;
use std::path::PathBuf;

use streak_tracker::schedule::{MatchRecord, parse_schedule_html};
use streak_tracker::streaks::{Location, MatchResult, find_streaks, team_results, teams};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

fn eredivisie() -> Vec<MatchRecord> {
    parse_schedule_html(&read_fixture("eredivisie_schedule.html"), "Eredivisie", 23)
        .expect("fixture should parse")
}

fn record(date: &str, home: &str, away: &str, home_score: u32, away_score: u32) -> MatchRecord {
    MatchRecord {
        league_name: "Premier League".to_string(),
        league_id: 9,
        date: date.to_string(),
        home_team: home.to_string(),
        away_team: away.to_string(),
        home_score,
        away_score,
        home_xg: String::new(),
        away_xg: String::new(),
    }
}

#[test]
fn team_results_cover_every_match_exactly_once() {
    let matches = eredivisie();
    for team in teams(&matches) {
        let rows = team_results(&matches, &team);
        let involved = matches
            .iter()
            .filter(|m| m.home_team == team || m.away_team == team)
            .count();
        assert_eq!(rows.len(), involved, "{team}");

        let home = matches.iter().filter(|m| m.home_team == team).count();
        let tagged_home = rows.iter().filter(|r| r.location == Location::Home).count();
        assert_eq!(tagged_home, home, "{team}");
    }
}

#[test]
fn team_results_are_newest_first() {
    let matches = eredivisie();
    let rows = team_results(&matches, "Ajax");
    assert_eq!(rows.len(), 5);
    for pair in rows.windows(2) {
        assert!(pair[0].date >= pair[1].date);
    }
    let results: Vec<MatchResult> = rows.iter().map(|r| r.result).collect();
    assert_eq!(
        results,
        vec![
            MatchResult::Win,
            MatchResult::Win,
            MatchResult::Win,
            MatchResult::Loss,
            MatchResult::Draw,
        ]
    );
    assert_eq!(rows[1].location, Location::Away);
    assert_eq!(rows[1].opponent, "AZ Alkmaar");
    assert_eq!(rows[1].team_xg, "1.9");
}

#[test]
fn fixture_streaks() {
    let report = find_streaks(&eredivisie(), 3, 3);
    let wins: Vec<&str> = report.wins.iter().map(|g| g.team.as_str()).collect();
    let losses: Vec<&str> = report.losses.iter().map(|g| g.team.as_str()).collect();
    assert_eq!(wins, vec!["Ajax"]);
    assert_eq!(losses, vec!["Twente"]);
    assert_eq!(report.losses[0].games.len(), 3);
    assert!(
        report.losses[0]
            .games
            .iter()
            .all(|g| g.result == MatchResult::Loss)
    );
    let summary = report.summary();
    assert_eq!(summary.teams_on_win_streak, 1);
    assert_eq!(summary.teams_on_loss_streak, 1);
}

#[test]
fn three_wins_then_a_loss_qualifies() {
    // Arsenal, newest first: W W W L W.
    let matches = vec![
        record("2024-09-29", "Arsenal", "Wolves", 2, 0),
        record("2024-09-22", "Aston Villa", "Arsenal", 0, 2),
        record("2024-09-15", "Arsenal", "Brighton", 1, 0),
        record("2024-09-01", "Tottenham", "Arsenal", 1, 0),
        record("2024-08-24", "Arsenal", "Everton", 3, 0),
    ];
    let report = find_streaks(&matches, 3, 3);
    assert_eq!(report.wins.len(), 1);
    let group = &report.wins[0];
    assert_eq!(group.team, "Arsenal");
    assert_eq!(group.league_name, "Premier League");
    assert_eq!(group.games.len(), 3);
    assert_eq!(group.games[0].date, "2024-09-29");
    assert!(report.losses.is_empty());
}

#[test]
fn a_draw_in_the_window_breaks_the_streak() {
    let matches = vec![
        record("2024-09-29", "Arsenal", "Wolves", 2, 0),
        record("2024-09-22", "Aston Villa", "Arsenal", 0, 2),
        record("2024-09-15", "Arsenal", "Brighton", 1, 1),
        record("2024-09-01", "Tottenham", "Arsenal", 1, 0),
        record("2024-08-24", "Arsenal", "Everton", 3, 0),
    ];
    let report = find_streaks(&matches, 3, 3);
    assert!(report.wins.iter().all(|g| g.team != "Arsenal"));
    assert!(report.losses.iter().all(|g| g.team != "Arsenal"));
}

#[test]
fn a_draw_in_the_window_breaks_a_losing_run() {
    // Everton, newest first: L L D L L.
    let matches = vec![
        record("2024-09-29", "Arsenal", "Everton", 2, 0),
        record("2024-09-22", "Everton", "Fulham", 0, 1),
        record("2024-09-15", "Brighton", "Everton", 1, 1),
        record("2024-09-01", "Everton", "Chelsea", 0, 3),
        record("2024-08-24", "Wolves", "Everton", 2, 0),
    ];
    let report = find_streaks(&matches, 3, 3);
    assert!(report.losses.iter().all(|g| g.team != "Everton"));

    let report = find_streaks(&matches, 2, 2);
    let group = report
        .losses
        .iter()
        .find(|g| g.team == "Everton")
        .expect("two straight losses");
    assert_eq!(group.games.len(), 2);
    assert_eq!(group.games[1].date, "2024-09-22");
}

#[test]
fn dates_order_as_text_not_as_calendar() {
    // "Sep 5" > "Oct 1" as text, so it counts as the newer game.
    let matches = vec![
        record("Oct 1", "Newcastle", "Leeds", 2, 0),
        record("Sep 5", "Leeds", "Newcastle", 1, 0),
    ];
    let rows = team_results(&matches, "Newcastle");
    let dates: Vec<&str> = rows.iter().map(|r| r.date.as_str()).collect();
    assert_eq!(dates, vec!["Sep 5", "Oct 1"]);

    let report = find_streaks(&matches, 1, 1);
    let losers: Vec<&str> = report.losses.iter().map(|g| g.team.as_str()).collect();
    let winners: Vec<&str> = report.wins.iter().map(|g| g.team.as_str()).collect();
    assert_eq!(losers, vec!["Newcastle"]);
    assert_eq!(winners, vec!["Leeds"]);
}

#[test]
fn longer_streak_still_reports_exactly_the_window() {
    let matches: Vec<MatchRecord> = (1..=5)
        .map(|day| record(&format!("2024-09-0{day}"), "Liverpool", &format!("Team {day}"), 2, 1))
        .collect();
    let report = find_streaks(&matches, 3, 3);
    assert_eq!(report.wins.len(), 1);
    assert_eq!(report.wins[0].games.len(), 3);
    assert_eq!(report.wins[0].games[0].date, "2024-09-05");
    assert_eq!(report.wins[0].games[2].date, "2024-09-03");
}

#[test]
fn two_matches_is_not_enough_history() {
    let matches = vec![
        record("2024-09-01", "Chelsea", "Fulham", 3, 0),
        record("2024-09-08", "Brentford", "Chelsea", 0, 1),
    ];
    let report = find_streaks(&matches, 3, 3);
    assert!(report.wins.is_empty());
    assert!(report.losses.is_empty());
}

#[test]
fn uneven_lengths_use_the_longer_for_history() {
    // Two losses but the win length needs three games of history.
    let matches = vec![
        record("2024-09-01", "Fulham", "Chelsea", 0, 3),
        record("2024-09-08", "Brentford", "Fulham", 1, 0),
    ];
    let report = find_streaks(&matches, 3, 2);
    assert!(report.losses.is_empty());

    let report = find_streaks(&matches, 2, 2);
    let losers: Vec<&str> = report.losses.iter().map(|g| g.team.as_str()).collect();
    assert_eq!(losers, vec!["Fulham"]);
}

#[test]
fn empty_input_is_empty_report() {
    let report = find_streaks(&[], 3, 3);
    assert!(report.wins.is_empty());
    assert!(report.losses.is_empty());
    assert!(team_results(&[], "Ajax").is_empty());
}
