use serde::Serialize;

use crate::schedule::MatchRecord;

const FBREF_COMPS_URL: &str = "https://fbref.com/en/comps";

const DEFAULT_LEAGUES: &[(&str, u32)] = &[
    // Big 5
    ("Premier League", 9),
    ("La Liga", 12),
    ("Serie A", 11),
    ("Bundesliga", 20),
    ("Ligue 1", 13),
    // Next tier
    ("Eredivisie", 23),
    ("Primeira Liga", 32),
    ("Belgian Pro League", 37),
    ("Scottish Premiership", 40),
    ("Championship", 10),
    ("Süper Lig", 26),
    ("Austrian Bundesliga", 38),
    ("Swiss Super League", 46),
    ("Greek Super League", 27),
    ("Danish Superliga", 50),
    ("Swedish Allsvenskan", 29),
    ("Norwegian Eliteserien", 28),
    ("Ukrainian Premier League", 39),
    ("Polish Ekstraklasa", 36),
    ("Czech First League", 63),
    ("Croatian First Football League", 64),
    ("Serbian SuperLiga", 65),
    ("Romanian Liga I", 62),
    ("Bulgarian First League", 68),
    ("Hungarian NB I", 66),
    ("Slovenian PrvaLiga", 70),
    ("Slovak Super Liga", 69),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct League {
    pub name: String,
    pub id: u32,
}

impl League {
    pub fn new(name: impl Into<String>, id: u32) -> Self {
        Self {
            name: name.into(),
            id,
        }
    }

    pub fn schedule_url(&self) -> String {
        schedule_url(self.id)
    }
}

pub fn schedule_url(league_id: u32) -> String {
    format!("{FBREF_COMPS_URL}/{league_id}/schedule/")
}

/// Ordered name to competition id table. Passed around by value, never global.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeagueTable {
    leagues: Vec<League>,
}

impl Default for LeagueTable {
    fn default() -> Self {
        Self::new(
            DEFAULT_LEAGUES
                .iter()
                .map(|(name, id)| League::new(*name, *id))
                .collect(),
        )
    }
}

impl LeagueTable {
    pub fn new(leagues: Vec<League>) -> Self {
        Self { leagues }
    }

    pub fn all(&self) -> &[League] {
        &self.leagues
    }

    pub fn len(&self) -> usize {
        self.leagues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leagues.is_empty()
    }

    pub fn find(&self, name: &str) -> Option<&League> {
        let wanted = name.trim().to_lowercase();
        self.leagues.iter().find(|l| l.name.to_lowercase() == wanted)
    }

    /// Resolves a selection of names. An empty selection means every league.
    /// Unknown names are returned separately so the caller can report them.
    pub fn select(&self, names: &[String]) -> (Vec<League>, Vec<String>) {
        if names.is_empty() {
            return (self.leagues.clone(), Vec::new());
        }
        let mut picked: Vec<League> = Vec::new();
        let mut unknown = Vec::new();
        for name in names {
            match self.find(name) {
                Some(league) => {
                    if !picked.iter().any(|l| l.id == league.id) {
                        picked.push(league.clone());
                    }
                }
                None => unknown.push(name.clone()),
            }
        }
        (picked, unknown)
    }
}

/// Narrows merged results to one league before analysis.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LeagueFilter {
    #[default]
    All,
    Only(String),
}

impl LeagueFilter {
    pub fn from_arg(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => LeagueFilter::All,
            Some(name)
                if name.eq_ignore_ascii_case("all") || name.eq_ignore_ascii_case("all leagues") =>
            {
                LeagueFilter::All
            }
            Some(name) => LeagueFilter::Only(name.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            LeagueFilter::All => "All Leagues",
            LeagueFilter::Only(name) => name.as_str(),
        }
    }

    /// Case-insensitive, Unicode aware.
    pub fn accepts(&self, league_name: &str) -> bool {
        match self {
            LeagueFilter::All => true,
            LeagueFilter::Only(name) => league_name.to_lowercase() == name.to_lowercase(),
        }
    }

    pub fn apply(&self, matches: &[MatchRecord]) -> Vec<MatchRecord> {
        matches
            .iter()
            .filter(|m| self.accepts(&m.league_name))
            .cloned()
            .collect()
    }
}

/// League names present in the data, first-seen order.
pub fn leagues_present(matches: &[MatchRecord]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for m in matches {
        if !out.iter().any(|name| name == &m.league_name) {
            out.push(m.league_name.clone());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{LeagueFilter, LeagueTable, leagues_present, schedule_url};
    use crate::schedule::MatchRecord;

    fn record(league: &str) -> MatchRecord {
        MatchRecord {
            league_name: league.to_string(),
            league_id: 1,
            date: "2024-08-17".to_string(),
            home_team: "A".to_string(),
            away_team: "B".to_string(),
            home_score: 1,
            away_score: 0,
            home_xg: String::new(),
            away_xg: String::new(),
        }
    }

    #[test]
    fn default_table_has_every_league() {
        let table = LeagueTable::default();
        assert_eq!(table.len(), 27);
        assert_eq!(table.find("premier league").map(|l| l.id), Some(9));
        assert_eq!(table.find("SÜPER LIG").map(|l| l.id), Some(26));
    }

    #[test]
    fn schedule_url_uses_comp_id() {
        assert_eq!(schedule_url(23), "https://fbref.com/en/comps/23/schedule/");
    }

    #[test]
    fn select_reports_unknown_and_dedups() {
        let table = LeagueTable::default();
        let names = vec![
            "La Liga".to_string(),
            "la liga".to_string(),
            "Atlantis Cup".to_string(),
        ];
        let (picked, unknown) = table.select(&names);
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].id, 12);
        assert_eq!(unknown, vec!["Atlantis Cup".to_string()]);
    }

    #[test]
    fn empty_selection_is_everything() {
        let table = LeagueTable::default();
        let (picked, unknown) = table.select(&[]);
        assert_eq!(picked.len(), table.len());
        assert!(unknown.is_empty());
    }

    #[test]
    fn filter_keeps_only_named_league() {
        let matches = vec![record("Serie A"), record("Ligue 1"), record("Serie A")];
        assert_eq!(LeagueFilter::All.apply(&matches).len(), 3);
        let only = LeagueFilter::from_arg(Some("serie a"));
        assert_eq!(only.apply(&matches).len(), 2);
        assert_eq!(LeagueFilter::from_arg(Some("All Leagues")), LeagueFilter::All);
        assert_eq!(leagues_present(&matches), vec!["Serie A", "Ligue 1"]);
    }

    #[test]
    fn filter_folds_non_ascii_case() {
        let matches = vec![record("Süper Lig"), record("Serie A")];
        let only = LeagueFilter::from_arg(Some("SÜPER LIG"));
        assert!(only.accepts("Süper Lig"));
        assert!(!only.accepts("Serie A"));
        assert_eq!(only.apply(&matches).len(), 1);
        assert!(LeagueFilter::All.accepts("anything"));
    }
}
