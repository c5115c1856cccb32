use anyhow::{Context, Result, anyhow};

use streak_tracker::config::{AppConfig, clamp_streak};
use streak_tracker::http_cache;
use streak_tracker::leagues::{LeagueFilter, LeagueTable, leagues_present};
use streak_tracker::report::{self, JsonReport};
use streak_tracker::scrape::{HttpPageSource, scrape_leagues};
use streak_tracker::streaks::{StreakReport, find_streaks};

const USAGE: &str = "\
usage: streak_tracker [options]

  --win N            winning streak length (1-10, default 3)
  --loss N           losing streak length (1-10, default 3)
  --league NAME      fetch only this league (repeatable; default all)
  --filter NAME      analyse only this league after fetching
  --refresh          ignore cached pages younger than the cache TTL
  --clear-cache      delete the page cache before fetching
  --json             print the result as JSON
  --list-leagues     print the league table and exit";

#[derive(Debug, Default)]
struct Args {
    win: Option<usize>,
    loss: Option<usize>,
    leagues: Vec<String>,
    filter: Option<String>,
    refresh: bool,
    clear_cache: bool,
    json: bool,
    list_leagues: bool,
    help: bool,
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_args(std::env::args().skip(1))?;
    if args.help {
        println!("{USAGE}");
        return Ok(());
    }

    let table = LeagueTable::default();
    if args.list_leagues {
        for league in table.all() {
            println!("{:>3}  {}", league.id, league.name);
        }
        return Ok(());
    }

    let mut config = AppConfig::from_env();
    if let Some(win) = args.win {
        config.win_length = clamp_streak(win);
    }
    if let Some(loss) = args.loss {
        config.loss_length = clamp_streak(loss);
    }
    if !args.leagues.is_empty() {
        config.leagues = args.leagues.clone();
    }

    let (selected, unknown) = table.select(&config.leagues);
    for name in &unknown {
        log::warn!("unknown league {name:?}, skipping");
    }
    if selected.is_empty() {
        return Err(anyhow!("no known leagues selected (see --list-leagues)"));
    }

    if args.clear_cache {
        http_cache::clear().context("clear page cache")?;
    }

    log::info!(
        "Looking for {}-game win streaks and {}-game loss streaks across {} leagues",
        config.win_length,
        config.loss_length,
        selected.len()
    );

    let mut source = HttpPageSource::new(&config, args.refresh)?;
    let run = scrape_leagues(&mut source, &selected, |idx, total, league| {
        log::info!("Scraping {}... ({}/{})", league.name, idx + 1, total);
    });

    if run.is_empty() {
        if args.json {
            let empty = StreakReport {
                win_length: config.win_length,
                loss_length: config.loss_length,
                ..Default::default()
            };
            let all = LeagueFilter::All;
            let json = JsonReport::new(&run, &all, &empty);
            println!("{}", serde_json::to_string_pretty(&json)?);
        } else {
            print!("{}", report::render_outcomes(&run));
            println!();
            println!("{}", report::NO_DATA_HELP);
        }
        return Ok(());
    }

    let filter = LeagueFilter::from_arg(args.filter.as_deref());
    if let LeagueFilter::Only(name) = &filter {
        let present = leagues_present(&run.matches);
        if !present.iter().any(|p| filter.accepts(p)) {
            log::warn!("no data for {name:?}; available: {}", present.join(", "));
        }
    }
    let matches = filter.apply(&run.matches);
    let streaks = find_streaks(&matches, config.win_length, config.loss_length);

    if args.json {
        let json = JsonReport::new(&run, &filter, &streaks);
        println!("{}", serde_json::to_string_pretty(&json)?);
    } else {
        print!("{}", report::render_outcomes(&run));
        println!();
        print!("{}", report::render_streaks(&streaks, &filter));
    }
    Ok(())
}

fn parse_args(mut raw: impl Iterator<Item = String>) -> Result<Args> {
    let mut args = Args::default();
    while let Some(arg) = raw.next() {
        let (flag, inline) = match arg.split_once('=') {
            Some((flag, value)) if flag.starts_with("--") => {
                (flag.to_string(), Some(value.to_string()))
            }
            _ => (arg.clone(), None),
        };
        let mut value = |name: &str| -> Result<String> {
            inline
                .clone()
                .or_else(|| raw.next())
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| anyhow!("{name} needs a value"))
        };
        match flag.as_str() {
            "--win" => args.win = Some(parse_length(&value("--win")?)?),
            "--loss" => args.loss = Some(parse_length(&value("--loss")?)?),
            "--league" => args.leagues.push(value("--league")?),
            "--filter" => args.filter = Some(value("--filter")?),
            "--refresh" => args.refresh = true,
            "--clear-cache" => args.clear_cache = true,
            "--json" => args.json = true,
            "--list-leagues" => args.list_leagues = true,
            "-h" | "--help" => args.help = true,
            other => return Err(anyhow!("unknown argument {other:?}\n\n{USAGE}")),
        }
    }
    Ok(args)
}

fn parse_length(raw: &str) -> Result<usize> {
    raw.trim()
        .parse::<usize>()
        .with_context(|| format!("invalid streak length {raw:?}"))
}
