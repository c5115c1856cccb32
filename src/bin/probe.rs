use anyhow::{Result, anyhow};

use streak_tracker::config::AppConfig;
use streak_tracker::http_client::http_client;
use streak_tracker::leagues::LeagueTable;
use streak_tracker::probe::probe_league;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let name = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    let table = LeagueTable::default();
    let league = if name.trim().is_empty() {
        table.all().first().cloned()
    } else {
        table.find(&name).cloned()
    }
    .ok_or_else(|| anyhow!("unknown league {name:?}"))?;

    let config = AppConfig::from_env();
    let client = http_client(config.request_timeout)?;

    log::info!("Testing {}...", league.name);
    let report = probe_league(client, &league);

    println!("URL: {}", report.url);
    match report.status {
        Some(status) => println!("Status: {status}"),
        None => println!("Status: no response"),
    }
    if let Some(err) = &report.error {
        println!("Error: {err}");
    }
    if report.ok() {
        println!("Found {} schedule divs:", report.schedule_divs_found);
        for id in &report.schedule_div_ids {
            println!("  {id}");
        }
    }
    Ok(())
}
