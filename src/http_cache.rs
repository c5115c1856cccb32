use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::{ETAG, HeaderName, IF_MODIFIED_SINCE, IF_NONE_MATCH, LAST_MODIFIED};
use serde::{Deserialize, Serialize};

use crate::error::LeagueFailure;

const CACHE_VERSION: u32 = 1;
const CACHE_DIR: &str = "streak_tracker";
const CACHE_FILE: &str = "page_cache.json";

static CACHE: Mutex<Option<PageCacheFile>> = Mutex::new(None);

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PageCacheFile {
    version: u32,
    entries: HashMap<String, CacheEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    body: String,
    etag: Option<String>,
    last_modified: Option<String>,
    fetched_at: i64,
}

/// Returns the cached body for `url` if it was stored less than `ttl` ago.
/// A zero `ttl` never hits.
pub fn fresh_page(url: &str, ttl: Duration) -> Option<String> {
    let mut guard = CACHE.lock().unwrap_or_else(PoisonError::into_inner);
    let cache = guard.get_or_insert_with(load_cache_file);
    let entry = cache.entries.get(url)?;
    if is_fresh(entry.fetched_at, Utc::now().timestamp(), ttl) {
        log::debug!("cache hit: {url}");
        Some(entry.body.clone())
    } else {
        None
    }
}

/// Fetches `url`, revalidating any stale cached copy, and stores the result.
pub fn fetch_page(client: &Client, url: &str) -> Result<String, LeagueFailure> {
    let cached_entry = {
        let mut guard = CACHE.lock().unwrap_or_else(PoisonError::into_inner);
        let cache = guard.get_or_insert_with(load_cache_file);
        cache.entries.get(url).cloned()
    };

    let mut req = client.get(url);
    if let Some(entry) = cached_entry.as_ref() {
        if let Some(etag) = entry.etag.as_ref() {
            req = req.header(IF_NONE_MATCH, etag);
        }
        if let Some(last_modified) = entry.last_modified.as_ref() {
            req = req.header(IF_MODIFIED_SINCE, last_modified);
        }
    }

    let resp = req
        .send()
        .map_err(|err| LeagueFailure::Transport(err.to_string()))?;
    let status = resp.status();
    if status == StatusCode::NOT_MODIFIED {
        if let Some(mut entry) = cached_entry {
            entry.fetched_at = Utc::now().timestamp();
            let body = entry.body.clone();
            store_entry(url, entry);
            return Ok(body);
        }
        return Err(LeagueFailure::Transport(
            "received 304 without a cached body".to_string(),
        ));
    }
    check_status(status)?;

    let header_text = |name: HeaderName| {
        resp.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string())
    };
    let etag = header_text(ETAG);
    let last_modified = header_text(LAST_MODIFIED);

    let body = resp
        .text()
        .map_err(|err| LeagueFailure::Transport(format!("failed reading body: {err}")))?;

    store_entry(
        url,
        CacheEntry {
            body: body.clone(),
            etag,
            last_modified,
            fetched_at: Utc::now().timestamp(),
        },
    );
    Ok(body)
}

/// Maps an HTTP status onto the per-league failure taxonomy.
pub fn check_status(status: StatusCode) -> Result<(), LeagueFailure> {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(LeagueFailure::RateLimited);
    }
    if !status.is_success() {
        return Err(LeagueFailure::HttpStatus(status.as_u16()));
    }
    Ok(())
}

pub fn is_fresh(fetched_at: i64, now: i64, ttl: Duration) -> bool {
    if ttl.is_zero() {
        return false;
    }
    let age = now.saturating_sub(fetched_at);
    age >= 0 && (age as u64) < ttl.as_secs()
}

/// Drops every cached page, in memory and on disk.
pub fn clear() -> Result<()> {
    let mut guard = CACHE.lock().unwrap_or_else(PoisonError::into_inner);
    *guard = Some(PageCacheFile {
        version: CACHE_VERSION,
        entries: HashMap::new(),
    });
    let Some(path) = cache_path() else {
        return Ok(());
    };
    if path.exists() {
        fs::remove_file(&path).with_context(|| format!("remove {}", path.display()))?;
    }
    Ok(())
}

pub fn app_cache_dir() -> Option<PathBuf> {
    if let Ok(base) = std::env::var("XDG_CACHE_HOME")
        && !base.trim().is_empty()
    {
        return Some(PathBuf::from(base).join(CACHE_DIR));
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(PathBuf::from(home).join(".cache").join(CACHE_DIR))
}

fn store_entry(key: &str, entry: CacheEntry) {
    let mut guard = CACHE.lock().unwrap_or_else(PoisonError::into_inner);
    let cache = guard.get_or_insert_with(load_cache_file);
    cache.version = CACHE_VERSION;
    cache.entries.insert(key.to_string(), entry);
    if let Err(err) = save_cache_file(cache) {
        log::debug!("page cache not saved: {err:#}");
    }
}

fn load_cache_file() -> PageCacheFile {
    let Some(path) = cache_path() else {
        return PageCacheFile::default();
    };
    let Ok(raw) = fs::read_to_string(path) else {
        return PageCacheFile::default();
    };
    let cache = serde_json::from_str::<PageCacheFile>(&raw).unwrap_or_default();
    if cache.version != CACHE_VERSION {
        return PageCacheFile::default();
    }
    cache
}

fn save_cache_file(cache: &PageCacheFile) -> Result<()> {
    let Some(path) = cache_path() else {
        return Ok(());
    };
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).ok();
    }
    let tmp = path.with_extension("json.tmp");
    let json = serde_json::to_string(cache).context("serialize page cache")?;
    fs::write(&tmp, json).context("write page cache")?;
    fs::rename(&tmp, &path).context("swap page cache")?;
    Ok(())
}

fn cache_path() -> Option<PathBuf> {
    // Unit tests keep the cache in memory only.
    if cfg!(test) {
        return None;
    }
    app_cache_dir().map(|dir| dir.join(CACHE_FILE))
}

#[cfg(test)]
pub(crate) fn seed_page(url: &str, body: &str, etag: Option<&str>, fetched_at: i64) {
    store_entry(
        url,
        CacheEntry {
            body: body.to_string(),
            etag: etag.map(str::to_string),
            last_modified: None,
            fetched_at,
        },
    );
}

#[cfg(test)]
fn cached_fetched_at(url: &str) -> Option<i64> {
    let guard = CACHE.lock().unwrap_or_else(PoisonError::into_inner);
    guard.as_ref()?.entries.get(url).map(|e| e.fetched_at)
}
