//! On-disk cache of fetched pages with TTL-aware loading.
//!
//! Every entry is a JSON envelope holding the time it was written and either the
//! cached payload or the reason the resource was unavailable. Unavailable entries
//! let a run skip resources that were already known to be missing, such as download
//! statistics for a package that has none.

use crate::Result;
use chrono::{DateTime, Utc};
use core::time::Duration;
use ohno::IntoAppError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

const LOG_TARGET: &str = "     cache";

/// Outcome of looking an entry up in the cache.
#[derive(Debug, Clone)]
pub enum CacheResult<T> {
    /// A fresh entry with data.
    Data(T),

    /// A fresh entry recording that the resource was unavailable.
    NoData(String),

    /// Nothing usable: absent, expired, unreadable, or the cache is being ignored.
    Miss,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
struct Envelope<T> {
    written_at: DateTime<Utc>,
    entry: Entry<T>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
enum Entry<T> {
    Data(T),
    NoData(String),
}

/// A directory of JSON cache entries sharing one TTL.
#[derive(Debug, Clone)]
pub struct Cache {
    dir: PathBuf,
    ttl: Duration,
    now: DateTime<Utc>,
    ignore: bool,
}

impl Cache {
    #[must_use]
    pub fn new(cache_dir: impl Into<PathBuf>, ttl: Duration, now: DateTime<Utc>, ignore_cached: bool) -> Self {
        Self {
            dir: cache_dir.into(),
            ttl,
            now,
            ignore: ignore_cached,
        }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The reference time used for freshness checks and new entries.
    #[must_use]
    pub const fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Look up an entry by file name, relative to the cache directory.
    #[must_use]
    pub fn load<T>(&self, filename: &str) -> CacheResult<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        if self.ignore {
            return CacheResult::Miss;
        }

        let path = self.dir.join(filename);
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) => {
                log::trace!(target: LOG_TARGET, "No cache entry for {filename}: {e:#}");
                return CacheResult::Miss;
            }
        };

        let envelope: Envelope<T> = match serde_json::from_reader(BufReader::new(file)) {
            Ok(envelope) => envelope,
            Err(e) => {
                log::debug!(target: LOG_TARGET, "Ignoring unreadable cache entry {filename}: {e:#}");
                return CacheResult::Miss;
            }
        };

        let age = self.now.signed_duration_since(envelope.written_at);
        if age.num_seconds() < 0 {
            log::debug!(target: LOG_TARGET, "Cache entry {filename} was written in the future, treating it as fresh");
        } else {
            let age = age.to_std().unwrap_or(Duration::MAX);
            if age >= self.ttl {
                log::debug!(
                    target: LOG_TARGET,
                    "Cache entry {filename} expired ({:.1} hours old, TTL {:.1} hours)",
                    age.as_secs_f64() / 3600.0,
                    self.ttl.as_secs_f64() / 3600.0
                );
                return CacheResult::Miss;
            }

            log::debug!(target: LOG_TARGET, "Cache hit for {filename} ({:.1} hours old)", age.as_secs_f64() / 3600.0);
        }

        match envelope.entry {
            Entry::Data(data) => CacheResult::Data(data),
            Entry::NoData(reason) => CacheResult::NoData(reason),
        }
    }

    /// Store data under the given file name.
    pub fn save<T>(&self, filename: &str, data: &T) -> Result<()>
    where
        T: Serialize,
    {
        self.write(
            filename,
            &Envelope {
                written_at: self.now,
                entry: Entry::Data(data),
            },
        )
    }

    /// Record that a resource is unavailable.
    pub fn save_no_data(&self, filename: &str, reason: &str) -> Result<()> {
        self.write(
            filename,
            &Envelope::<()> {
                written_at: self.now,
                entry: Entry::NoData(reason.to_string()),
            },
        )
    }

    fn write<T: Serialize>(&self, filename: &str, envelope: &Envelope<T>) -> Result<()> {
        let path = self.dir.join(filename);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).into_app_err_with(|| format!("creating directory '{}'", parent.display()))?;
        }

        let file = File::create(&path).into_app_err_with(|| format!("creating cache file '{}'", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, envelope).into_app_err_with(|| format!("writing cache file '{}'", path.display()))?;
        writer
            .flush()
            .into_app_err_with(|| format!("flushing cache file '{}'", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache_at(dir: &Path, now: DateTime<Utc>) -> Cache {
        Cache::new(dir, Duration::from_secs(8 * 3600), now, false)
    }

    fn write_envelope(dir: &Path, filename: &str, written_at: DateTime<Utc>, body: &str) {
        let envelope = Envelope {
            written_at,
            entry: Entry::Data(body.to_string()),
        };
        fs::write(dir.join(filename), serde_json::to_string(&envelope).unwrap()).unwrap();
    }

    #[test]
    fn test_page_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = cache_at(tmp.path(), Utc::now());

        cache.save("pages/report.json", &"<html></html>".to_string()).unwrap();

        match cache.load::<String>("pages/report.json") {
            CacheResult::Data(page) => assert_eq!(page, "<html></html>"),
            other => panic!("expected Data, got {other:?}"),
        }
    }

    #[test]
    fn test_unavailable_entry() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = cache_at(tmp.path(), Utc::now());

        cache.save_no_data("stats.json", "HTTP 404").unwrap();

        match cache.load::<String>("stats.json") {
            CacheResult::NoData(reason) => assert_eq!(reason, "HTTP 404"),
            other => panic!("expected NoData, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_and_corrupt_entries_miss() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("bad.json"), "{ not json").unwrap();
        let cache = cache_at(tmp.path(), Utc::now());

        assert!(matches!(cache.load::<String>("absent.json"), CacheResult::Miss));
        assert!(matches!(cache.load::<String>("bad.json"), CacheResult::Miss));
    }

    #[test]
    fn test_expiry_at_ttl_boundary() {
        let tmp = tempfile::tempdir().unwrap();
        let now = Utc::now();
        write_envelope(tmp.path(), "old.json", now - chrono::Duration::hours(8), "old");
        write_envelope(tmp.path(), "young.json", now - chrono::Duration::hours(7), "young");

        let cache = cache_at(tmp.path(), now);
        assert!(matches!(cache.load::<String>("old.json"), CacheResult::Miss));
        assert!(matches!(cache.load::<String>("young.json"), CacheResult::Data(s) if s == "young"));
    }

    #[test]
    fn test_future_entry_is_fresh() {
        let tmp = tempfile::tempdir().unwrap();
        let now = Utc::now();
        write_envelope(tmp.path(), "skewed.json", now + chrono::Duration::hours(1), "skewed");

        let cache = cache_at(tmp.path(), now);
        assert!(matches!(cache.load::<String>("skewed.json"), CacheResult::Data(s) if s == "skewed"));
    }

    #[test]
    fn test_ignored_cache_always_misses() {
        let tmp = tempfile::tempdir().unwrap();
        let now = Utc::now();
        cache_at(tmp.path(), now).save("page.json", &"x".to_string()).unwrap();

        let ignoring = Cache::new(tmp.path(), Duration::from_secs(3600), now, true);
        assert!(matches!(ignoring.load::<String>("page.json"), CacheResult::Miss));
    }

    #[test]
    fn test_data_replaces_unavailable_entry() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = cache_at(tmp.path(), Utc::now());

        cache.save_no_data("page.json", "gone").unwrap();
        cache.save("page.json", &"back".to_string()).unwrap();

        assert!(matches!(cache.load::<String>("page.json"), CacheResult::Data(s) if s == "back"));
    }
}
