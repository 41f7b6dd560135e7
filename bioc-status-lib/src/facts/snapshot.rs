//! The last complete data set, kept on disk between runs.

use super::downloads::DownloadStat;
use super::issues::IssueLookup;
use super::packages::PackageRecord;
use super::status::StatusRecord;
use super::{Channel, Collector};
use crate::Result;
use chrono::{DateTime, Utc};
use core::time::Duration;
use ohno::IntoAppError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

const LOG_TARGET: &str = "  snapshot";

/// Everything collected about a set of packages at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub taken_at: DateTime<Utc>,
    pub channels: Vec<Channel>,
    pub packages: Vec<PackageRecord>,
    pub statuses: Vec<StatusRecord>,
    pub downloads: Vec<DownloadStat>,
    pub issues: BTreeMap<String, IssueLookup>,
}

impl Snapshot {
    /// An empty snapshot taken at `taken_at`.
    #[must_use]
    pub fn new(taken_at: DateTime<Utc>) -> Self {
        Self {
            taken_at,
            ..Self::default()
        }
    }

    /// Time elapsed since the snapshot was taken. A snapshot from the future has age zero.
    #[must_use]
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now.signed_duration_since(self.taken_at).to_std().unwrap_or(Duration::ZERO)
    }

    /// Whole hours elapsed since the snapshot was taken.
    #[must_use]
    pub fn age_hours(&self, now: DateTime<Utc>) -> u64 {
        self.age(now).as_secs() / 3600
    }

    #[must_use]
    pub fn is_stale(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        self.age(now) >= ttl
    }

    /// Whether the snapshot was collected for exactly these packages and channels.
    #[must_use]
    pub fn covers(&self, names: &[String], channels: &[Channel]) -> bool {
        if self.channels != channels || self.packages.len() != names.len() {
            return false;
        }

        self.packages.iter().zip(names).all(|(package, name)| &package.name == name)
    }
}

/// Owns the on-disk snapshot and refreshes it when it gets too old.
#[derive(Debug)]
pub struct SnapshotCache {
    path: PathBuf,
    ttl: Duration,
    current: Option<Snapshot>,
}

impl SnapshotCache {
    /// Open the snapshot stored at `path`, if there is a readable one.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>, ttl: Duration) -> Self {
        let path = path.into();
        let current = match load(&path) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                log::debug!(target: LOG_TARGET, "No usable snapshot at '{}': {e:#}", path.display());
                None
            }
        };

        Self { path, ttl, current }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub const fn current(&self) -> Option<&Snapshot> {
        self.current.as_ref()
    }

    /// True when there is no snapshot or it is at least as old as the TTL.
    #[must_use]
    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        self.current.as_ref().is_none_or(|s| s.is_stale(now, self.ttl))
    }

    /// Collect a new snapshot and replace the current one with it.
    ///
    /// The current snapshot is kept if collection fails.
    pub async fn refresh(&mut self, collector: &Collector, names: &[String], channels: &[Channel]) -> Result<&Snapshot> {
        let snapshot = collector.collect_snapshot(names, channels).await?;

        if let Err(e) = save(&self.path, &snapshot) {
            log::warn!(target: LOG_TARGET, "Could not save the snapshot: {e:#}");
        }

        Ok(self.current.insert(snapshot))
    }

    /// The current snapshot, refreshed first if it is stale, covers other packages, or
    /// `force` is set.
    pub async fn get(&mut self, collector: &Collector, names: &[String], channels: &[Channel], force: bool) -> Result<&Snapshot> {
        let now = collector.now();
        let reusable = !force
            && self
                .current
                .as_ref()
                .is_some_and(|s| !s.is_stale(now, self.ttl) && s.covers(names, channels));

        if !reusable {
            return self.refresh(collector, names, channels).await;
        }

        let snapshot = self.current.as_ref().into_app_err("snapshot disappeared")?;
        log::info!(target: LOG_TARGET, "Using the snapshot taken {} hour(s) ago", snapshot.age_hours(now));
        Ok(snapshot)
    }
}

fn load(path: &Path) -> Result<Snapshot> {
    let file = File::open(path).into_app_err_with(|| format!("opening '{}'", path.display()))?;
    serde_json::from_reader(BufReader::new(file)).into_app_err_with(|| format!("reading '{}'", path.display()))
}

fn save(path: &Path, snapshot: &Snapshot) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).into_app_err_with(|| format!("creating directory '{}'", parent.display()))?;
    }

    let file = File::create(path).into_app_err_with(|| format!("creating '{}'", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, snapshot).into_app_err_with(|| format!("writing '{}'", path.display()))?;
    writer.flush().into_app_err_with(|| format!("flushing '{}'", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facts::packages::PackageType;

    const TTL: Duration = Duration::from_secs(8 * 3600);

    fn snapshot_at(taken_at: DateTime<Utc>) -> Snapshot {
        Snapshot {
            channels: vec![Channel::Release],
            packages: vec![PackageRecord::new("BiocCheck", PackageType::Software)],
            ..Snapshot::new(taken_at)
        }
    }

    #[test]
    fn test_age() {
        let now = Utc::now();
        let snapshot = snapshot_at(now - chrono::Duration::minutes(150));
        assert_eq!(snapshot.age_hours(now), 2);
        assert_eq!(snapshot_at(now + chrono::Duration::hours(1)).age(now), Duration::ZERO);
    }

    #[test]
    fn test_staleness_at_ttl() {
        let now = Utc::now();
        assert!(!snapshot_at(now - chrono::Duration::hours(7)).is_stale(now, TTL));
        assert!(snapshot_at(now - chrono::Duration::hours(8)).is_stale(now, TTL));
    }

    #[test]
    fn test_covers() {
        let snapshot = snapshot_at(Utc::now());
        assert!(snapshot.covers(&["BiocCheck".to_string()], &[Channel::Release]));
        assert!(!snapshot.covers(&["S4Vectors".to_string()], &[Channel::Release]));
        assert!(!snapshot.covers(&["BiocCheck".to_string()], &[Channel::Release, Channel::Devel]));
    }

    #[test]
    fn test_open_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = SnapshotCache::open(tmp.path().join("snapshot.json"), TTL);
        assert!(cache.current().is_none());
        assert!(cache.is_stale(Utc::now()));
    }

    #[test]
    fn test_open_saved_snapshot() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("snapshot.json");
        let now = Utc::now();
        save(&path, &snapshot_at(now - chrono::Duration::hours(1))).unwrap();

        let cache = SnapshotCache::open(&path, TTL);
        assert_eq!(cache.current().unwrap().packages[0].name, "BiocCheck");
        assert!(!cache.is_stale(now));
        assert!(cache.is_stale(now + chrono::Duration::hours(8)));
    }

    #[test]
    fn test_open_corrupt_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("snapshot.json");
        fs::write(&path, "not json").unwrap();

        assert!(SnapshotCache::open(&path, TTL).current().is_none());
    }
}
