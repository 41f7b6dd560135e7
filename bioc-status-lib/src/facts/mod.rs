//! Data collection for Bioconductor packages
//!
//! This module gathers everything the reports need about a set of Bioconductor
//! packages. It scrapes the build report website, downloads monthly statistics and
//! looks up open issues in each package's bug tracker.
//!
//! # Implementation Model
//!
//! Each data source has its own provider:
//! - **Package lister**: the `PACKAGES` manifests, one per package category
//! - **Build status**: long reports, per-package report pages and build logs
//! - **Download statistics**: the tab-separated monthly statistics files
//! - **Issues**: the package description page and the GitHub REST API
//!
//! Fetched pages go through a [`PageFetcher`] which applies a fixed timeout and keeps a
//! TTL-aware copy of every page in the on-disk cache. Per-package enrichment lookups
//! report their outcome as a [`ProviderResult`], so a package without a bug tracker
//! does not abort a run.
//!
//! The [`Collector`] ties the providers together and runs them one request at a time.
//! A [`SnapshotCache`] keeps the last complete data set on disk and decides when it
//! has to be collected again.

mod cache;
mod channel;
mod collector;
pub mod downloads;
mod http;
pub mod issues;
pub mod log_parser;
pub mod packages;
mod path_utils;
mod progress;
mod provider_result;
mod repo_spec;
mod report_url;
mod snapshot;
pub mod status;

pub use cache::{Cache, CacheResult};
pub use channel::Channel;
pub use collector::{Collector, CollectorSettings};
pub use http::PageFetcher;
pub use progress::{NoProgress, Progress};
pub use provider_result::ProviderResult;
pub use repo_spec::RepoSpec;
pub use report_url::ReportUrls;
pub use snapshot::{Snapshot, SnapshotCache};
