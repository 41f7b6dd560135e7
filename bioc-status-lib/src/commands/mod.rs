//! Command-line interface and orchestration for bioc-status
//!
//! This module implements the CLI commands and connects the data collection in
//! [`crate::facts`] to the report generators in [`crate::reports`].
//!
//! # Commands
//!
//! - **status**: Scrape build statuses for a set of packages and report them
//! - **downloads**: Report the monthly download statistics of a set of packages
//! - **issues**: List the open GitHub issues of a set of packages
//! - **packages**: List all published packages, optionally saving the package list file
//! - **dashboard**: Produce the full HTML dashboard from a snapshot that is refreshed
//!   when it is older than the configured TTL
//! - **init**: Generate a default configuration file
//! - **validate**: Check a configuration file
//!
//! The data-collecting commands share their arguments, configuration loading, logging
//! setup and report output through the `common` module. Packages are taken from the
//! command line or, when none are given, from the configured package list file.

mod common;
mod config;
mod dashboard;
mod downloads;
mod host;
mod init;
mod issues;
mod packages;
mod progress_reporter;
mod run;
mod status;
mod validate;

#[cfg(debug_assertions)]
pub use config::Config;

pub use dashboard::{DashboardArgs, process_dashboard};
pub use downloads::{DownloadsArgs, process_downloads};
pub use host::Host;
pub use init::{InitArgs, init_config};
pub use issues::{IssuesArgs, process_issues};
pub use packages::{PackagesArgs, list_packages};
pub use progress_reporter::ProgressReporter;
pub use run::run;
pub use status::{StatusArgs, process_status};
pub use validate::{ValidateArgs, validate_config};
