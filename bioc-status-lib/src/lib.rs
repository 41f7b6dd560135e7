#![doc(hidden)]

//! Core library for bioc-status
//!
//! This library consolidates all functionality for the bioc-status tool, which scrapes
//! Bioconductor build reports, download statistics, and bug trackers for a set of
//! packages and renders the results as reports and a dashboard.
//!
//! # Module Organization
//!
//! - [`commands`]: Command-line interface and orchestration
//! - [`facts`]: Data collection, parsing, and caching
//! - [`reports`]: Report and dashboard generation in multiple formats

pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

#[cfg(any(debug_assertions, test))]
pub mod commands;
#[cfg(not(any(debug_assertions, test)))]
mod commands;

pub mod facts;

pub mod reports;

pub use crate::commands::{Host, run};
