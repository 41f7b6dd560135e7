//! Multi-format report generation for collected package facts
//!
//! This module turns a [`Snapshot`](crate::facts::Snapshot) into output meant for
//! people or for other programs.
//!
//! # Implementation Model
//!
//! Five report generators are provided:
//! - **Console**: Terminal output with ANSI colors, wrapped log messages
//! - **CSV**: One table per section (statuses, downloads, issues)
//! - **HTML**: Self-contained dashboard with embedded CSS, dark mode, and filtering by log level
//! - **Excel**: Native .xlsx format with one sheet per section
//! - **JSON**: The whole snapshot plus report metadata
//!
//! Status records carry a variable number of log messages. The tabular formats go through
//! [`StatusTable`], which pads every row to the largest message count of the batch.
//!
//! Shared helpers live in the `common` module: level colors, message headings, download
//! grouping and number formatting.

mod common;
mod console;
mod csv;
mod excel;
mod html;
mod json;
mod table;

pub use console::generate as generate_console;
pub use csv::{generate_downloads as generate_downloads_csv, generate_issues as generate_issues_csv, generate_statuses as generate_status_csv};
pub use excel::generate as generate_xlsx;
pub use html::generate as generate_html;
pub use json::generate as generate_json;
pub use table::StatusTable;
