//! Open issues of packages, found through the `BugReports` link of each package.

mod client;
pub mod description;
mod issue_record;
mod provider;

pub use client::{Client, Issue};
pub use issue_record::{IssueLookup, IssueRecord};
pub use provider::Provider;
