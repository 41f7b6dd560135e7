//! Build status of packages, scraped from the Bioconductor build reports.
//!
//! A long report lists every package of one report type in a card whose classes give
//! the outcome on each build node. Failing packages link to the log of the failing stage,
//! and the messages of the failing severity are extracted from that log.

pub mod card;
pub mod extractor;
mod log_level;
mod provider;
mod stage;
mod status_record;

pub use log_level::LogLevel;
pub use provider::Provider;
pub use stage::Stage;
pub use status_record::StatusRecord;
