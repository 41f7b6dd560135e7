//! Monthly download statistics published for every Bioconductor package.

mod download_stat;
mod provider;

pub use download_stat::{DownloadStat, YearMonth};
pub use provider::{Provider, parse_stats};
