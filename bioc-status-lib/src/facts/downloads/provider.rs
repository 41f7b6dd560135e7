use super::{DownloadStat, YearMonth};
use crate::Result;
use crate::facts::packages::PackageRecord;
use crate::facts::{PageFetcher, Progress, ReportUrls};
use chrono::{DateTime, Utc};
use ohno::{IntoAppError, bail};
use serde::Deserialize;

const LOG_TARGET: &str = " downloads";

/// Month value of the yearly total rows.
const YEARLY_TOTAL: &str = "all";

#[derive(Debug, Deserialize)]
struct StatsRow {
    #[serde(rename = "Year")]
    year: i32,

    #[serde(rename = "Month")]
    month: String,

    #[serde(rename = "Nb_of_distinct_IPs")]
    distinct_ips: u64,

    #[serde(rename = "Nb_of_downloads")]
    downloads: u64,
}

/// Parse a tab-separated statistics file.
///
/// Yearly totals and months that have not started by `now` are dropped. A row that does
/// not have the expected shape is an error.
pub fn parse_stats(package: &str, tsv: &str, now: DateTime<Utc>) -> Result<Vec<DownloadStat>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .trim(csv::Trim::All)
        .from_reader(tsv.as_bytes());

    let mut stats = Vec::new();
    for (index, row) in reader.deserialize::<StatsRow>().enumerate() {
        let row = row.into_app_err_with(|| format!("invalid download statistics for '{package}' in row {}", index + 1))?;

        if row.month.eq_ignore_ascii_case(YEARLY_TOTAL) {
            continue;
        }

        let month = YearMonth::from_abbreviation(row.year, &row.month)
            .into_app_err_with(|| format!("invalid month '{}' in the download statistics for '{package}'", row.month))?;

        if month.start().is_some_and(|start| start < now) {
            stats.push(DownloadStat {
                name: package.to_string(),
                month,
                downloads: row.downloads,
                distinct_ips: row.distinct_ips,
            });
        }
    }

    Ok(stats)
}

/// Fetches monthly download statistics.
#[derive(Debug, Clone)]
pub struct Provider {
    fetcher: PageFetcher,
    urls: ReportUrls,
}

impl Provider {
    #[must_use]
    pub const fn new(fetcher: PageFetcher, urls: ReportUrls) -> Self {
        Self { fetcher, urls }
    }

    /// Statistics for every package that has them.
    ///
    /// Packages whose statistics cannot be fetched are skipped. Fails when packages were
    /// requested and none of them had statistics.
    pub async fn get_download_stats(&self, packages: &[PackageRecord], now: DateTime<Utc>, progress: &dyn Progress) -> Result<Vec<DownloadStat>> {
        progress.set_phase("Download statistics", packages.len() as u64);

        let mut stats = Vec::new();
        let mut usable = 0;
        for package in packages {
            let url = self.urls.download_stats(package.package_type, &package.name)?;

            match self.fetcher.fetch_optional(&url).await {
                Ok(Some(tsv)) => {
                    let package_stats = parse_stats(&package.name, &tsv, now)?;
                    log::debug!(target: LOG_TARGET, "{} month(s) of statistics for '{}'", package_stats.len(), package.name);
                    stats.extend(package_stats);
                    usable += 1;
                }
                Ok(None) => log::warn!(target: LOG_TARGET, "No download statistics for '{}'", package.name),
                Err(e) => log::warn!(target: LOG_TARGET, "Could not fetch download statistics for '{}': {e:#}", package.name),
            }

            progress.advance(&package.name);
        }

        if !packages.is_empty() && usable == 0 {
            bail!("none of the {} requested package(s) have download statistics", packages.len());
        }

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const STATS: &str = "Year\tMonth\tNb_of_distinct_IPs\tNb_of_downloads\n\
        2024\tJan\t120\t300\n\
        2024\tFeb\t130\t310\n\
        2024\tMar\t0\t0\n\
        2024\tall\t250\t610\n";

    fn mid_february() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_parse_drops_totals_and_future_months() {
        let stats = parse_stats("BiocCheck", STATS, mid_february()).unwrap();
        let months: Vec<String> = stats.iter().map(|s| s.month.to_string()).collect();
        assert_eq!(months, vec!["2024-01", "2024-02"]);
        assert_eq!(stats[0].downloads, 300);
        assert_eq!(stats[0].distinct_ips, 120);
        assert!(stats.iter().all(|s| s.name == "BiocCheck"));
    }

    #[test]
    fn test_month_starting_now_is_dropped() {
        let now = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let stats = parse_stats("BiocCheck", STATS, now).unwrap();
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].month, YearMonth::new(2024, 1).unwrap());
    }

    #[test]
    fn test_every_row_precedes_now() {
        let now = mid_february();
        for stat in parse_stats("BiocCheck", STATS, now).unwrap() {
            assert!(stat.month.start().unwrap() < now);
        }
    }

    #[test]
    fn test_malformed_row_is_an_error() {
        let tsv = "Year\tMonth\tNb_of_distinct_IPs\tNb_of_downloads\n2024\tJan\tmany\t300\n";
        let _ = parse_stats("BiocCheck", tsv, mid_february()).unwrap_err();
    }

    #[test]
    fn test_unknown_month_is_an_error() {
        let tsv = "Year\tMonth\tNb_of_distinct_IPs\tNb_of_downloads\n2024\tJanuary\t1\t2\n";
        let _ = parse_stats("BiocCheck", tsv, mid_february()).unwrap_err();
    }

    #[test]
    fn test_header_only() {
        let tsv = "Year\tMonth\tNb_of_distinct_IPs\tNb_of_downloads\n";
        assert!(parse_stats("BiocCheck", tsv, mid_february()).unwrap().is_empty());
    }
}
