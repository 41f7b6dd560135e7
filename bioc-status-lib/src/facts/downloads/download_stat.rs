use chrono::{DateTime, NaiveDate, Utc};
use core::fmt::{Display, Formatter};
use core::str::FromStr;
use ohno::{IntoAppError, bail};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

const MONTH_ABBREVIATIONS: [&str; 12] = ["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec"];

/// A calendar month, written as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// `month` is 1-based.
    #[must_use]
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// Build from a year and an English month abbreviation such as `Jan`.
    #[must_use]
    pub fn from_abbreviation(year: i32, abbreviation: &str) -> Option<Self> {
        let index = MONTH_ABBREVIATIONS.iter().position(|m| m.eq_ignore_ascii_case(abbreviation))?;
        Self::new(year, u32::try_from(index).ok()? + 1)
    }

    #[must_use]
    pub const fn year(self) -> i32 {
        self.year
    }

    #[must_use]
    pub const fn month(self) -> u32 {
        self.month
    }

    /// Midnight UTC on the first day of the month.
    #[must_use]
    pub fn start(self) -> Option<DateTime<Utc>> {
        Some(NaiveDate::from_ymd_opt(self.year, self.month, 1)?.and_hms_opt(0, 0, 0)?.and_utc())
    }

    /// The English abbreviation of the month.
    #[must_use]
    pub fn abbreviation(self) -> &'static str {
        MONTH_ABBREVIATIONS
            .get(self.month as usize - 1)
            .copied()
            .unwrap_or_default()
    }
}

impl Display for YearMonth {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = ohno::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((year, month)) = s.split_once('-') else {
            bail!("invalid month '{s}', expected YYYY-MM");
        };

        let year = year.parse::<i32>().into_app_err_with(|| format!("invalid year in '{s}'"))?;
        let month = month.parse::<u32>().into_app_err_with(|| format!("invalid month in '{s}'"))?;
        Self::new(year, month).into_app_err_with(|| format!("month out of range in '{s}'"))
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for YearMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Downloads of one package in one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadStat {
    pub name: String,
    pub month: YearMonth,
    pub downloads: u64,
    pub distinct_ips: u64,
}
