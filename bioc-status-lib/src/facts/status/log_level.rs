use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Overall outcome of a package's build in one release channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, EnumIter)]
pub enum LogLevel {
    #[serde(rename = "OK")]
    #[strum(to_string = "OK")]
    Ok,

    #[serde(rename = "WARNINGS")]
    #[strum(to_string = "WARNINGS")]
    Warnings,

    #[serde(rename = "ERROR")]
    #[strum(to_string = "ERROR")]
    Error,

    #[serde(rename = "TIMEOUT")]
    #[strum(to_string = "TIMEOUT")]
    Timeout,

    #[serde(rename = "NOT FOUND")]
    #[strum(to_string = "NOT FOUND")]
    NotFound,
}

impl LogLevel {
    /// Whether the build reported a problem that comes with log messages.
    #[must_use]
    pub const fn is_failure(self) -> bool {
        matches!(self, Self::Warnings | Self::Error | Self::Timeout)
    }

    /// The upper-case class the report puts on the element linking to the failing log.
    #[must_use]
    pub const fn report_class(self) -> Option<&'static str> {
        match self {
            Self::Warnings => Some("WARNINGS"),
            Self::Error => Some("ERROR"),
            Self::Timeout => Some("TIMEOUT"),
            Self::Ok | Self::NotFound => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_display_matches_report_wording() {
        assert_eq!(LogLevel::Ok.to_string(), "OK");
        assert_eq!(LogLevel::NotFound.to_string(), "NOT FOUND");
        assert_eq!(LogLevel::Warnings.to_string(), "WARNINGS");
    }

    #[test]
    fn test_failures_have_a_report_class() {
        for level in LogLevel::iter() {
            assert_eq!(level.is_failure(), level.report_class().is_some());
        }
    }

    #[test]
    fn test_serde_uses_report_wording() {
        assert_eq!(serde_json::to_string(&LogLevel::NotFound).unwrap(), "\"NOT FOUND\"");
        let level: LogLevel = serde_json::from_str("\"TIMEOUT\"").unwrap();
        assert_eq!(level, LogLevel::Timeout);
    }
}
