//! Classification of a package's card in the long report.
//!
//! Every package in a long report sits in an element with the `gcard` class, which also
//! carries a class per outcome seen on the build nodes, for example
//! `class="compact gcard timeout warnings"`.

use super::LogLevel;

/// Class marking a package card.
pub const CARD_CLASS: &str = "gcard";

/// Layout classes that carry no outcome.
const LAYOUT_CLASSES: [&str; 2] = [CARD_CLASS, "compact"];

/// Parse the classes of a package card into the package's log level.
///
/// `ok` anywhere means the package built cleanly. Otherwise the last failing class
/// decides. A card with no recognizable outcome class is reported as
/// [`LogLevel::NotFound`].
pub fn classify_card<'a>(classes: impl IntoIterator<Item = &'a str>) -> LogLevel {
    let mut last: Option<LogLevel> = None;

    for class in classes {
        if LAYOUT_CLASSES.contains(&class) {
            continue;
        }

        last = match class {
            "ok" => return LogLevel::Ok,
            "warnings" | "warning" => Some(LogLevel::Warnings),
            "error" => Some(LogLevel::Error),
            "timeout" => Some(LogLevel::Timeout),
            _ => continue,
        };
    }

    last.unwrap_or(LogLevel::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(classes: &str) -> LogLevel {
        classify_card(classes.split_whitespace())
    }

    #[test]
    fn test_ok_card() {
        assert_eq!(classify("gcard ok"), LogLevel::Ok);
        assert_eq!(classify("compact gcard ok"), LogLevel::Ok);
    }

    #[test]
    fn test_ok_wins_over_failures() {
        assert_eq!(classify("gcard error ok"), LogLevel::Ok);
        assert_eq!(classify("gcard ok timeout"), LogLevel::Ok);
    }

    #[test]
    fn test_single_failures() {
        assert_eq!(classify("gcard warnings"), LogLevel::Warnings);
        assert_eq!(classify("gcard warning"), LogLevel::Warnings);
        assert_eq!(classify("gcard error"), LogLevel::Error);
        assert_eq!(classify("gcard timeout"), LogLevel::Timeout);
    }

    #[test]
    fn test_last_failure_wins() {
        assert_eq!(classify("compact gcard timeout warnings"), LogLevel::Warnings);
        assert_eq!(classify("gcard error warnings"), LogLevel::Warnings);
        assert_eq!(classify("gcard warnings error"), LogLevel::Error);
        assert_eq!(classify("gcard timeout warnings error"), LogLevel::Error);
    }

    #[test]
    fn test_unknown_classes_do_not_reset_the_outcome() {
        assert_eq!(classify("gcard timeout skipped"), LogLevel::Timeout);
        assert_eq!(classify("gcard error compact"), LogLevel::Error);
    }

    #[test]
    fn test_unrecognized_card() {
        assert_eq!(classify("gcard"), LogLevel::NotFound);
        assert_eq!(classify("gcard compact skipped"), LogLevel::NotFound);
        assert_eq!(classify(""), LogLevel::NotFound);
    }

    #[test]
    fn test_classes_are_case_sensitive() {
        assert_eq!(classify("gcard ERROR"), LogLevel::NotFound);
    }
}
