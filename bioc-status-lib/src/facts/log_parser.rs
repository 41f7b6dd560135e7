//! Extraction of warning and error messages from R build and check logs.
//!
//! `R CMD check` prefixes every check with `* checking ...` and ends each line of output
//! with a verdict such as `OK`, `WARNING`, `ERROR` or `NOTE`. Splitting the log on `*`
//! therefore yields one segment per check, and the segments of interest are the ones that
//! mention the requested severity.

use std::borrow::Cow;

/// Marks the start of each log entry.
pub const ENTRY_DELIMITER: char = '*';

/// Segments containing this marker report a completed step rather than a problem.
pub const COMPLETION_MARKER: &str = "DONE";

/// Byte sequences produced when UTF-8 typographic quotes are decoded as Latin-1.
const MISDECODED_APOSTROPHES: [&str; 3] = ["\u{e2}\u{80}\u{98}", "\u{e2}\u{80}\u{99}", "\u{c3}\u{a2}"];

/// Map a report severity keyword to the token used inside logs.
///
/// Reports say `WARNINGS` while log entries say `WARNING`.
#[must_use]
pub fn log_token(severity: &str) -> &str {
    if severity == "WARNINGS" { "WARNING" } else { severity }
}

/// Replace mis-decoded typographic quotes with a plain apostrophe.
#[must_use]
pub fn normalize_apostrophes(text: &str) -> Cow<'_, str> {
    if !MISDECODED_APOSTROPHES.iter().any(|seq| text.contains(seq)) {
        return Cow::Borrowed(text);
    }

    let mut normalized = text.to_string();
    for seq in MISDECODED_APOSTROPHES {
        normalized = normalized.replace(seq, "'");
    }
    Cow::Owned(normalized)
}

/// Return the log segments reporting problems of the given severity, in log order.
///
/// Segments are returned verbatim. A log with no matching segment yields an empty list.
#[must_use]
pub fn parse_log(log: &str, severity: &str) -> Vec<String> {
    let token = log_token(severity);
    log.split(ENTRY_DELIMITER)
        .filter(|segment| segment.contains(token) && !segment.contains(COMPLETION_MARKER))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHECK_LOG: &str = "* using R version 4.4.0\n\
        * checking for file 'BiocCheck/DESCRIPTION' ... OK\n\
        * checking whether package 'BiocCheck' can be installed ... WARNING\nFound the following significant warnings:\n  unused variable\n\
        * checking Rd files ... NOTE\n\
        * checking examples ... ERROR\nRunning examples failed\n\
        * checking tests ... WARNING\n  test.R failed\n\
        * DONE\nStatus: 1 ERROR, 2 WARNINGs, 1 NOTE\n";

    #[test]
    fn test_warnings_are_extracted_in_order() {
        let messages = parse_log(CHECK_LOG, "WARNINGS");
        assert_eq!(messages.len(), 2);
        assert!(messages[0].contains("can be installed ... WARNING"));
        assert!(messages[1].contains("checking tests ... WARNING"));
    }

    #[test]
    fn test_errors_are_extracted() {
        let messages = parse_log(CHECK_LOG, "ERROR");
        assert_eq!(messages, vec![" checking examples ... ERROR\nRunning examples failed\n".to_string()]);
    }

    #[test]
    fn test_completion_segments_are_dropped() {
        // The final segment mentions both WARNING and ERROR but reports completion.
        for severity in ["WARNINGS", "ERROR"] {
            assert!(parse_log(CHECK_LOG, severity).iter().all(|m| !m.contains(COMPLETION_MARKER)));
        }
    }

    #[test]
    fn test_every_message_contains_the_token() {
        for severity in ["WARNINGS", "ERROR", "TIMEOUT"] {
            let token = log_token(severity);
            assert!(parse_log(CHECK_LOG, severity).iter().all(|m| m.contains(token)));
        }
    }

    #[test]
    fn test_no_match_is_empty() {
        assert!(parse_log(CHECK_LOG, "TIMEOUT").is_empty());
        assert!(parse_log("", "ERROR").is_empty());
    }

    #[test]
    fn test_segments_are_not_trimmed() {
        let messages = parse_log("*  ERROR in build  *", "ERROR");
        assert_eq!(messages, vec!["  ERROR in build  ".to_string()]);
    }

    #[test]
    fn test_log_token() {
        assert_eq!(log_token("WARNINGS"), "WARNING");
        assert_eq!(log_token("ERROR"), "ERROR");
        assert_eq!(log_token("TIMEOUT"), "TIMEOUT");
    }

    #[test]
    fn test_normalize_apostrophes() {
        let raw = "checking for file \u{e2}\u{80}\u{98}DESCRIPTION\u{e2}\u{80}\u{99} ... ERROR";
        assert_eq!(normalize_apostrophes(raw), "checking for file 'DESCRIPTION' ... ERROR");
        assert_eq!(normalize_apostrophes("don\u{c3}\u{a2}t"), "don't");
    }

    #[test]
    fn test_normalize_apostrophes_borrows_clean_text() {
        assert!(matches!(normalize_apostrophes("plain 'text'"), Cow::Borrowed(_)));
    }
}
