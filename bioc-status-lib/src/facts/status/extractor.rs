//! HTML extraction for build reports.
//!
//! Everything here works on page text and returns owned data, so parsed documents never
//! live across a request.

use super::LogLevel;
use super::card::{CARD_CLASS, classify_card};
use scraper::{ElementRef, Html, Selector};
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

const LOG_TARGET: &str = " extractor";

static LINKS: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").expect("invalid selector"));
static LOG_BLOCK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("pre").expect("invalid selector"));

/// What a package's card in the long report says about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardEntry {
    pub version: Option<String>,
    pub maintainer: Option<String>,
    pub log_level: LogLevel,

    /// The element pointing at the failing log, if the card contains one.
    pub failure: Option<FailureLink>,
}

/// The element carrying a failing status, as seen from its anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureLink {
    pub href: Option<String>,
    pub text: String,
}

/// Find the cards of the requested packages in a long report.
///
/// A package is located through the first link inside a card whose text is exactly the
/// package name and whose target contains a `.`. Packages without such a link are absent
/// from the result.
#[must_use]
pub fn scan_long_report(html: &str, packages: &[&str]) -> HashMap<String, CardEntry> {
    let document = Html::parse_document(html);
    let wanted: HashSet<&str> = packages.iter().copied().collect();
    let mut entries = HashMap::with_capacity(packages.len());

    for link in document.select(&LINKS) {
        if !link.value().attr("href").is_some_and(|href| href.contains('.')) {
            continue;
        }

        let name: String = link.text().collect();
        if !wanted.contains(name.as_str()) || entries.contains_key(&name) {
            continue;
        }

        let Some(card) = enclosing_card(link) else {
            log::trace!(target: LOG_TARGET, "Skipping a link to '{name}' outside any package card");
            continue;
        };

        let log_level = classify_card(card.value().classes());
        let entry = CardEntry {
            version: version_of(link),
            maintainer: maintainer_of(link, card, &name),
            log_level,
            failure: log_level.report_class().and_then(|class| failure_link_in(card, class)),
        };

        let _ = entries.insert(name, entry);
    }

    entries
}

/// Find the failing status element for `level` anywhere in a page.
#[must_use]
pub fn find_failure_link(html: &str, level: LogLevel) -> Option<FailureLink> {
    let class = level.report_class()?;
    let document = Html::parse_document(html);
    failure_link_in(document.root_element(), class)
}

/// The text of the first `<pre>` block of a log page, if it has any.
#[must_use]
pub fn extract_log(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    document
        .select(&LOG_BLOCK)
        .next()
        .map(|pre| pre.text().collect::<String>())
        .filter(|log| !log.is_empty())
}

/// The message shown for a failure that happened before any log was written.
///
/// The anchor text ends with the reason in parentheses, as in
/// `ERROR (missing dependency: S4Vectors)`.
#[must_use]
pub fn prebuild_message(anchor_text: &str) -> String {
    let trimmed = anchor_text.trim();
    let mut message = trimmed.rsplit('(').next().unwrap_or(trimmed).to_string();
    let _ = message.pop();
    message
}

fn has_class(element: ElementRef<'_>, class: &str) -> bool {
    element.value().classes().any(|c| c == class)
}

fn enclosing_card(link: ElementRef<'_>) -> Option<ElementRef<'_>> {
    link.ancestors().filter_map(ElementRef::wrap).find(|e| has_class(*e, CARD_CLASS))
}

/// Locate the element with the upper-case status class inside `scope`.
///
/// The anchor of a status element is the element itself when it is a link, otherwise its
/// parent. Anchors with a target are preferred, since a report node may show the status
/// both as a label and as a link to the log.
fn failure_link_in(scope: ElementRef<'_>, class: &str) -> Option<FailureLink> {
    let mut first = None;

    for element in scope.descendants().filter_map(ElementRef::wrap) {
        if !has_class(element, class) {
            continue;
        }

        let anchor = if element.value().name() == "a" {
            element
        } else {
            element.parent().and_then(ElementRef::wrap).unwrap_or(element)
        };

        let link = FailureLink {
            href: anchor.value().attr("href").map(str::to_string),
            text: anchor.text().collect(),
        };

        if link.href.is_some() {
            return Some(link);
        }

        if first.is_none() {
            first = Some(link);
        }
    }

    first
}

/// The version follows a non-breaking space after the package name.
fn version_of(link: ElementRef<'_>) -> Option<String> {
    let parent = link.parent().and_then(ElementRef::wrap)?;
    let text: String = parent.text().collect();
    let (_, after) = text.split_once('\u{a0}')?;
    after.split_whitespace().next().map(str::to_string)
}

/// The maintainer is the first line after the package name in the package's cell.
fn maintainer_of(link: ElementRef<'_>, card: ElementRef<'_>, name: &str) -> Option<String> {
    let cell = link
        .ancestors()
        .filter_map(ElementRef::wrap)
        .take_while(|e| e.id() != card.id())
        .find(|e| e.value().name() == "td")
        .unwrap_or(card);

    let text = text_lines(cell);
    let mut lines = text.lines().map(str::trim).filter(|line| !line.is_empty());
    let _ = lines.by_ref().find(|line| line.contains(name))?;
    let line = lines.next()?;
    let maintainer = line.strip_prefix("Maintainer:").map_or(line, str::trim);
    (!maintainer.is_empty()).then(|| maintainer.to_string())
}

/// The text of an element with `<br>` elements turned into line breaks.
fn text_lines(element: ElementRef<'_>) -> String {
    let mut text = String::new();
    for node in element.descendants() {
        if let Some(t) = node.value().as_text() {
            text.push_str(t);
        } else if node.value().as_element().is_some_and(|e| e.name() == "br") {
            text.push('\n');
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONG_REPORT: &str = r##"<!DOCTYPE html>
<html><body>
<p>Packages with problems: <a href="#BiocCheck">BiocCheck</a></p>
<table>
<tr class="gcard compact ok"><td><b><a href="BiocCheck/index.html">BiocCheck</a>&nbsp;1.41.0</b><br>Marcel Ramos<br>Last Changed: 2024</td></tr>
<tr class="gcard compact warnings"><td><b><a href="S4Vectors/index.html">S4Vectors</a>&nbsp;0.43.1</b><br>Maintainer: Hervé Pagès</td>
  <td class="node"><a href="S4Vectors/nebbiolo2-checksrc.html"><span class="WARNINGS">WARNINGS</span></a></td></tr>
<tr class="gcard error"><td><b><a href="Broken/index.html">Broken</a>&nbsp;2.0.0</b><br>Jane Doe</td>
  <td><span class="ERROR">ERROR (missing dependency: S4Vectors)</span></td></tr>
<tr class="gcard timeout"><td><b><a href="Slow/index.html">Slow</a>&nbsp;1.0.0</b></td></tr>
</table>
</body></html>"##;

    fn scan(names: &[&str]) -> HashMap<String, CardEntry> {
        scan_long_report(LONG_REPORT, names)
    }

    #[test]
    fn test_ok_package() {
        let entries = scan(&["BiocCheck"]);
        let entry = &entries["BiocCheck"];
        assert_eq!(entry.log_level, LogLevel::Ok);
        assert_eq!(entry.version.as_deref(), Some("1.41.0"));
        assert_eq!(entry.maintainer.as_deref(), Some("Marcel Ramos"));
        assert!(entry.failure.is_none());
    }

    #[test]
    fn test_links_without_dot_are_ignored() {
        // The summary link "#BiocCheck" has no dot and lies outside any card.
        let entries = scan(&["BiocCheck"]);
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_failing_package_with_log_link() {
        let entries = scan(&["S4Vectors"]);
        let entry = &entries["S4Vectors"];
        assert_eq!(entry.log_level, LogLevel::Warnings);
        assert_eq!(entry.maintainer.as_deref(), Some("Hervé Pagès"));
        let failure = entry.failure.as_ref().unwrap();
        assert_eq!(failure.href.as_deref(), Some("S4Vectors/nebbiolo2-checksrc.html"));
    }

    #[test]
    fn test_failing_package_without_log_link() {
        let entries = scan(&["Broken"]);
        let failure = entries["Broken"].failure.as_ref().unwrap();
        assert!(failure.href.is_none());
        assert_eq!(prebuild_message(&failure.text), "missing dependency: S4Vectors");
    }

    #[test]
    fn test_failing_package_without_status_element() {
        let entries = scan(&["Slow"]);
        assert_eq!(entries["Slow"].log_level, LogLevel::Timeout);
        assert!(entries["Slow"].failure.is_none());
        assert!(entries["Slow"].maintainer.is_none());
    }

    #[test]
    fn test_missing_package_is_absent() {
        let entries = scan(&["NoSuchPkg", "BiocCheck"]);
        assert!(!entries.contains_key("NoSuchPkg"));
        assert!(entries.contains_key("BiocCheck"));
    }

    #[test]
    fn test_find_failure_link_prefers_links() {
        let page = r#"<html><body>
            <table><tr><td class="ERROR">ERROR</td>
            <td><a href="nebbiolo2-buildsrc.html"><span class="ERROR">ERROR</span></a></td></tr></table>
            </body></html>"#;
        let link = find_failure_link(page, LogLevel::Error).unwrap();
        assert_eq!(link.href.as_deref(), Some("nebbiolo2-buildsrc.html"));
    }

    #[test]
    fn test_find_failure_link_on_anchor_itself() {
        let page = r#"<html><body><a class="TIMEOUT" href="merida1-checksrc.html">TIMEOUT</a></body></html>"#;
        let link = find_failure_link(page, LogLevel::Timeout).unwrap();
        assert_eq!(link.href.as_deref(), Some("merida1-checksrc.html"));
    }

    #[test]
    fn test_find_failure_link_missing() {
        assert!(find_failure_link("<html><body><p>nothing</p></body></html>", LogLevel::Error).is_none());
        assert!(find_failure_link("<html></html>", LogLevel::Ok).is_none());
    }

    #[test]
    fn test_extract_log() {
        let page = "<html><body><h1>log</h1><pre>* checking ... ERROR\nfailed</pre><pre>second</pre></body></html>";
        assert_eq!(extract_log(page).as_deref(), Some("* checking ... ERROR\nfailed"));
        assert!(extract_log("<html><body>no log</body></html>").is_none());
    }

    #[test]
    fn test_extract_empty_log() {
        assert!(extract_log("<html><body><pre></pre></body></html>").is_none());
        assert!(extract_log("<html><body><pre></pre><pre>later</pre></body></html>").is_none());
    }

    #[test]
    fn test_prebuild_message() {
        assert_eq!(prebuild_message("  ERROR (dependency unavailable)  "), "dependency unavailable");
        assert_eq!(prebuild_message("ERROR (a (nested) reason)"), "nested) reason");
        assert_eq!(prebuild_message("ERROR"), "ERRO");
        assert_eq!(prebuild_message(""), "");
    }
}
