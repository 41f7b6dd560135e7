use scraper::{Html, Selector};
use std::sync::LazyLock;

const BUG_REPORTS_KEY: &str = "BugReports";

static ROWS: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").expect("invalid selector"));
static CELLS: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td, th").expect("invalid selector"));
static LINKS: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").expect("invalid selector"));

/// The bug tracker URL listed on a package description page.
///
/// The page carries a key/value table; the value of the `BugReports` row is used, preferring
/// the target of a link in that cell over its text.
#[must_use]
pub fn find_bug_reports(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    for row in document.select(&ROWS) {
        let mut cells = row.select(&CELLS);
        let Some(key) = cells.next() else {
            continue;
        };

        if key.text().collect::<String>().trim() != BUG_REPORTS_KEY {
            continue;
        }

        let value = cells.next()?;
        let target = value
            .select(&LINKS)
            .next()
            .and_then(|a| a.value().attr("href"))
            .map_or_else(|| value.text().collect::<String>(), str::to_string);

        let target = target.trim();
        return (!target.is_empty()).then(|| target.to_string());
    }

    None
}
