use super::common;
use crate::Result;
use crate::facts::Snapshot;
use crate::facts::issues::IssueLookup;
use crate::facts::status::{LogLevel, StatusRecord};
use chrono::{DateTime, Utc};
use core::fmt::Write;
use strum::IntoEnumIterator;

/// Write a self-contained dashboard page for the snapshot.
pub fn generate<W: Write>(snapshot: &Snapshot, now: DateTime<Utc>, writer: &mut W) -> Result<()> {
    writeln!(writer, "<!DOCTYPE html>")?;
    writeln!(writer, "<html>")?;
    writeln!(writer, "<head>")?;
    writeln!(writer, "  <meta charset=\"UTF-8\">")?;
    writeln!(writer, "  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">")?;
    writeln!(writer, "  <title>Package Status Dashboard</title>")?;
    write_styles(writer)?;
    writeln!(writer, "</head>")?;
    writeln!(writer, "<body>")?;

    write_header(writer, snapshot, now)?;

    let has_statuses = !snapshot.statuses.is_empty();
    if has_statuses {
        write_filter_bar(writer)?;
        write_status_grid(writer, snapshot)?;
        write_status_details(writer, snapshot)?;
    }

    if !snapshot.downloads.is_empty() {
        write_downloads(writer, snapshot)?;
    }

    if !snapshot.issues.is_empty() {
        write_issues(writer, snapshot)?;
    }

    write_scripts(writer, has_statuses)?;
    writeln!(writer, "</body>")?;
    writeln!(writer, "</html>")?;

    Ok(())
}

fn write_styles<W: Write>(writer: &mut W) -> Result<()> {
    writeln!(writer, "  <style>")?;
    writeln!(writer, "    :root {{")?;
    writeln!(writer, "      --bg-color: #f0f2f5;")?;
    writeln!(writer, "      --card-bg: #ffffff;")?;
    writeln!(writer, "      --text-color: #1a202c;")?;
    writeln!(writer, "      --text-secondary: #64748b;")?;
    writeln!(writer, "      --border-color: #e2e8f0;")?;
    writeln!(writer, "      --hover-bg: #f8fafc;")?;
    writeln!(writer, "      --accent-color: #3b82f6;")?;
    writeln!(writer, "      --shadow: 0 1px 3px rgba(0,0,0,0.08), 0 4px 16px rgba(0,0,0,0.04);")?;
    writeln!(writer, "    }}")?;
    writeln!(writer, "    @media (prefers-color-scheme: dark) {{")?;
    writeln!(writer, "      :root {{")?;
    writeln!(writer, "        --bg-color: #0f172a;")?;
    writeln!(writer, "        --card-bg: #1e293b;")?;
    writeln!(writer, "        --text-color: #e2e8f0;")?;
    writeln!(writer, "        --text-secondary: #94a3b8;")?;
    writeln!(writer, "        --border-color: #334155;")?;
    writeln!(writer, "        --hover-bg: #263044;")?;
    writeln!(writer, "        --accent-color: #60a5fa;")?;
    writeln!(writer, "        --shadow: 0 1px 3px rgba(0,0,0,0.3), 0 4px 16px rgba(0,0,0,0.2);")?;
    writeln!(writer, "      }}")?;
    writeln!(writer, "    }}")?;
    writeln!(writer, "    body.dark-theme {{")?;
    writeln!(writer, "      --bg-color: #0f172a; --card-bg: #1e293b; --text-color: #e2e8f0; --text-secondary: #94a3b8;")?;
    writeln!(writer, "      --border-color: #334155; --hover-bg: #263044; --accent-color: #60a5fa;")?;
    writeln!(writer, "      --shadow: 0 1px 3px rgba(0,0,0,0.3), 0 4px 16px rgba(0,0,0,0.2);")?;
    writeln!(writer, "      color-scheme: dark;")?;
    writeln!(writer, "    }}")?;
    writeln!(writer, "    body.light-theme {{")?;
    writeln!(writer, "      --bg-color: #f0f2f5; --card-bg: #ffffff; --text-color: #1a202c; --text-secondary: #64748b;")?;
    writeln!(writer, "      --border-color: #e2e8f0; --hover-bg: #f8fafc; --accent-color: #3b82f6;")?;
    writeln!(writer, "      --shadow: 0 1px 3px rgba(0,0,0,0.08), 0 4px 16px rgba(0,0,0,0.04);")?;
    writeln!(writer, "      color-scheme: light;")?;
    writeln!(writer, "    }}")?;

    writeln!(writer, "    * {{ box-sizing: border-box; }}")?;
    writeln!(writer, "    body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif; margin: 0; padding: 32px; background: var(--bg-color); color: var(--text-color); transition: background-color 0.3s ease, color 0.3s ease; line-height: 1.5; }}")?;

    writeln!(writer, "    .header {{ display: flex; align-items: center; gap: 16px; margin-bottom: 28px; }}")?;
    writeln!(writer, "    .header-content {{ flex: 1; }}")?;
    writeln!(writer, "    h1 {{ margin: 0 0 2px 0; font-size: 26px; font-weight: 700; letter-spacing: -0.5px; }}")?;
    writeln!(writer, "    h2 {{ font-size: 18px; margin: 32px 0 12px 0; }}")?;
    writeln!(writer, "    .subtitle {{ margin: 0; font-size: 13px; color: var(--text-secondary); }}")?;
    writeln!(writer, "    .data-age {{ margin: 4px 0 0 0; font-size: 13px; font-weight: 600; }}")?;
    writeln!(writer, "    .theme-toggle {{ background: none; border: 2px solid var(--border-color); border-radius: 8px; width: 40px; height: 40px; cursor: pointer; display: flex; align-items: center; justify-content: center; transition: all 0.2s ease; flex-shrink: 0; }}")?;
    writeln!(writer, "    .theme-toggle:hover {{ border-color: var(--accent-color); }}")?;
    writeln!(writer, "    .theme-toggle svg {{ width: 18px; height: 18px; fill: var(--text-color); opacity: 0.7; }}")?;

    writeln!(writer, "    .filter-bar {{ display: flex; align-items: center; gap: 8px; margin-bottom: 24px; flex-wrap: wrap; }}")?;
    writeln!(writer, "    .filter-bar .label {{ font-size: 13px; font-weight: 600; color: var(--text-secondary); margin-right: 4px; }}")?;
    writeln!(writer, "    .filter-btn {{ border: 1px solid var(--border-color); background: var(--card-bg); color: var(--text-color); padding: 6px 16px; border-radius: 20px; font-size: 13px; cursor: pointer; font-weight: 500; transition: all 0.15s ease; }}")?;
    writeln!(writer, "    .filter-btn:hover {{ border-color: var(--accent-color); }}")?;
    writeln!(writer, "    .filter-btn.active {{ background: var(--accent-color); color: #ffffff; border-color: var(--accent-color); }}")?;

    writeln!(writer, "    .card {{ background: var(--card-bg); border-radius: 12px; box-shadow: var(--shadow); border: 1px solid var(--border-color); margin-bottom: 20px; overflow: hidden; padding: 4px 0; }}")?;
    writeln!(writer, "    table {{ width: 100%; border-collapse: collapse; font-size: 13px; }}")?;
    writeln!(writer, "    th {{ text-align: left; padding: 8px 16px; font-size: 11px; text-transform: uppercase; letter-spacing: 0.6px; color: var(--text-secondary); border-bottom: 1px solid var(--border-color); }}")?;
    writeln!(writer, "    td {{ padding: 6px 16px; border-bottom: 1px solid var(--border-color); vertical-align: top; }}")?;
    writeln!(writer, "    tr:last-child td {{ border-bottom: none; }}")?;
    writeln!(writer, "    tbody tr:hover {{ background: var(--hover-bg); }}")?;
    writeln!(writer, "    a {{ color: var(--accent-color); text-decoration: none; }}")?;
    writeln!(writer, "    a:hover {{ text-decoration: underline; }}")?;

    writeln!(writer, "    .level {{ display: inline-block; min-width: 96px; text-align: center; padding: 3px 10px; border-radius: 6px; color: #ffffff; font-size: 12px; font-weight: 700; letter-spacing: 0.4px; }}")?;
    writeln!(writer, "    .legend {{ display: flex; gap: 8px; flex-wrap: wrap; margin: 12px 16px; }}")?;
    writeln!(writer, "    .version {{ color: var(--text-secondary); font-size: 12px; margin-left: 6px; }}")?;

    writeln!(writer, "    .package {{ padding: 12px 16px; border-bottom: 1px solid var(--border-color); }}")?;
    writeln!(writer, "    .package:last-child {{ border-bottom: none; }}")?;
    writeln!(writer, "    .package-title {{ font-weight: 700; font-size: 15px; }}")?;
    writeln!(writer, "    .maintainer {{ color: var(--text-secondary); font-size: 12px; margin-left: 8px; }}")?;
    writeln!(writer, "    details {{ margin: 6px 0 0 12px; }}")?;
    writeln!(writer, "    summary {{ cursor: pointer; font-size: 13px; }}")?;
    writeln!(writer, "    .message-label {{ font-size: 12px; font-weight: 600; margin: 8px 0 2px 0; color: var(--text-secondary); }}")?;
    writeln!(writer, "    pre {{ margin: 0; padding: 8px 12px; background: var(--hover-bg); border: 1px solid var(--border-color); border-radius: 6px; font-size: 12px; overflow-x: auto; white-space: pre-wrap; }}")?;

    writeln!(writer, "    .bar-cell {{ width: 40%; }}")?;
    writeln!(writer, "    .bar {{ height: 10px; border-radius: 5px; background: var(--accent-color); }}")?;
    writeln!(writer, "    .number {{ text-align: right; font-variant-numeric: tabular-nums; }}")?;
    writeln!(writer, "    .tag {{ display: inline-block; padding: 1px 8px; border-radius: 10px; font-size: 11px; font-weight: 600; border: 1px solid var(--border-color); margin-right: 4px; }}")?;
    writeln!(writer, "    .tag.bug {{ color: #dc2626; border-color: #dc2626; }}")?;
    writeln!(writer, "    .na {{ color: var(--text-secondary); font-style: italic; }}")?;
    writeln!(writer, "  </style>")?;
    Ok(())
}

fn write_header<W: Write>(writer: &mut W, snapshot: &Snapshot, now: DateTime<Utc>) -> Result<()> {
    let date = now.format("%Y-%m-%d").to_string();
    writeln!(writer, "  <div class=\"header\">")?;
    writeln!(writer, "    <div class=\"header-content\">")?;
    writeln!(writer, "      <h1>Package Status Dashboard</h1>")?;
    writeln!(
        writer,
        "      <p class=\"subtitle\">Produced by bioc-status {} on {}</p>",
        env!("CARGO_PKG_VERSION"),
        date
    )?;
    writeln!(
        writer,
        "      <p class=\"data-age\">The data below are {} old.</p>",
        common::format_age_hours(snapshot.age_hours(now))
    )?;
    writeln!(writer, "    </div>")?;
    writeln!(writer, "    <button class=\"theme-toggle\" onclick=\"toggleTheme()\" aria-label=\"Toggle theme\">")?;
    writeln!(writer, "      <svg id=\"theme-icon\" viewBox=\"0 0 24 24\"><path d=\"M21 12.79A9 9 0 1 1 11.21 3 7 7 0 0 0 21 12.79z\"/></svg>")?;
    writeln!(writer, "    </button>")?;
    writeln!(writer, "  </div>")?;
    Ok(())
}

fn write_filter_bar<W: Write>(writer: &mut W) -> Result<()> {
    writeln!(writer, "  <div class=\"filter-bar\">")?;
    writeln!(writer, "    <span class=\"label\">Show packages with:</span>")?;
    writeln!(writer, "    <button class=\"filter-btn active\" data-filter=\"all\" onclick=\"filterByLevel('all')\">All</button>")?;
    for level in LogLevel::iter() {
        let slug = level_slug(level);
        writeln!(
            writer,
            "    <button class=\"filter-btn\" data-filter=\"{slug}\" onclick=\"filterByLevel('{slug}')\">{level}</button>"
        )?;
    }
    writeln!(writer, "  </div>")?;
    Ok(())
}

fn write_status_grid<W: Write>(writer: &mut W, snapshot: &Snapshot) -> Result<()> {
    writeln!(writer, "  <h2>Build status</h2>")?;
    writeln!(writer, "  <div class=\"card\">")?;
    writeln!(writer, "    <table>")?;
    write!(writer, "      <thead><tr><th>Package</th>")?;
    for channel in &snapshot.channels {
        write!(writer, "<th>{channel}</th>")?;
    }
    writeln!(writer, "</tr></thead>")?;
    writeln!(writer, "      <tbody>")?;

    for name in common::status_package_names(snapshot) {
        let records = common::statuses_of(snapshot, name);
        writeln!(writer, "        <tr class=\"status-row\" data-levels=\"{}\">", levels_attr(&records))?;
        writeln!(writer, "          <td><a href=\"#{}\">{}</a></td>", package_anchor_id(name), html_escape(name))?;

        for channel in &snapshot.channels {
            match records.iter().find(|r| r.channel == *channel) {
                Some(record) => {
                    write!(writer, "          <td>{}", level_badge(record.log_level))?;
                    if let Some(version) = &record.version {
                        write!(writer, "<span class=\"version\">{}</span>", html_escape(version))?;
                    }
                    writeln!(writer, "</td>")?;
                }
                None => writeln!(writer, "          <td><span class=\"na\">n/a</span></td>")?,
            }
        }

        writeln!(writer, "        </tr>")?;
    }

    writeln!(writer, "      </tbody>")?;
    writeln!(writer, "    </table>")?;

    writeln!(writer, "    <div class=\"legend\">")?;
    for level in LogLevel::iter() {
        writeln!(writer, "      {}", level_badge(level))?;
    }
    writeln!(writer, "    </div>")?;
    writeln!(writer, "  </div>")?;
    Ok(())
}

fn write_status_details<W: Write>(writer: &mut W, snapshot: &Snapshot) -> Result<()> {
    writeln!(writer, "  <h2>Details</h2>")?;
    writeln!(writer, "  <div class=\"card\" id=\"package-list\">")?;

    for name in common::status_package_names(snapshot) {
        let records = common::statuses_of(snapshot, name);
        writeln!(
            writer,
            "    <div class=\"package status-row\" id=\"{}\" data-levels=\"{}\">",
            package_anchor_id(name),
            levels_attr(&records)
        )?;
        write!(writer, "      <span class=\"package-title\">{}</span>", html_escape(name))?;
        if let Some(maintainer) = records.iter().find_map(|r| r.maintainer.as_deref()) {
            write!(writer, "<span class=\"maintainer\">{}</span>", html_escape(maintainer))?;
        }
        writeln!(writer)?;

        for record in records {
            write_record_details(writer, record)?;
        }

        writeln!(writer, "    </div>")?;
    }

    writeln!(writer, "  </div>")?;
    Ok(())
}

fn write_record_details<W: Write>(writer: &mut W, record: &StatusRecord) -> Result<()> {
    let summary = html_escape(&record.summary());

    if record.messages.is_empty() {
        writeln!(writer, "      <p>{} {summary}</p>", level_badge(record.log_level))?;
        return Ok(());
    }

    writeln!(writer, "      <details>")?;
    writeln!(writer, "        <summary>{} {summary}</summary>", level_badge(record.log_level))?;
    for (index, message) in record.messages.iter().enumerate() {
        writeln!(
            writer,
            "        <div class=\"message-label\">{}</div>",
            html_escape(&common::message_label(record, index + 1))
        )?;
        writeln!(writer, "        <pre>{}</pre>", html_escape(message.trim_matches('\n')))?;
    }
    writeln!(writer, "      </details>")?;
    Ok(())
}

fn write_downloads<W: Write>(writer: &mut W, snapshot: &Snapshot) -> Result<()> {
    writeln!(writer, "  <h2>Downloads</h2>")?;

    for group in common::group_downloads(&snapshot.downloads) {
        let peak = group.peak();
        writeln!(writer, "  <div class=\"card\">")?;
        writeln!(writer, "    <table>")?;
        writeln!(
            writer,
            "      <thead><tr><th>{}</th><th class=\"number\">Downloads</th><th class=\"number\">Distinct IPs</th><th></th></tr></thead>",
            html_escape(group.name)
        )?;
        writeln!(writer, "      <tbody>")?;
        for stat in &group.months {
            writeln!(writer, "        <tr>")?;
            writeln!(writer, "          <td>{}</td>", stat.month)?;
            writeln!(writer, "          <td class=\"number\">{}</td>", common::format_count(stat.downloads))?;
            writeln!(writer, "          <td class=\"number\">{}</td>", common::format_count(stat.distinct_ips))?;
            writeln!(
                writer,
                "          <td class=\"bar-cell\"><div class=\"bar\" style=\"width: {}%\"></div></td>",
                bar_percent(stat.downloads, peak)
            )?;
            writeln!(writer, "        </tr>")?;
        }
        writeln!(writer, "      </tbody>")?;
        writeln!(writer, "    </table>")?;
        writeln!(writer, "  </div>")?;
    }

    Ok(())
}

fn write_issues<W: Write>(writer: &mut W, snapshot: &Snapshot) -> Result<()> {
    writeln!(writer, "  <h2>Open issues</h2>")?;
    writeln!(writer, "  <div class=\"card\">")?;
    writeln!(writer, "    <table>")?;
    writeln!(writer, "      <thead><tr><th>Package</th><th>Issue</th><th>Title</th><th>Tags</th></tr></thead>")?;
    writeln!(writer, "      <tbody>")?;

    for (name, lookup) in &snapshot.issues {
        match lookup {
            IssueLookup::Known { issues } if issues.is_empty() => {
                writeln!(
                    writer,
                    "        <tr><td>{}</td><td colspan=\"3\"><span class=\"na\">no open issues</span></td></tr>",
                    html_escape(name)
                )?;
            }
            IssueLookup::Known { issues } => {
                for issue in issues {
                    writeln!(writer, "        <tr>")?;
                    writeln!(writer, "          <td>{}</td>", html_escape(name))?;
                    writeln!(
                        writer,
                        "          <td><a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">#{}</a></td>",
                        html_escape(&issue.url),
                        issue.number
                    )?;
                    writeln!(writer, "          <td>{}</td>", html_escape(&issue.title))?;
                    write!(writer, "          <td>")?;
                    if issue.is_bug {
                        write!(writer, "<span class=\"tag bug\">bug</span>")?;
                    } else if issue.is_labeled {
                        write!(writer, "<span class=\"tag\">labeled</span>")?;
                    }
                    if !issue.is_assigned {
                        write!(writer, "<span class=\"tag\">unassigned</span>")?;
                    }
                    writeln!(writer, "</td>")?;
                    writeln!(writer, "        </tr>")?;
                }
            }
            IssueLookup::Unknown { reason } => {
                writeln!(
                    writer,
                    "        <tr><td>{}</td><td colspan=\"3\"><span class=\"na\">unknown: {}</span></td></tr>",
                    html_escape(name),
                    html_escape(reason)
                )?;
            }
        }
    }

    writeln!(writer, "      </tbody>")?;
    writeln!(writer, "    </table>")?;
    writeln!(writer, "  </div>")?;
    Ok(())
}

fn write_scripts<W: Write>(writer: &mut W, has_filter: bool) -> Result<()> {
    writeln!(writer, "  <script>")?;
    writeln!(writer, "    function getSystemTheme() {{")?;
    writeln!(writer, "      return window.matchMedia('(prefers-color-scheme: dark)').matches ? 'dark' : 'light';")?;
    writeln!(writer, "    }}")?;
    writeln!(writer, "    function applyTheme(theme) {{")?;
    writeln!(writer, "      document.body.classList.remove('dark-theme', 'light-theme');")?;
    writeln!(writer, "      document.body.classList.add(theme + '-theme');")?;
    writeln!(writer, "    }}")?;
    writeln!(writer, "    function toggleTheme() {{")?;
    writeln!(writer, "      const currentTheme = localStorage.getItem('theme') || getSystemTheme();")?;
    writeln!(writer, "      const newTheme = currentTheme === 'dark' ? 'light' : 'dark';")?;
    writeln!(writer, "      localStorage.setItem('theme', newTheme);")?;
    writeln!(writer, "      applyTheme(newTheme);")?;
    writeln!(writer, "    }}")?;

    if has_filter {
        writeln!(writer, "    function filterByLevel(level) {{")?;
        writeln!(writer, "      document.querySelectorAll('.filter-btn').forEach(b => b.classList.remove('active'));")?;
        writeln!(writer, "      document.querySelector('.filter-btn[data-filter=\"' + level + '\"]').classList.add('active');")?;
        writeln!(writer, "      document.querySelectorAll('.status-row').forEach(row => {{")?;
        writeln!(writer, "        if (level === 'all') {{ row.style.display = ''; }}")?;
        writeln!(writer, "        else {{ row.style.display = row.dataset.levels.split(' ').includes(level) ? '' : 'none'; }}")?;
        writeln!(writer, "      }});")?;
        writeln!(writer, "    }}")?;
    }

    writeln!(writer, "    const savedTheme = localStorage.getItem('theme');")?;
    writeln!(writer, "    applyTheme(savedTheme || getSystemTheme());")?;
    writeln!(writer, "  </script>")?;
    Ok(())
}

const fn level_slug(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Ok => "ok",
        LogLevel::Warnings => "warnings",
        LogLevel::Error => "error",
        LogLevel::Timeout => "timeout",
        LogLevel::NotFound => "not-found",
    }
}

fn level_badge(level: LogLevel) -> String {
    format!(
        "<span class=\"level\" data-level=\"{}\" style=\"background: #{:06x}\">{level}</span>",
        level_slug(level),
        common::level_rgb(level)
    )
}

/// Space-separated distinct level slugs of a package's records, for filtering.
fn levels_attr(records: &[&StatusRecord]) -> String {
    let mut slugs: Vec<&str> = Vec::new();
    for record in records {
        let slug = level_slug(record.log_level);
        if !slugs.contains(&slug) {
            slugs.push(slug);
        }
    }
    slugs.join(" ")
}

fn package_anchor_id(name: &str) -> String {
    let mut id = String::with_capacity(name.len() + 4);
    id.push_str("pkg-");
    for c in name.chars() {
        if c.is_ascii_alphanumeric() || c == '.' {
            id.push(c);
        } else {
            id.push('-');
        }
    }
    id
}

/// Bar width relative to the busiest month, rounded down to a whole percent.
fn bar_percent(downloads: u64, peak: u64) -> u64 {
    if peak == 0 {
        return 0;
    }
    downloads.saturating_mul(100) / peak
}

fn html_escape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(c),
        }
    }
    result
}
