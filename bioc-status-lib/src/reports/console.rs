use super::common;
use crate::Result;
use crate::facts::Snapshot;
use crate::facts::issues::IssueLookup;
use crate::facts::status::{LogLevel, StatusRecord};
use core::fmt::Write;
use owo_colors::OwoColorize;
use terminal_size::{Width, terminal_size};

const INDENT: usize = 8;

pub fn generate<W: Write>(snapshot: &Snapshot, use_colors: bool, writer: &mut W) -> Result<()> {
    let mut first = true;
    let mut section = |writer: &mut W, title: &str| -> Result<()> {
        if !first {
            writeln!(writer)?;
        }
        first = false;
        if use_colors {
            writeln!(writer, "{}", title.bold())?;
        } else {
            writeln!(writer, "{title}")?;
        }
        Ok(())
    };

    if !snapshot.statuses.is_empty() {
        section(writer, "Build status")?;
        write_statuses(snapshot, use_colors, writer)?;
    }

    if !snapshot.downloads.is_empty() {
        section(writer, "Downloads")?;
        write_downloads(snapshot, writer)?;
    }

    if !snapshot.issues.is_empty() {
        section(writer, "Open issues")?;
        write_issues(snapshot, use_colors, writer)?;
    }

    Ok(())
}

fn write_statuses<W: Write>(snapshot: &Snapshot, use_colors: bool, writer: &mut W) -> Result<()> {
    let width = terminal_width();

    for name in common::status_package_names(snapshot) {
        let records = common::statuses_of(snapshot, name);
        let package_type = records.first().map(|r| r.package_type.to_string()).unwrap_or_default();
        writeln!(writer, "  {name} ({package_type})")?;

        for record in records {
            let version = record.version.as_deref().unwrap_or("-");
            write!(writer, "    {:<8} {:<12} {}", record.channel.to_string(), version, colored_level(record.log_level, use_colors))?;
            if let Some(stage) = record.stage {
                write!(writer, " during {stage}")?;
            }
            writeln!(writer)?;

            if let Some(maintainer) = &record.maintainer {
                writeln!(writer, "      Maintainer: {maintainer}")?;
            }

            write_messages(record, width, writer)?;
        }
    }

    Ok(())
}

fn write_messages<W: Write>(record: &StatusRecord, width: usize, writer: &mut W) -> Result<()> {
    for (index, message) in record.messages.iter().enumerate() {
        writeln!(writer, "      {}:", common::message_label(record, index + 1))?;
        for line in message.lines().map(str::trim_end).filter(|l| !l.trim().is_empty()) {
            for wrapped in wrap_line(line, width.saturating_sub(INDENT)) {
                writeln!(writer, "{:INDENT$}{wrapped}", "")?;
            }
        }
    }

    Ok(())
}

fn write_downloads<W: Write>(snapshot: &Snapshot, writer: &mut W) -> Result<()> {
    let groups = common::group_downloads(&snapshot.downloads);
    let name_width = groups.iter().map(|g| g.name.len()).max().unwrap_or(0);

    for group in &groups {
        write!(
            writer,
            "  {:<name_width$}  {} download(s) over {} month(s)",
            group.name,
            common::format_count(group.total()),
            group.months.len()
        )?;
        if let Some(latest) = group.latest() {
            write!(
                writer,
                ", {} in {} from {} distinct IP(s)",
                common::format_count(latest.downloads),
                latest.month,
                common::format_count(latest.distinct_ips)
            )?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

fn write_issues<W: Write>(snapshot: &Snapshot, use_colors: bool, writer: &mut W) -> Result<()> {
    for (name, lookup) in &snapshot.issues {
        match lookup {
            IssueLookup::Known { issues } => {
                let bugs = issues.iter().filter(|i| i.is_bug).count();
                let unassigned = issues.iter().filter(|i| !i.is_assigned).count();
                writeln!(writer, "  {name}: {} open, {bugs} bug(s), {unassigned} unassigned", issues.len())?;
                for issue in issues {
                    let marker = if issue.is_bug { " [bug]" } else { "" };
                    writeln!(writer, "    #{} {}{marker}", issue.number, issue.title)?;
                    writeln!(writer, "      {}", issue.url)?;
                }
            }
            IssueLookup::Unknown { reason } => {
                let status = if use_colors {
                    "unknown".magenta().to_string()
                } else {
                    "unknown".to_string()
                };
                writeln!(writer, "  {name}: {status} ({reason})")?;
            }
        }
    }

    Ok(())
}

fn colored_level(level: LogLevel, use_colors: bool) -> String {
    let text = level.to_string();
    if !use_colors {
        return text;
    }

    match level {
        LogLevel::Ok => text.green().bold().to_string(),
        LogLevel::Warnings => text.yellow().bold().to_string(),
        LogLevel::Error | LogLevel::Timeout => text.red().bold().to_string(),
        LogLevel::NotFound => text.magenta().bold().to_string(),
    }
}

/// Get the terminal width, defaulting to 100 if not detectable
fn terminal_width() -> usize {
    terminal_size().map_or(100, |(Width(w), _)| usize::from(w))
}

/// Break a line at whitespace into pieces no wider than `width`.
///
/// Words longer than `width` are kept whole.
fn wrap_line(line: &str, width: usize) -> Vec<String> {
    let indent_len = line.len() - line.trim_start().len();
    if width <= indent_len || line.len() <= width {
        return vec![line.to_string()];
    }

    let indent = &line[..indent_len];
    let mut lines = Vec::new();
    let mut current = indent.to_string();

    for word in line.split_whitespace() {
        if current.len() > indent_len && current.len() + 1 + word.len() > width {
            lines.push(core::mem::replace(&mut current, indent.to_string()));
        }
        if current.len() > indent_len {
            current.push(' ');
        }
        current.push_str(word);
    }

    if current.len() > indent_len {
        lines.push(current);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facts::Channel;
    use crate::facts::downloads::{DownloadStat, YearMonth};
    use crate::facts::issues::IssueRecord;
    use crate::facts::packages::{PackageRecord, PackageType};
    use crate::facts::status::Stage;
    use chrono::Utc;

    fn snapshot() -> Snapshot {
        let mut failing = StatusRecord::not_found("BiocCheck", PackageType::Software, Channel::Devel);
        failing.log_level = LogLevel::Warnings;
        failing.stage = Some(Stage::Check);
        failing.version = Some("1.41.2".to_string());
        failing.maintainer = Some("Marcel Ramos".to_string());
        failing.messages = vec!["\n  checking Rd files ... WARNING\n  prepare_Rd: bad section\n".to_string()];

        let mut ok = StatusRecord::not_found("BiocCheck", PackageType::Software, Channel::Release);
        ok.log_level = LogLevel::Ok;
        ok.version = Some("1.40.0".to_string());

        let mut snapshot = Snapshot {
            channels: vec![Channel::Release, Channel::Devel],
            packages: vec![PackageRecord::new("BiocCheck", PackageType::Software)],
            statuses: vec![ok, failing],
            downloads: vec![DownloadStat {
                name: "BiocCheck".to_string(),
                month: YearMonth::new(2024, 5).unwrap(),
                downloads: 12_345,
                distinct_ips: 678,
            }],
            ..Snapshot::new(Utc::now())
        };

        let _ = snapshot.issues.insert(
            "BiocCheck".to_string(),
            IssueLookup::Known {
                issues: vec![IssueRecord {
                    package_name: "BiocCheck".to_string(),
                    title: "Crash on empty vignette".to_string(),
                    number: 42,
                    is_labeled: true,
                    is_bug: true,
                    is_assigned: false,
                    url: "https://github.com/Bioconductor/BiocCheck/issues/42".to_string(),
                }],
            },
        );
        let _ = snapshot.issues.insert(
            "S4Vectors".to_string(),
            IssueLookup::Unknown {
                reason: "the package does not list a BugReports link".to_string(),
            },
        );
        snapshot
    }

    #[test]
    fn test_generate_empty_snapshot() {
        let mut output = String::new();
        generate(&Snapshot::new(Utc::now()), false, &mut output).unwrap();
        assert_eq!(output, "");
    }

    #[test]
    fn test_generate_all_sections() {
        let mut output = String::new();
        generate(&snapshot(), false, &mut output).unwrap();

        assert!(output.starts_with("Build status\n  BiocCheck (Software)\n"));
        assert!(output.contains("release  1.40.0       OK\n"));
        assert!(output.contains("devel    1.41.2       WARNINGS during check\n"));
        assert!(output.contains("      Maintainer: Marcel Ramos\n"));
        assert!(output.contains("      Warning 1:\n"));
        assert!(output.contains("checking Rd files ... WARNING"));
        assert!(output.contains("\nDownloads\n  BiocCheck  12,345 download(s) over 1 month(s), 12,345 in 2024-05 from 678 distinct IP(s)\n"));
        assert!(output.contains("\nOpen issues\n  BiocCheck: 1 open, 1 bug(s), 1 unassigned\n    #42 Crash on empty vignette [bug]\n"));
        assert!(output.contains("  S4Vectors: unknown (the package does not list a BugReports link)\n"));
    }

    #[test]
    fn test_colors() {
        let mut output = String::new();
        generate(&snapshot(), true, &mut output).unwrap();
        assert!(output.contains("\u{1b}["));
    }

    #[test]
    fn test_wrap_line() {
        assert_eq!(wrap_line("short", 80), vec!["short"]);
        assert_eq!(wrap_line("  one two three", 9), vec!["  one two", "  three"]);
        assert_eq!(wrap_line("unbreakable-word", 4), vec!["unbreakable-word"]);
    }
}
