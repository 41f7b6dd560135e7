//! Common utilities shared across report generators.

use crate::facts::Snapshot;
use crate::facts::downloads::DownloadStat;
use crate::facts::status::{LogLevel, StatusRecord};

/// Dashboard color of a build outcome, as `0xRRGGBB`.
pub const fn level_rgb(level: LogLevel) -> u32 {
    match level {
        LogLevel::Ok => 0x0000_8000,
        LogLevel::Warnings => 0x00FF_A500,
        LogLevel::Error => 0x00FF_0000,
        LogLevel::Timeout => 0x008B_0000,
        LogLevel::NotFound => 0x0080_0080,
    }
}

/// Heading for the `index`th (1-based) message of a record, such as `Warning 2`.
pub fn message_label(record: &StatusRecord, index: usize) -> String {
    let kind = match record.log_level {
        LogLevel::Warnings => "Warning",
        LogLevel::Timeout => "Timeout",
        _ => "Error",
    };
    format!("{kind} {index}")
}

/// The statuses of one package, in the snapshot's channel order.
pub fn statuses_of<'a>(snapshot: &'a Snapshot, name: &str) -> Vec<&'a StatusRecord> {
    let mut records: Vec<&StatusRecord> = snapshot.statuses.iter().filter(|s| s.name == name).collect();
    records.sort_by_key(|s| snapshot.channels.iter().position(|c| *c == s.channel).unwrap_or(usize::MAX));
    records
}

/// The names of every package with statuses, in snapshot order.
pub fn status_package_names(snapshot: &Snapshot) -> Vec<&str> {
    let mut names: Vec<&str> = snapshot.packages.iter().map(|p| p.name.as_str()).collect();
    for status in &snapshot.statuses {
        if !names.contains(&status.name.as_str()) {
            names.push(&status.name);
        }
    }

    names.retain(|name| snapshot.statuses.iter().any(|s| s.name == *name));
    names
}

/// Monthly downloads of one package, oldest month first.
#[derive(Debug)]
pub struct PackageDownloads<'a> {
    pub name: &'a str,
    pub months: Vec<&'a DownloadStat>,
}

impl PackageDownloads<'_> {
    pub fn total(&self) -> u64 {
        self.months.iter().map(|m| m.downloads).sum()
    }

    pub fn peak(&self) -> u64 {
        self.months.iter().map(|m| m.downloads).max().unwrap_or(0)
    }

    pub fn latest(&self) -> Option<&DownloadStat> {
        self.months.last().copied()
    }
}

/// Group download statistics per package, keeping the order packages first appear in.
pub fn group_downloads(stats: &[DownloadStat]) -> Vec<PackageDownloads<'_>> {
    let mut groups: Vec<PackageDownloads<'_>> = Vec::new();
    for stat in stats {
        if let Some(group) = groups.iter_mut().find(|g| g.name == stat.name) {
            group.months.push(stat);
        } else {
            groups.push(PackageDownloads {
                name: &stat.name,
                months: vec![stat],
            });
        }
    }

    for group in &mut groups {
        group.months.sort_by_key(|m| m.month);
    }

    groups
}

/// Format a count with thousands separators.
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, c) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }

    result
}

/// "N hour(s)" the way the dashboard words data age.
pub fn format_age_hours(hours: u64) -> String {
    if hours == 1 { "1 hour".to_string() } else { format!("{hours} hours") }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facts::Channel;
    use crate::facts::downloads::YearMonth;
    use crate::facts::packages::{PackageRecord, PackageType};
    use chrono::Utc;

    fn stat(name: &str, month: u32, downloads: u64) -> DownloadStat {
        DownloadStat {
            name: name.to_string(),
            month: YearMonth::new(2024, month).unwrap(),
            downloads,
            distinct_ips: downloads / 2,
        }
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(1_234_567), "1,234,567");
    }

    #[test]
    fn test_format_age_hours() {
        assert_eq!(format_age_hours(0), "0 hours");
        assert_eq!(format_age_hours(1), "1 hour");
        assert_eq!(format_age_hours(5), "5 hours");
    }

    #[test]
    fn test_group_downloads() {
        let stats = vec![stat("b", 2, 10), stat("a", 1, 5), stat("b", 1, 20), stat("a", 2, 7)];
        let groups = group_downloads(&stats);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].name, "b");
        assert_eq!(groups[0].months[0].month, YearMonth::new(2024, 1).unwrap());
        assert_eq!(groups[0].total(), 30);
        assert_eq!(groups[0].peak(), 20);
        assert_eq!(groups[0].latest().unwrap().downloads, 10);
        assert_eq!(groups[1].total(), 12);
    }

    #[test]
    fn test_statuses_follow_channel_order() {
        let snapshot = Snapshot {
            channels: vec![Channel::Devel, Channel::Release],
            packages: vec![PackageRecord::new("BiocCheck", PackageType::Software)],
            statuses: vec![
                StatusRecord::not_found("BiocCheck", PackageType::Software, Channel::Release),
                StatusRecord::not_found("BiocCheck", PackageType::Software, Channel::Devel),
                StatusRecord::not_found("S4Vectors", PackageType::Software, Channel::Release),
            ],
            ..Snapshot::new(Utc::now())
        };

        let records = statuses_of(&snapshot, "BiocCheck");
        assert_eq!(records.iter().map(|r| r.channel).collect::<Vec<_>>(), vec![Channel::Devel, Channel::Release]);
        assert_eq!(status_package_names(&snapshot), vec!["BiocCheck", "S4Vectors"]);
    }

    #[test]
    fn test_message_label() {
        let mut record = StatusRecord::not_found("BiocCheck", PackageType::Software, Channel::Release);
        record.log_level = LogLevel::Warnings;
        assert_eq!(message_label(&record, 1), "Warning 1");
        record.log_level = LogLevel::Error;
        assert_eq!(message_label(&record, 3), "Error 3");
    }
}
