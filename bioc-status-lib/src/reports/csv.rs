use super::table::StatusTable;
use crate::Result;
use crate::facts::downloads::DownloadStat;
use crate::facts::issues::IssueLookup;
use crate::facts::status::StatusRecord;
use std::collections::BTreeMap;
use std::io::Write;

/// Write the status table, with one `Message N` column per message of the longest record.
pub fn generate_statuses<W: Write>(records: &[StatusRecord], writer: W) -> Result<()> {
    let table = StatusTable::new(records);
    let mut csv = csv::Writer::from_writer(writer);

    csv.write_record(table.headers())?;
    for row in table.rows() {
        csv.write_record(row.iter().map(|cell| cell.as_deref().unwrap_or_default()))?;
    }

    csv.flush()?;
    Ok(())
}

pub fn generate_downloads<W: Write>(stats: &[DownloadStat], writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);

    csv.write_record(["Name", "Month", "Downloads", "Distinct IPs"])?;
    for stat in stats {
        csv.write_record([
            stat.name.clone(),
            stat.month.to_string(),
            stat.downloads.to_string(),
            stat.distinct_ips.to_string(),
        ])?;
    }

    csv.flush()?;
    Ok(())
}

/// Write one row per open issue, and one row with a note for each package whose issues are unknown.
pub fn generate_issues<W: Write>(issues: &BTreeMap<String, IssueLookup>, writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);

    csv.write_record(["Package", "Number", "Title", "Labeled", "Bug", "Assigned", "URL", "Note"])?;
    for (name, lookup) in issues {
        match lookup {
            IssueLookup::Known { issues } => {
                for issue in issues {
                    csv.write_record([
                        name.clone(),
                        issue.number.to_string(),
                        issue.title.clone(),
                        issue.is_labeled.to_string(),
                        issue.is_bug.to_string(),
                        issue.is_assigned.to_string(),
                        issue.url.clone(),
                        String::new(),
                    ])?;
                }
            }
            IssueLookup::Unknown { reason } => {
                csv.write_record([name.as_str(), "", "", "", "", "", "", reason.as_str()])?;
            }
        }
    }

    csv.flush()?;
    Ok(())
}
