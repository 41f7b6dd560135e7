use crate::Result;
use crate::facts::Snapshot;
use chrono::{DateTime, Utc};
use core::fmt::Write;
use serde::Serialize;

#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: DateTime<Utc>,
    data_age_hours: u64,

    #[serde(flatten)]
    snapshot: &'a Snapshot,
}

/// Write the whole snapshot, along with when the report was produced and how old its data is.
pub fn generate<W: Write>(snapshot: &Snapshot, now: DateTime<Utc>, writer: &mut W) -> Result<()> {
    let report = JsonReport {
        generated_at: now,
        data_age_hours: snapshot.age_hours(now),
        snapshot,
    };

    write!(writer, "{}", serde_json::to_string_pretty(&report)?)?;
    Ok(())
}
