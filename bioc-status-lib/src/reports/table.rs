use crate::facts::status::StatusRecord;

/// Columns every status row has, before the message columns.
pub const FIXED_COLUMNS: [&str; 8] = ["Name", "Type", "Channel", "Version", "Maintainer", "Log Level", "Stage", "Message Count"];

/// Rectangular view of a batch of status records.
///
/// Records keep a variable number of messages. The table adds `Message 1..M` columns, `M`
/// being the largest message count in the batch, and leaves the missing cells empty.
#[derive(Debug)]
pub struct StatusTable<'a> {
    records: &'a [StatusRecord],
    message_columns: usize,
}

impl<'a> StatusTable<'a> {
    #[must_use]
    pub fn new(records: &'a [StatusRecord]) -> Self {
        Self {
            records,
            message_columns: records.iter().map(StatusRecord::message_count).max().unwrap_or(0),
        }
    }

    #[must_use]
    pub const fn message_columns(&self) -> usize {
        self.message_columns
    }

    #[must_use]
    pub fn headers(&self) -> Vec<String> {
        FIXED_COLUMNS
            .iter()
            .map(ToString::to_string)
            .chain((1..=self.message_columns).map(|i| format!("Message {i}")))
            .collect()
    }

    /// One row per record; `None` marks an absent value.
    pub fn rows(&self) -> impl Iterator<Item = Vec<Option<String>>> + '_ {
        self.records.iter().map(|record| {
            let mut row = Vec::with_capacity(FIXED_COLUMNS.len() + self.message_columns);
            row.push(Some(record.name.clone()));
            row.push(Some(record.package_type.to_string()));
            row.push(Some(record.channel.to_string()));
            row.push(record.version.clone());
            row.push(record.maintainer.clone());
            row.push(Some(record.log_level.to_string()));
            row.push(record.stage.map(|s| s.to_string()));
            row.push(Some(record.message_count().to_string()));
            row.extend((0..self.message_columns).map(|i| record.messages.get(i).cloned()));
            row
        })
    }
}
