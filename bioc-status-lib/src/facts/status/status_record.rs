use super::{LogLevel, Stage};
use crate::facts::Channel;
use crate::facts::packages::PackageType;
use serde::{Deserialize, Serialize};

/// Build outcome of one package in one release channel.
///
/// A record is `OK` or `NOT FOUND` exactly when it has no stage and no messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRecord {
    pub name: String,

    #[serde(rename = "type")]
    pub package_type: PackageType,

    pub channel: Channel,
    pub version: Option<String>,
    pub maintainer: Option<String>,
    pub log_level: LogLevel,
    pub stage: Option<Stage>,
    pub messages: Vec<String>,
}

impl StatusRecord {
    /// A record for a package missing from the report.
    #[must_use]
    pub fn not_found(name: impl Into<String>, package_type: PackageType, channel: Channel) -> Self {
        Self {
            name: name.into(),
            package_type,
            channel,
            version: None,
            maintainer: None,
            log_level: LogLevel::NotFound,
            stage: None,
            messages: Vec::new(),
        }
    }

    #[must_use]
    pub const fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// One-sentence description of the record, as shown next to the status grid.
    #[must_use]
    pub fn summary(&self) -> String {
        match self.log_level {
            LogLevel::Ok => format!("There were no problems in the {} build of {}.", self.channel, self.name),
            LogLevel::NotFound => format!("{} was not found in the list of Bioconductor packages.", self.name),
            level => {
                let count = self.message_count();
                let noun = match level {
                    LogLevel::Warnings if count < 2 => "warning".to_string(),
                    other => other.to_string().to_lowercase(),
                };
                let stage = self.stage.map_or_else(|| "an unknown stage".to_string(), |s| s.to_string());
                format!("{} had {count} {noun} during {stage}.", self.name)
            }
        }
    }
}
