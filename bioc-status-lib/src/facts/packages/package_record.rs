use super::PackageType;
use serde::{Deserialize, Serialize};

/// A known Bioconductor package.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackageRecord {
    pub name: String,

    #[serde(rename = "type")]
    pub package_type: PackageType,
}

impl PackageRecord {
    #[must_use]
    pub fn new(name: impl Into<String>, package_type: PackageType) -> Self {
        Self {
            name: name.into(),
            package_type,
        }
    }
}
