use super::client::Issue;
use crate::facts::ProviderResult;
use serde::{Deserialize, Serialize};

/// An open issue in a package's bug tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRecord {
    pub package_name: String,
    pub title: String,
    pub number: u64,
    pub is_labeled: bool,
    pub is_bug: bool,
    pub is_assigned: bool,
    pub url: String,
}

impl IssueRecord {
    #[must_use]
    pub fn from_issue(package_name: &str, issue: Issue) -> Self {
        Self {
            package_name: package_name.to_string(),
            is_labeled: !issue.labels.is_empty(),
            is_bug: issue.labels.iter().any(|label| label.name.eq_ignore_ascii_case("bug")),
            is_assigned: issue.assignee.is_some() || !issue.assignees.is_empty(),
            title: issue.title,
            number: issue.number,
            url: issue.html_url,
        }
    }
}

/// What is known about a package's open issues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum IssueLookup {
    /// The open issues, possibly none.
    Known { issues: Vec<IssueRecord> },

    /// The issues could not be looked up.
    Unknown { reason: String },
}

impl From<ProviderResult<Vec<IssueRecord>>> for IssueLookup {
    fn from(result: ProviderResult<Vec<IssueRecord>>) -> Self {
        match result {
            ProviderResult::Found(issues) => Self::Known { issues },
            ProviderResult::Unknown(reason) => Self::Unknown { reason },
            ProviderResult::Error(e) => Self::Unknown { reason: format!("{e:#}") },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(json: &str) -> Issue {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_bug_label_is_case_insensitive() {
        let record = IssueRecord::from_issue(
            "BiocCheck",
            issue(r#"{"number": 7, "title": "crash", "html_url": "u", "labels": [{"name": "Bug"}], "assignee": null}"#),
        );
        assert!(record.is_bug);
        assert!(record.is_labeled);
        assert!(!record.is_assigned);
        assert_eq!(record.package_name, "BiocCheck");
    }

    #[test]
    fn test_other_labels() {
        let record = IssueRecord::from_issue(
            "BiocCheck",
            issue(r#"{"number": 8, "title": "idea", "html_url": "u", "labels": [{"name": "enhancement"}], "assignees": [{"login": "x"}]}"#),
        );
        assert!(!record.is_bug);
        assert!(record.is_labeled);
        assert!(record.is_assigned);
    }

    #[test]
    fn test_lookup_from_provider_result() {
        let known = IssueLookup::from(ProviderResult::Found(Vec::new()));
        assert_eq!(known, IssueLookup::Known { issues: Vec::new() });

        let failed = IssueLookup::from(ProviderResult::Error(std::sync::Arc::new(ohno::app_err!("HTTP 500"))));
        assert!(matches!(failed, IssueLookup::Unknown { reason } if reason.contains("HTTP 500")));
    }

    #[test]
    fn test_lookup_serialization() {
        let lookup = IssueLookup::Unknown {
            reason: "no BugReports link".to_string(),
        };
        let json = serde_json::to_value(&lookup).unwrap();
        assert_eq!(json["state"], "unknown");
        assert_eq!(json["reason"], "no BugReports link");
    }
}
