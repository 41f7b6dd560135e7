use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// The category a Bioconductor package is published under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, EnumIter, ValueEnum)]
pub enum PackageType {
    Software,
    Workflow,
    ExperimentData,
    AnnotationData,
}

impl PackageType {
    /// Repository path segment used by manifests and description pages.
    #[must_use]
    pub const fn repository(self) -> &'static str {
        match self {
            Self::Software => "bioc",
            Self::Workflow => "workflows",
            Self::ExperimentData => "data/experiment",
            Self::AnnotationData => "data/annotation",
        }
    }

    /// Name of the build report covering this category.
    ///
    /// Annotation packages are not built, so they have no report.
    #[must_use]
    pub const fn report(self) -> Option<&'static str> {
        match self {
            Self::Software => Some("bioc"),
            Self::Workflow => Some("workflows"),
            Self::ExperimentData => Some("data-experiment"),
            Self::AnnotationData => None,
        }
    }

    /// Directory holding the download statistics of this category.
    #[must_use]
    pub const fn stats_directory(self) -> &'static str {
        match self {
            Self::Software => "bioc",
            Self::Workflow => "workflows",
            Self::ExperimentData => "data-experiment",
            Self::AnnotationData => "data-annotation",
        }
    }
}
