//! The list of packages Bioconductor publishes, from the per-category `PACKAGES` manifests.

mod package_record;
mod package_type;
mod provider;

pub use package_record::PackageRecord;
pub use package_type::PackageType;
pub use provider::{Provider, manifest_package_names};
