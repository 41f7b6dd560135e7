use super::{PackageRecord, PackageType};
use crate::Result;
use crate::facts::{Channel, PageFetcher, Progress, ReportUrls};
use ohno::EnrichableExt;
use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;
use strum::IntoEnumIterator;

const LOG_TARGET: &str = "  packages";

static PACKAGE_FIELD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^Package:[ \t]*(\S+)").expect("invalid regex"));

/// Extract the package names listed in a `PACKAGES` manifest.
pub fn manifest_package_names(manifest: &str) -> impl Iterator<Item = &str> {
    PACKAGE_FIELD
        .captures_iter(manifest)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
}

/// Lists the packages Bioconductor publishes.
#[derive(Debug, Clone)]
pub struct Provider {
    fetcher: PageFetcher,
    urls: ReportUrls,
}

impl Provider {
    #[must_use]
    pub const fn new(fetcher: PageFetcher, urls: ReportUrls) -> Self {
        Self { fetcher, urls }
    }

    /// Every package of every category, sorted by name.
    ///
    /// A name listed under more than one category keeps the first category, in
    /// [`PackageType`] order. Fails if any manifest cannot be fetched.
    pub async fn get_packages(&self, channel: Channel, progress: &dyn Progress) -> Result<Vec<PackageRecord>> {
        let mut known: BTreeMap<String, PackageType> = BTreeMap::new();

        progress.set_phase("Package manifests", PackageType::iter().len() as u64);
        for package_type in PackageType::iter() {
            let url = self.urls.manifest(channel, package_type)?;
            let manifest = self
                .fetcher
                .fetch(&url)
                .await
                .map_err(|e| e.enrich_with(|| format!("listing {package_type} packages")))?;

            let before = known.len();
            for name in manifest_package_names(&manifest) {
                let _ = known.entry(name.to_string()).or_insert(package_type);
            }

            log::info!(target: LOG_TARGET, "Found {} new {package_type} package(s) in the {channel} manifest", known.len() - before);
            progress.advance(&package_type.to_string());
        }

        Ok(known
            .into_iter()
            .map(|(name, package_type)| PackageRecord::new(name, package_type))
            .collect())
    }

    /// Tag requested package names with their category.
    ///
    /// Names missing from every manifest are treated as software packages, so the status
    /// lookup can still report them as not found.
    pub async fn resolve(&self, channel: Channel, names: &[String], progress: &dyn Progress) -> Result<Vec<PackageRecord>> {
        let known: HashMap<String, PackageType> = self
            .get_packages(channel, progress)
            .await?
            .into_iter()
            .map(|record| (record.name, record.package_type))
            .collect();

        Ok(names
            .iter()
            .map(|name| {
                let package_type = known.get(name).copied().unwrap_or_else(|| {
                    log::warn!(target: LOG_TARGET, "'{name}' is not listed in any {channel} manifest");
                    PackageType::Software
                });
                PackageRecord::new(name.clone(), package_type)
            })
            .collect())
    }
}
