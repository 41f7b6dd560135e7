use crate::Result;
use crate::facts::Channel;
use crate::facts::packages::PackageType;
use ohno::IntoAppError;
use url::Url;

/// Builds the URLs of the Bioconductor website resources used by the providers.
#[derive(Debug, Clone)]
pub struct ReportUrls {
    base: String,
}

impl ReportUrls {
    pub fn new(base_url: &str) -> Result<Self> {
        let _ = Url::parse(base_url).into_app_err_with(|| format!("invalid base URL '{base_url}'"))?;
        Ok(Self {
            base: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// The long report listing every package of a report type.
    pub fn long_report(&self, channel: Channel, report: &str) -> Result<Url> {
        self.parse(&format!("{}/checkResults/{channel}/{report}-LATEST/", self.base))
    }

    /// A page below a package's report directory, for example its per-node log files.
    ///
    /// An empty `path` names the package's own report page.
    pub fn package_report(&self, channel: Channel, report: &str, package: &str, path: &str) -> Result<Url> {
        self.parse(&format!("{}/checkResults/{channel}/{report}-LATEST/{package}/{path}", self.base))
    }

    /// The `PACKAGES` manifest of one package category.
    pub fn manifest(&self, channel: Channel, package_type: PackageType) -> Result<Url> {
        self.parse(&format!(
            "{}/packages/{channel}/{}/src/contrib/PACKAGES",
            self.base,
            package_type.repository()
        ))
    }

    /// The monthly download statistics of a package.
    pub fn download_stats(&self, package_type: PackageType, package: &str) -> Result<Url> {
        self.parse(&format!(
            "{}/packages/stats/{}/{package}/{package}_stats.tab",
            self.base,
            package_type.stats_directory()
        ))
    }

    /// The description page of a package.
    pub fn description(&self, channel: Channel, package_type: PackageType, package: &str) -> Result<Url> {
        self.parse(&format!(
            "{}/packages/{channel}/{}/html/{package}.html",
            self.base,
            package_type.repository()
        ))
    }

    fn parse(&self, url: &str) -> Result<Url> {
        Url::parse(url).into_app_err_with(|| format!("building URL '{url}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urls() -> ReportUrls {
        ReportUrls::new("https://bioconductor.org/").unwrap()
    }

    #[test]
    fn test_long_report() {
        assert_eq!(
            urls().long_report(Channel::Devel, "bioc").unwrap().as_str(),
            "https://bioconductor.org/checkResults/devel/bioc-LATEST/"
        );
    }

    #[test]
    fn test_package_report() {
        assert_eq!(
            urls()
                .package_report(Channel::Release, "data-experiment", "airway", "")
                .unwrap()
                .as_str(),
            "https://bioconductor.org/checkResults/release/data-experiment-LATEST/airway/"
        );
        assert_eq!(
            urls()
                .package_report(Channel::Release, "bioc", "BiocCheck", "nebbiolo2-checksrc.html")
                .unwrap()
                .as_str(),
            "https://bioconductor.org/checkResults/release/bioc-LATEST/BiocCheck/nebbiolo2-checksrc.html"
        );
    }

    #[test]
    fn test_manifest() {
        assert_eq!(
            urls().manifest(Channel::Release, PackageType::ExperimentData).unwrap().as_str(),
            "https://bioconductor.org/packages/release/data/experiment/src/contrib/PACKAGES"
        );
    }

    #[test]
    fn test_download_stats() {
        assert_eq!(
            urls().download_stats(PackageType::Software, "BiocCheck").unwrap().as_str(),
            "https://bioconductor.org/packages/stats/bioc/BiocCheck/BiocCheck_stats.tab"
        );
        assert_eq!(
            urls().download_stats(PackageType::AnnotationData, "org.Hs.eg.db").unwrap().as_str(),
            "https://bioconductor.org/packages/stats/data-annotation/org.Hs.eg.db/org.Hs.eg.db_stats.tab"
        );
    }

    #[test]
    fn test_description() {
        assert_eq!(
            urls().description(Channel::Devel, PackageType::Workflow, "rnaseqGene").unwrap().as_str(),
            "https://bioconductor.org/packages/devel/workflows/html/rnaseqGene.html"
        );
    }

    #[test]
    fn test_invalid_base() {
        let _ = ReportUrls::new("not a url").unwrap_err();
    }
}
