use crate::Result;
use core::fmt::{Display, Formatter};
use ohno::{IntoAppError, bail};
use url::Url;

/// A source repository, identified by host, owner and name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoSpec {
    url: Url,
    host: String,
    owner: String,
    repo: String,
}

impl RepoSpec {
    /// Parse a repository from a bug tracker URL such as
    /// `https://github.com/owner/repo/issues`.
    ///
    /// Anything after the repository name is ignored.
    pub fn parse(url: &Url) -> Result<Self> {
        let segments: Vec<&str> = url.path_segments().map(Iterator::collect).unwrap_or_default();

        let (Some(owner), Some(repo)) = (segments.first().copied(), segments.get(1).copied()) else {
            bail!("invalid repository URL format: {url}");
        };

        let repo = repo.trim_end_matches(".git");
        if owner.is_empty() || repo.is_empty() || repo == "issues" {
            bail!("invalid repository URL: empty owner or repository name: {url}");
        }

        let host = url.host_str().unwrap_or_default();
        let clean_url = Url::parse(&format!("{}://{host}/{owner}/{repo}", url.scheme())).into_app_err("reconstructing repository URL")?;

        Ok(Self {
            host: host.to_string(),
            owner: owner.to_string(),
            repo: repo.to_string(),
            url: clean_url,
        })
    }

    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    #[must_use]
    pub fn repo(&self) -> &str {
        &self.repo
    }
}

impl Display for RepoSpec {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(url: &str) -> Result<RepoSpec> {
        RepoSpec::parse(&Url::parse(url).unwrap())
    }

    #[test]
    fn test_parse_issue_tracker_url() {
        let spec = parse("https://github.com/Bioconductor/BiocCheck/issues").unwrap();
        assert_eq!(spec.host(), "github.com");
        assert_eq!(spec.owner(), "Bioconductor");
        assert_eq!(spec.repo(), "BiocCheck");
        assert_eq!(spec.url().as_str(), "https://github.com/Bioconductor/BiocCheck");
    }

    #[test]
    fn test_parse_repository_url() {
        let spec = parse("https://github.com/Bioconductor/S4Vectors").unwrap();
        assert_eq!(spec.repo(), "S4Vectors");
    }

    #[test]
    fn test_git_extension_and_trailing_slash() {
        let spec = parse("https://github.com/owner/pkg.git/").unwrap();
        assert_eq!(spec.repo(), "pkg");
    }

    #[test]
    fn test_same_repo_different_paths_are_equal() {
        assert_eq!(parse("https://github.com/a/b/issues").unwrap(), parse("https://github.com/a/b").unwrap());
    }

    #[test]
    fn test_other_hosts_parse() {
        let spec = parse("https://gitlab.com/group/project/-/issues").unwrap();
        assert_eq!(spec.host(), "gitlab.com");
        assert_eq!(spec.repo(), "project");
    }

    #[test]
    fn test_invalid_urls() {
        let _ = parse("https://github.com/").unwrap_err();
        let _ = parse("https://github.com/owner").unwrap_err();
        let _ = parse("https://github.com//repo").unwrap_err();
        let _ = parse("https://github.com/owner/issues").unwrap_err();
    }

    #[test]
    fn test_display() {
        assert_eq!(parse("https://github.com/a/b/issues").unwrap().to_string(), "a/b");
    }
}
