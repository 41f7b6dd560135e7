use crate::Result;
use crate::facts::Channel;
use camino::{Utf8Path, Utf8PathBuf};
use core::time::Duration;
use ohno::{IntoAppError, app_err};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use url::Url;

/// The default configuration TOML content, embedded from `default_config.toml`
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../../default_config.toml");

/// Name of the configuration file looked up in the current directory
pub const DEFAULT_CONFIG_FILE: &str = "bioc-status.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Root of the Bioconductor website
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Root of the GitHub REST API
    #[serde(default = "default_github_api_url")]
    pub github_api_url: String,

    /// Release channels to report on, in display order
    #[serde(default = "default_channels")]
    pub channels: Vec<Channel>,

    /// Timeout applied to every request
    #[serde(default = "default_request_timeout", with = "humantime_serde")]
    pub request_timeout: Duration,

    /// Duration to keep fetched pages before fetching them again
    #[serde(default = "default_ttl", with = "humantime_serde")]
    pub cache_ttl: Duration,

    /// Duration after which the dashboard snapshot is collected again
    #[serde(default = "default_ttl", with = "humantime_serde")]
    pub snapshot_ttl: Duration,

    /// File listing the packages to monitor, one per line
    #[serde(default)]
    pub packages_file: Option<Utf8PathBuf>,

    /// File holding a GitHub token
    #[serde(default)]
    pub github_token_file: Option<Utf8PathBuf>,
}

fn default_base_url() -> String {
    "https://bioconductor.org".to_string()
}

fn default_github_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_channels() -> Vec<Channel> {
    vec![Channel::Release, Channel::Devel]
}

const fn default_request_timeout() -> Duration {
    Duration::from_secs(5)
}

const fn default_ttl() -> Duration {
    Duration::from_hours(8)
}

impl Config {
    /// Load configuration from a file or use defaults
    ///
    /// Without an explicit path, `bioc-status.toml` is looked up in `base_dir` and the
    /// defaults are used when it does not exist.
    pub fn load(base_dir: &Utf8Path, config_path: Option<&Utf8PathBuf>) -> Result<Self> {
        let (final_path, text) = if let Some(path) = config_path {
            let text = fs::read_to_string(path).into_app_err_with(|| format!("reading configuration file '{path}'"))?;
            (path.clone(), text)
        } else {
            let path = base_dir.join(DEFAULT_CONFIG_FILE);
            match fs::read_to_string(&path) {
                Ok(text) => (path, text),
                Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
                Err(e) => return Err(e).into_app_err_with(|| format!("reading configuration file '{path}'")),
            }
        };

        let config: Self = toml::from_str(&text).into_app_err_with(|| format!("parsing configuration file '{final_path}'"))?;
        config.validate()?;

        Ok(config)
    }

    /// Save the default configuration to a TOML file
    pub fn save_default(output_path: &Utf8Path) -> Result<()> {
        fs::write(output_path, DEFAULT_CONFIG_TOML).into_app_err_with(|| format!("writing default configuration to {output_path}"))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        for (key, value) in [("base_url", &self.base_url), ("github_api_url", &self.github_api_url)] {
            let url = Url::parse(value).into_app_err_with(|| format!("{key} '{value}' is not a valid URL"))?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(app_err!("{key} must be an http or https URL, got '{value}'"));
            }
        }

        if self.channels.is_empty() {
            return Err(app_err!("channels must name at least one release channel"));
        }

        for (index, channel) in self.channels.iter().enumerate() {
            if self.channels[..index].contains(channel) {
                return Err(app_err!("channel '{channel}' is listed more than once"));
            }
        }

        if self.request_timeout.is_zero() {
            return Err(app_err!("request_timeout must be greater than zero"));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG_TOML).expect("default_config.toml should be valid TOML that deserializes to Config")
    }
}
