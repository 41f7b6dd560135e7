use serde::{Deserialize, Serialize};
use strum::Display;

/// The build step a failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Stage {
    Install,
    Build,
    Check,
    Bin,

    /// The package failed before a build log was produced.
    PreBuild,
}

impl Stage {
    /// Map a log file name token, such as `checksrc`, to its stage.
    #[must_use]
    pub fn from_log_token(token: &str) -> Option<Self> {
        match token {
            "install" => Some(Self::Install),
            "buildsrc" => Some(Self::Build),
            "checksrc" => Some(Self::Check),
            "buildbin" => Some(Self::Bin),
            _ => None,
        }
    }

    /// Derive the stage from a log link such as `BiocCheck/nebbiolo2-checksrc.html`.
    ///
    /// The file name is split on `-` and `.`, and the second-to-last token names the
    /// stage. When that token is not a stage name the remaining tokens are searched from
    /// the end, so links like `checksrc-error.html` still resolve.
    #[must_use]
    pub fn from_log_link(href: &str) -> Option<Self> {
        let path = href.split(['?', '#']).next().unwrap_or(href);
        let file_name = path.rsplit('/').next().unwrap_or(path);
        let tokens: Vec<&str> = file_name.split(['-', '.']).collect();

        let second_to_last = tokens.len().checked_sub(2).and_then(|i| tokens.get(i));
        if let Some(stage) = second_to_last.and_then(|token| Self::from_log_token(token)) {
            return Some(stage);
        }

        tokens.iter().rev().find_map(|token| Self::from_log_token(token))
    }
}
