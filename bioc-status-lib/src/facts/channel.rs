use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// A Bioconductor release channel.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, EnumString, EnumIter, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Channel {
    /// The current stable release.
    Release,

    /// The development branch.
    Devel,
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_display_is_lowercase() {
        assert_eq!(Channel::Release.to_string(), "release");
        assert_eq!(Channel::Devel.to_string(), "devel");
    }

    #[test]
    fn test_parse() {
        assert_eq!(Channel::from_str("release").unwrap(), Channel::Release);
        assert_eq!(Channel::from_str("devel").unwrap(), Channel::Devel);
        let _ = Channel::from_str("stable").unwrap_err();
    }

    #[test]
    fn test_iteration_order() {
        let all: Vec<_> = Channel::iter().collect();
        assert_eq!(all, vec![Channel::Release, Channel::Devel]);
    }

    #[test]
    fn test_serde_uses_lowercase() {
        assert_eq!(serde_json::to_string(&Channel::Devel).unwrap(), "\"devel\"");
        let parsed: Channel = serde_json::from_str("\"release\"").unwrap();
        assert_eq!(parsed, Channel::Release);
    }
}
