//! Platform policy: supported platforms and their character budgets
//!
//! Pure lookups with no side effects. Unknown platform identifiers resolve
//! to the default budget rather than erroring, so output stays bounded even
//! for platforms this build does not know about.

use serde::{Deserialize, Serialize};

/// Character limit applied when the platform identifier is not recognized
pub const DEFAULT_CHAR_LIMIT: usize = 280;

const TWITTER_CHAR_LIMIT: usize = 280;
const LINKEDIN_CHAR_LIMIT: usize = 3000;
const INSTAGRAM_CHAR_LIMIT: usize = 2200;

/// A supported target platform
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Twitter,
    Linkedin,
    Instagram,
}

impl Platform {
    /// All platforms this build knows about
    pub const ALL: [Platform; 3] = [Platform::Twitter, Platform::Linkedin, Platform::Instagram];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Twitter => "twitter",
            Self::Linkedin => "linkedin",
            Self::Instagram => "instagram",
        }
    }

    /// Maximum number of characters a post may carry on this platform
    pub fn character_limit(&self) -> usize {
        match self {
            Self::Twitter => TWITTER_CHAR_LIMIT,
            Self::Linkedin => LINKEDIN_CHAR_LIMIT,
            Self::Instagram => INSTAGRAM_CHAR_LIMIT,
        }
    }
}

impl std::str::FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "twitter" => Ok(Self::Twitter),
            "linkedin" => Ok(Self::Linkedin),
            "instagram" => Ok(Self::Instagram),
            _ => Err(format!(
                "Invalid platform: '{}'. Valid options: twitter, linkedin, instagram",
                s
            )),
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Resolve the character limit for a platform identifier.
///
/// Unrecognized or empty identifiers fall back to [`DEFAULT_CHAR_LIMIT`]
/// (fail-open, not fail-closed).
pub fn character_limit_for(identifier: &str) -> usize {
    identifier
        .parse::<Platform>()
        .map(|p| p.character_limit())
        .unwrap_or(DEFAULT_CHAR_LIMIT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_character_limits() {
        assert_eq!(Platform::Twitter.character_limit(), 280);
        assert_eq!(Platform::Linkedin.character_limit(), 3000);
        assert_eq!(Platform::Instagram.character_limit(), 2200);
    }

    #[test]
    fn test_character_limit_for_known_platforms() {
        assert_eq!(character_limit_for("twitter"), 280);
        assert_eq!(character_limit_for("linkedin"), 3000);
        assert_eq!(character_limit_for("instagram"), 2200);
    }

    #[test]
    fn test_character_limit_for_unknown_platform_falls_open() {
        assert_eq!(character_limit_for("mastodon"), DEFAULT_CHAR_LIMIT);
        assert_eq!(character_limit_for(""), DEFAULT_CHAR_LIMIT);
        assert_eq!(character_limit_for("TWITTER2"), DEFAULT_CHAR_LIMIT);
    }

    #[test]
    fn test_character_limit_for_is_case_insensitive() {
        assert_eq!(character_limit_for("LinkedIn"), 3000);
        assert_eq!(character_limit_for("TWITTER"), 280);
    }

    #[test]
    fn test_platform_from_str() {
        assert_eq!("twitter".parse::<Platform>().unwrap(), Platform::Twitter);
        assert_eq!("Instagram".parse::<Platform>().unwrap(), Platform::Instagram);

        let result = "myspace".parse::<Platform>();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Invalid platform: 'myspace'"));
    }

    #[test]
    fn test_platform_display_round_trip() {
        for platform in Platform::ALL {
            let parsed: Platform = platform.to_string().parse().unwrap();
            assert_eq!(parsed, platform);
        }
    }

    #[test]
    fn test_platform_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&Platform::Linkedin).unwrap(),
            r#""linkedin""#
        );
        let platform: Platform = serde_json::from_str(r#""twitter""#).unwrap();
        assert_eq!(platform, Platform::Twitter);
    }
}
