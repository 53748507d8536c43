use std::fmt;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, ensure};
use serde::Deserialize;
use serde::de::{self, Deserializer};

use crate::error::FetchError;

/// Autoplay speed presets offered by the settings menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Speed {
    Slow,
    #[default]
    Normal,
    Fast,
    VeryFast,
}

impl Speed {
    pub const ALL: &'static [Self] = &[Self::Slow, Self::Normal, Self::Fast, Self::VeryFast];
    const NAMES: &'static [&'static str] = &["slow", "normal", "fast", "very-fast"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Slow => "slow",
            Self::Normal => "normal",
            Self::Fast => "fast",
            Self::VeryFast => "very-fast",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Slow => "Slow",
            Self::Normal => "Normal",
            Self::Fast => "Fast",
            Self::VeryFast => "Very Fast",
        }
    }

    /// Time each slide stays up while autoplay runs.
    pub fn interval(&self) -> Duration {
        Duration::from_millis(match self {
            Self::Slow => 8000,
            Self::Normal => 5000,
            Self::Fast => 3000,
            Self::VeryFast => 1500,
        })
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|speed| speed.as_str().eq_ignore_ascii_case(raw))
    }
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Speed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).ok_or_else(|| de::Error::unknown_variant(&raw, Self::NAMES))
    }
}

impl std::str::FromStr for Speed {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown speed preset `{s}`"))
    }
}

/// Connection settings for the NFT indexing service.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct IndexerConfig {
    /// Endpoint prefix; the API key and `getNFTs` are appended.
    pub base_url: String,
    /// Literal API key. Takes precedence over `api-key-env`.
    pub api_key: Option<String>,
    /// Environment variable consulted when `api-key` is unset.
    pub api_key_env: String,
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
}

impl IndexerConfig {
    pub const DEFAULT_BASE_URL: &'static str = "https://eth-mainnet.g.alchemy.com/nft/v2";
    pub const DEFAULT_API_KEY_ENV: &'static str = "ALCHEMY_API_KEY";

    /// Resolves the credential from the config or the environment.
    pub fn resolve_api_key(&self) -> Result<String, FetchError> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .map(|key| key.trim().to_owned())
            .filter(|key| !key.is_empty())
            .ok_or(FetchError::MissingApiKey)
    }

    fn validate(&self) -> Result<()> {
        ensure!(
            self.base_url.starts_with("https://") || self.base_url.starts_with("http://"),
            "indexer.base-url must be an http(s) URL (got `{}`)",
            self.base_url
        );
        ensure!(
            !self.request_timeout.is_zero(),
            "indexer.request-timeout must be greater than zero"
        );
        Ok(())
    }
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.to_owned(),
            api_key: None,
            api_key_env: Self::DEFAULT_API_KEY_ENV.to_owned(),
            request_timeout: Duration::from_secs(15),
        }
    }
}

/// Presentation timing and initial playback state.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct SlideshowOptions {
    pub autoplay: bool,
    pub initial_speed: Speed,
    /// Inactivity before fullscreen controls hide.
    #[serde(with = "humantime_serde")]
    pub controls_hide_delay: Duration,
    /// Grace period after opening settings before outside clicks close it.
    #[serde(with = "humantime_serde")]
    pub settings_arm_delay: Duration,
    /// Gallery header stays visible while scrolled within this many units of the top.
    pub gallery_header_threshold: u32,
}

impl Default for SlideshowOptions {
    fn default() -> Self {
        Self {
            autoplay: true,
            initial_speed: Speed::Normal,
            controls_hide_delay: Duration::from_millis(2500),
            settings_arm_delay: Duration::from_millis(100),
            gallery_header_threshold: 50,
        }
    }
}

impl SlideshowOptions {
    fn validate(&self) -> Result<()> {
        ensure!(
            !self.controls_hide_delay.is_zero(),
            "slideshow.controls-hide-delay must be greater than zero"
        );
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Configuration {
    pub indexer: IndexerConfig,
    pub slideshow: SlideshowOptions,
}

impl Configuration {
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_yaml_str(&s)
    }

    pub fn from_yaml_str(s: &str) -> Result<Self> {
        // An empty document deserializes as null rather than an empty map.
        if s.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(s)?)
    }

    /// Validate runtime invariants that cannot be expressed via serde defaults alone.
    pub fn validated(self) -> Result<Self> {
        self.indexer.validate().context("invalid indexer settings")?;
        self.slideshow
            .validate()
            .context("invalid slideshow settings")?;
        Ok(self)
    }
}
