use crate::domain::Scheme;
use crate::error::{GitReleaseError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Complete configuration for git-release.
///
/// Loaded from `gitrelease.toml`; every field has a default so an empty
/// file (or no file at all) yields a working semver setup.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub version: VersionConfig,

    #[serde(default)]
    pub hotfix: HotfixConfig,
}

fn default_scheme() -> String {
    "semver".to_string()
}

fn default_tag_prefix() -> String {
    "v".to_string()
}

fn default_calver_format() -> String {
    "2006.01.02".to_string()
}

/// Version scheme settings.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct VersionConfig {
    /// "semver" or "calver"
    #[serde(default = "default_scheme")]
    pub scheme: String,

    /// Prepended to bare version strings to form tag names (e.g. "v",
    /// "api/v"). May be empty.
    #[serde(default = "default_tag_prefix")]
    pub tag_prefix: String,

    /// Period format for the calver scheme. Supports the tokens
    /// 2006/YYYY (year), 01/MM (month), 02/DD (day) and WW (ISO week).
    #[serde(default = "default_calver_format")]
    pub calver_format: String,

    /// Default prerelease overlay applied to computed versions.
    #[serde(default)]
    pub pre: String,

    /// Default build metadata overlay applied to computed versions.
    #[serde(default)]
    pub meta: String,
}

impl Default for VersionConfig {
    fn default() -> Self {
        VersionConfig {
            scheme: default_scheme(),
            tag_prefix: default_tag_prefix(),
            calver_format: default_calver_format(),
            pre: String::new(),
            meta: String::new(),
        }
    }
}

impl VersionConfig {
    /// The configured scheme as a typed value.
    pub fn scheme(&self) -> Result<Scheme> {
        self.scheme.parse()
    }
}

fn default_branch_prefix() -> String {
    "hotfix/".to_string()
}

fn default_suffix() -> String {
    "hotfix".to_string()
}

/// Hotfix track settings.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct HotfixConfig {
    /// Prepended verbatim to the base tag to form the branch name; any
    /// separator has to be part of the prefix itself.
    #[serde(default = "default_branch_prefix")]
    pub branch_prefix: String,

    /// Literal suffix between base tag and sequence (e.g. "hotfix",
    /// "patch").
    #[serde(default = "default_suffix")]
    pub suffix: String,
}

impl Default for HotfixConfig {
    fn default() -> Self {
        HotfixConfig {
            branch_prefix: default_branch_prefix(),
            suffix: default_suffix(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            version: VersionConfig::default(),
            hotfix: HotfixConfig::default(),
        }
    }
}

impl Config {
    /// Check cross-field constraints that serde defaults cannot enforce.
    pub fn validate(&self) -> Result<()> {
        let scheme = self.version.scheme()?;

        if scheme == Scheme::CalVer && self.version.calver_format.is_empty() {
            return Err(GitReleaseError::config(
                "version.calver_format is required when using the calver scheme",
            ));
        }

        if self.hotfix.suffix.is_empty() {
            return Err(GitReleaseError::config("hotfix.suffix must not be empty"));
        }

        Ok(())
    }
}

/// Load configuration from file or return defaults.
///
/// Resolution order:
/// 1. Custom path provided as parameter
/// 2. `gitrelease.toml` in the current directory
/// 3. `gitrelease.toml` in the user config directory
/// 4. Default configuration if no file is found
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new("./gitrelease.toml").exists() {
        fs::read_to_string("./gitrelease.toml")?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join("gitrelease.toml");
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    let config: Config = toml::from_str(&config_str)
        .map_err(|e| GitReleaseError::config(format!("invalid gitrelease.toml: {}", e)))?;

    config.validate()?;
    Ok(config)
}
