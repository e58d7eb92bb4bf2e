//! Analysis configuration, read from TOML.
//!
//! ```toml
//! mode = "batch"
//! language_version = "17"
//! classpath = ["lib/guava.jar", "target/classes"]
//! ```

use std::path::{Path, PathBuf};

use jfront_syntax::OracleConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Highest language level the oracle is driven with.
pub const MAX_SUPPORTED_LANGUAGE_VERSION: u32 = 21;

/// How units are handed to the oracle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParseMode {
    /// All units in one oracle invocation, falling back to [`ParseMode::PerUnit`]
    /// when the batch does not cover every unit.
    #[serde(rename = "batch")]
    Batch,
    #[default]
    #[serde(rename = "per-unit")]
    PerUnit,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid configuration: {0}")]
    Toml(#[from] toml::de::Error),
    #[error(
        "Unsupported language version '{0}', expected a number between 1 and {max}",
        max = MAX_SUPPORTED_LANGUAGE_VERSION
    )]
    UnsupportedLanguageVersion(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub mode: ParseMode,
    /// Missing or empty means [`MAX_SUPPORTED_LANGUAGE_VERSION`].
    #[serde(default)]
    pub language_version: Option<String>,
    #[serde(default)]
    pub classpath: Vec<PathBuf>,
}

impl AnalysisConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| {
            tracing::error!("Failed to parse analysis configuration: {}", e);
            e
        })?;
        config.effective_language_version()?;
        Ok(config)
    }

    /// Accepts `"17"` as well as the legacy `"1.8"` spelling.
    pub fn effective_language_version(&self) -> Result<u32, ConfigError> {
        let raw = match self.language_version.as_deref().map(str::trim) {
            None | Some("") => return Ok(MAX_SUPPORTED_LANGUAGE_VERSION),
            Some(raw) => raw,
        };
        let unsupported = || ConfigError::UnsupportedLanguageVersion(raw.to_owned());
        let number = raw.strip_prefix("1.").unwrap_or(raw);
        let version: u32 = number.parse().map_err(|_| unsupported())?;
        if (1..=MAX_SUPPORTED_LANGUAGE_VERSION).contains(&version) {
            Ok(version)
        } else {
            Err(unsupported())
        }
    }

    pub fn oracle_config(&self) -> Result<OracleConfig, ConfigError> {
        Ok(OracleConfig {
            classpath: self.classpath.clone(),
            language_version: self.effective_language_version()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AnalysisConfig::from_toml("").unwrap();
        assert_eq!(config.mode, ParseMode::PerUnit);
        assert!(config.classpath.is_empty());
        assert_eq!(
            config.effective_language_version().unwrap(),
            MAX_SUPPORTED_LANGUAGE_VERSION
        );
    }

    #[test]
    fn test_full_config() {
        let config = AnalysisConfig::from_toml(
            r#"
            mode = "batch"
            language_version = "17"
            classpath = ["lib/a.jar", "target/classes"]
            "#,
        )
        .unwrap();
        assert_eq!(config.mode, ParseMode::Batch);
        let oracle = config.oracle_config().unwrap();
        assert_eq!(oracle.language_version, 17);
        assert_eq!(
            oracle.classpath,
            vec![PathBuf::from("lib/a.jar"), PathBuf::from("target/classes")]
        );
    }

    #[test]
    fn test_language_versions() {
        let version = |v: &str| AnalysisConfig {
            language_version: Some(v.to_owned()),
            ..AnalysisConfig::default()
        }
        .effective_language_version();
        assert_eq!(version("").unwrap(), MAX_SUPPORTED_LANGUAGE_VERSION);
        assert_eq!(version("1.8").unwrap(), 8);
        assert_eq!(version(" 11 ").unwrap(), 11);
        assert!(matches!(
            version("22"),
            Err(ConfigError::UnsupportedLanguageVersion(v)) if v == "22"
        ));
        assert!(version("0").is_err());
        assert!(version("seventeen").is_err());
    }

    #[test]
    fn test_rejects_unknown_mode_and_fields() {
        assert!(matches!(
            AnalysisConfig::from_toml(r#"mode = "parallel""#),
            Err(ConfigError::Toml(_))
        ));
        assert!(matches!(
            AnalysisConfig::from_toml("threads = 4"),
            Err(ConfigError::Toml(_))
        ));
        assert!(matches!(
            AnalysisConfig::from_toml(r#"language_version = "99""#),
            Err(ConfigError::UnsupportedLanguageVersion(_))
        ));
    }
}
