//! Configuration utilities.
//!
//! The toolbelt runs with no configuration at all: every field defaults to
//! the constant the repair scripts were written against. A `qntmex.toml`
//! file in the project root, or one passed explicitly, overrides individual
//! fields.

use crate::error::ConfigError;
use crate::utils::{LogLevel, Version};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// File name looked up in the project root when no config path is given.
pub const DEFAULT_CONFIG_FILE: &str = "qntmex.toml";

/// JVM arguments written when a properties file has none.
pub const DEFAULT_JVM_ARGS: &str = "-Xmx4096m -XX:+HeapDumpOnOutOfMemoryError -Dfile.encoding=UTF-8";

/// Tool configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Name of the wallet project directory under the root.
    pub project_dir: String,

    /// Gradle version the version fixer pins wrappers to.
    pub pinned_gradle: Version,

    /// Gradle version the checker recommends for React Native.
    pub recommended_gradle: Version,

    /// Wrapper versions the cache cleaner accepts.
    pub compatible_gradle: Vec<Version>,

    /// Wrapper distribution directories removed by the cache cleaner.
    pub incompatible_dists: Vec<String>,

    /// JVM argument token that Java 17 rejects.
    pub banned_jvm_arg: String,

    /// JVM arguments added when none are configured.
    pub default_jvm_args: String,

    /// Minimum acceptable wrapper `networkTimeout`, in milliseconds.
    pub min_network_timeout_ms: u64,

    /// Minimum acceptable `compileSdkVersion`.
    pub min_compile_sdk: u32,

    /// Default log level for diagnostics on stderr.
    pub log_level: LogLevel,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            project_dir: "qntmex-wallet".to_string(),
            pinned_gradle: Version::new(7, 6),
            recommended_gradle: Version::new(8, 3),
            compatible_gradle: vec![Version::new(7, 5).with_patch(1), Version::new(7, 6)],
            incompatible_dists: vec!["gradle-8.3-all".to_string()],
            banned_jvm_arg: "MaxPermSize".to_string(),
            default_jvm_args: DEFAULT_JVM_ARGS.to_string(),
            min_network_timeout_ms: 60_000,
            min_compile_sdk: 33,
            log_level: LogLevel::Warning,
        }
    }
}

impl ToolConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load a configuration file.
    ///
    /// # Arguments
    ///
    /// * `path` - The file to read.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    /// Resolve the configuration for a project root.
    ///
    /// An explicit path must exist. Without one, `qntmex.toml` in the root is
    /// used when present and the defaults otherwise.
    pub fn resolve(root: &Path, explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let candidate = root.join(DEFAULT_CONFIG_FILE);
                if candidate.is_file() {
                    log::debug!("Loading config from {}", candidate.display());
                    Self::load(&candidate)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Whether a wrapper version is one the cache cleaner accepts.
    pub fn is_compatible(&self, version: &Version) -> bool {
        self.compatible_gradle.contains(version)
    }
}

impl fmt::Display for ToolConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match toml::to_string(self) {
            Ok(text) => write!(f, "{}", text),
            Err(_) => write!(f, "{:?}", self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_repair_constants() {
        let config = ToolConfig::default();
        assert_eq!(config.pinned_gradle.to_string(), "7.6");
        assert_eq!(config.recommended_gradle.to_string(), "8.3");
        assert!(config.is_compatible(&"7.5.1".parse().unwrap()));
        assert!(config.is_compatible(&"7.6".parse().unwrap()));
        assert!(!config.is_compatible(&"8.3".parse().unwrap()));
        assert_eq!(config.min_network_timeout_ms, 60_000);
        assert_eq!(config.min_compile_sdk, 33);
    }

    #[test]
    fn test_partial_toml_overrides_only_named_fields() {
        let config = ToolConfig::from_toml(
            r#"
            pinned_gradle = "7.5.1"
            log_level = "debug"
            "#,
        )
        .unwrap();
        assert_eq!(config.pinned_gradle, Version::new(7, 5).with_patch(1));
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.project_dir, "qntmex-wallet");
    }

    #[test]
    fn test_invalid_version_is_rejected() {
        let err = ToolConfig::from_toml("pinned_gradle = \"latest\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_resolve_prefers_root_file() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            ToolConfig::resolve(dir.path(), None).unwrap(),
            ToolConfig::default()
        );

        std::fs::write(dir.path().join(DEFAULT_CONFIG_FILE), "min_compile_sdk = 34\n").unwrap();
        let config = ToolConfig::resolve(dir.path(), None).unwrap();
        assert_eq!(config.min_compile_sdk, 34);
    }

    #[test]
    fn test_resolve_explicit_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(matches!(
            ToolConfig::resolve(dir.path(), Some(&missing)),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn test_display_is_toml() {
        let text = ToolConfig::default().to_string();
        assert!(text.contains("pinned_gradle = \"7.6\""));
    }
}
