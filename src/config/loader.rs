//! Settings loader.
//!
//! Settings come from a YAML file, then environment variables on top. A
//! `.env` file next to the settings file is loaded into the environment
//! first when present.

use crate::error::{ConfigError, KubeDiffError, Result};
use crate::manifest::DuplicatePolicy;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::settings::{OutputFormat, Settings};

/// Default settings file names to search for.
pub const DEFAULT_SETTINGS_FILES: &[&str] = &["kubediff.yaml", "kubediff.yml", ".kubediff.yaml"];

/// Loader for [`Settings`].
#[derive(Debug, Default)]
pub struct SettingsLoader {
    /// Directory searched for `.env`.
    base_path: Option<PathBuf>,
}

impl SettingsLoader {
    /// Creates a new settings loader.
    #[must_use]
    pub const fn new() -> Self {
        Self { base_path: None }
    }

    /// Sets the directory the `.env` file is looked up in.
    #[must_use]
    pub fn with_base_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.base_path = Some(path.into());
        self
    }

    /// Loads settings from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or cannot be parsed.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<Settings> {
        let path = path.as_ref();
        info!("Loading settings from: {}", path.display());

        if !path.exists() {
            return Err(KubeDiffError::Config(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            }));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            KubeDiffError::Config(ConfigError::ParseError {
                message: format!("Failed to read file: {e}"),
                location: Some(path.display().to_string()),
            })
        })?;

        self.parse_yaml(&content, Some(path))
    }

    /// Parses settings from a YAML string. Empty input yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid.
    pub fn parse_yaml(&self, content: &str, source: Option<&Path>) -> Result<Settings> {
        if content.trim().is_empty() {
            return Ok(Settings::default());
        }

        serde_yaml::from_str(content).map_err(|e| {
            KubeDiffError::Config(ConfigError::ParseError {
                message: format!("YAML parse error: {e}"),
                location: source.map(|p| p.display().to_string()),
            })
        })
    }

    /// Loads settings from a file with environment variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or an override
    /// has an invalid value.
    pub fn load_with_env(&self, path: impl AsRef<Path>) -> Result<Settings> {
        let mut settings = self.load_file(path)?;
        apply_env_overrides(&mut settings, |name| std::env::var(name).ok())?;
        Ok(settings)
    }

    /// Resolves the effective settings.
    ///
    /// An explicit path must exist. Otherwise the settings file is searched
    /// for from `start_dir` upwards and in the user config directory; if none
    /// is found the defaults are used. Environment overrides apply either
    /// way.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit file is missing, a file cannot be
    /// parsed, or an override has an invalid value.
    pub fn resolve(&self, explicit: Option<&Path>, start_dir: impl AsRef<Path>) -> Result<Settings> {
        if let Some(path) = explicit {
            return self.load_with_env(path);
        }

        match find_settings_file(start_dir) {
            Some(path) => self.load_with_env(path),
            None => {
                debug!("No settings file found, using defaults");
                let mut settings = Settings::default();
                apply_env_overrides(&mut settings, |name| std::env::var(name).ok())?;
                Ok(settings)
            }
        }
    }

    /// Loads the .env file if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the .env file exists but cannot be loaded.
    pub fn load_dotenv(&self) -> Result<()> {
        let env_path = self
            .base_path
            .as_ref()
            .map_or_else(|| PathBuf::from(".env"), |p| p.join(".env"));

        if env_path.exists() {
            info!("Loading environment from: {}", env_path.display());
            dotenvy::from_path(&env_path).map_err(|e| {
                KubeDiffError::Config(ConfigError::ParseError {
                    message: format!("Failed to load .env file: {e}"),
                    location: Some(env_path.display().to_string()),
                })
            })?;
        } else {
            debug!(".env file not found at: {}", env_path.display());
        }

        Ok(())
    }
}

/// Applies `KUBEDIFF_*` overrides read through `lookup`.
///
/// | Variable | Setting |
/// |---|---|
/// | `KUBEDIFF_OUTPUT` | `output` (`text`, `json`) |
/// | `KUBEDIFF_COLOR` | `color` (`true`, `false`, `1`, `0`) |
/// | `KUBEDIFF_DUPLICATES` | `duplicates` (`last-write-wins`, `reject`) |
/// | `KUBEDIFF_LOG` | `log_level` |
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] for a value that cannot be
/// interpreted.
pub fn apply_env_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
    if let Some(value) = lookup("KUBEDIFF_OUTPUT") {
        debug!("Overriding output from environment");
        settings.output = match value.to_ascii_lowercase().as_str() {
            "text" => OutputFormat::Text,
            "json" => OutputFormat::Json,
            _ => return Err(invalid("KUBEDIFF_OUTPUT", value)),
        };
    }

    if let Some(value) = lookup("KUBEDIFF_COLOR") {
        debug!("Overriding color from environment");
        settings.color = match value.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => true,
            "false" | "0" | "no" => false,
            _ => return Err(invalid("KUBEDIFF_COLOR", value)),
        };
    }

    if let Some(value) = lookup("KUBEDIFF_DUPLICATES") {
        debug!("Overriding duplicates from environment");
        settings.duplicates = match value.to_ascii_lowercase().as_str() {
            "last-write-wins" => DuplicatePolicy::LastWriteWins,
            "reject" => DuplicatePolicy::Reject,
            _ => return Err(invalid("KUBEDIFF_DUPLICATES", value)),
        };
    }

    if let Some(value) = lookup("KUBEDIFF_LOG") {
        debug!("Overriding log_level from environment");
        settings.log_level = value;
    }

    Ok(())
}

fn invalid(name: &str, value: String) -> KubeDiffError {
    KubeDiffError::Config(ConfigError::InvalidValue {
        name: name.to_string(),
        value,
    })
}

/// Finds the settings file in `start_dir` or one of its parents, then in
/// the user config directory (`<config dir>/kubediff/config.yaml`).
#[must_use]
pub fn find_settings_file(start_dir: impl AsRef<Path>) -> Option<PathBuf> {
    let mut current = start_dir.as_ref().to_path_buf();

    loop {
        for filename in DEFAULT_SETTINGS_FILES {
            let settings_path = current.join(filename);
            if settings_path.is_file() {
                info!("Found settings file: {}", settings_path.display());
                return Some(settings_path);
            }
        }

        if !current.pop() {
            break;
        }
    }

    dirs::config_dir()
        .map(|dir| dir.join("kubediff").join("config.yaml"))
        .filter(|path| path.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_parse_full_settings() {
        let yaml = r"
output: json
color: false
duplicates: reject
log_level: debug
";
        let settings = SettingsLoader::new().parse_yaml(yaml, None).unwrap();
        assert_eq!(settings.output, OutputFormat::Json);
        assert!(!settings.color);
        assert_eq!(settings.duplicates, DuplicatePolicy::Reject);
        assert_eq!(settings.log_level, "debug");
    }

    #[test]
    fn test_parse_empty_is_default() {
        let settings = SettingsLoader::new().parse_yaml("", None).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_parse_invalid() {
        let result = SettingsLoader::new().parse_yaml("output: xml\n", None);
        assert!(matches!(
            result,
            Err(KubeDiffError::Config(ConfigError::ParseError { .. }))
        ));
    }

    #[test]
    fn test_env_overrides() {
        let mut settings = Settings::default();
        apply_env_overrides(
            &mut settings,
            env(&[
                ("KUBEDIFF_OUTPUT", "JSON"),
                ("KUBEDIFF_COLOR", "0"),
                ("KUBEDIFF_DUPLICATES", "reject"),
                ("KUBEDIFF_LOG", "kubediff=trace"),
            ]),
        )
        .unwrap();

        assert_eq!(settings.output, OutputFormat::Json);
        assert!(!settings.color);
        assert_eq!(settings.duplicates, DuplicatePolicy::Reject);
        assert_eq!(settings.log_level, "kubediff=trace");
    }

    #[test]
    fn test_env_override_invalid_value() {
        let mut settings = Settings::default();
        let result = apply_env_overrides(&mut settings, env(&[("KUBEDIFF_COLOR", "maybe")]));
        assert!(matches!(
            result,
            Err(KubeDiffError::Config(ConfigError::InvalidValue { ref name, .. })) if name == "KUBEDIFF_COLOR"
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let temp = TempDir::new().unwrap();
        let result = SettingsLoader::new().load_file(temp.path().join("kubediff.yaml"));
        assert!(matches!(
            result,
            Err(KubeDiffError::Config(ConfigError::FileNotFound { .. }))
        ));
    }

    #[test]
    fn test_find_in_parent_directory() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("a/b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(temp.path().join("kubediff.yml"), "color: false\n").unwrap();

        let found = find_settings_file(&nested).unwrap();
        assert_eq!(found, temp.path().join("kubediff.yml"));

        let settings = SettingsLoader::new().load_file(&found).unwrap();
        assert!(!settings.color);
    }

    #[test]
    fn test_load_dotenv_missing_is_ok() {
        let temp = TempDir::new().unwrap();
        assert!(SettingsLoader::new().with_base_path(temp.path()).load_dotenv().is_ok());
    }
}
