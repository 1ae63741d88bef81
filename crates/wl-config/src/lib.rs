//! Configuration management for the Waterlens HTML converter.
//!
//! Parses `wl.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! Host overrides can be applied during load via [`Overrides`].
//!
//! ## Environment Variable Expansion
//!
//! Attribute values, `output.base_dir` and navigation hrefs support
//! environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! A bare `$VAR` is not expanded, so values such as `$5` are kept as written.
//!
//! ## Example
//!
//! ```toml
//! [output]
//! standalone = true
//! base_dir = "content"
//!
//! [attributes]
//! icons = "font"
//! author = "${USER:-anonymous}"
//!
//! [[chrome.navigation.default]]
//! title = "Home"
//! href = "/index.html"
//!
//! [chrome.footer]
//! default = "<footer><p>Built with Waterlens</p></footer>"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "wl.toml";

/// Key used in `[chrome]` tables when the document language has no entry.
pub const DEFAULT_LANG_KEY: &str = "default";

/// Host settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct Overrides {
    /// Override standalone (full page) output.
    pub standalone: Option<bool>,
    /// Override the directory SVG and stylesheet files are read from.
    pub base_dir: Option<PathBuf>,
    /// Attributes set on top of the `[attributes]` table.
    pub attributes: Vec<(String, String)>,
}

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output configuration (paths are relative strings from TOML).
    output: OutputConfigRaw,
    /// Global default document attributes.
    pub attributes: BTreeMap<String, String>,
    /// Page chrome overrides.
    pub chrome: ChromeConfig,

    /// Resolved output configuration (set after loading).
    #[serde(skip)]
    pub output_resolved: OutputConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw output configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct OutputConfigRaw {
    standalone: Option<bool>,
    base_dir: Option<String>,
}

/// Resolved output configuration with an absolute base directory.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Produce a full HTML page instead of an embeddable fragment.
    pub standalone: bool,
    /// Directory inline SVG images and stylesheets are read from.
    pub base_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            standalone: true,
            base_dir: PathBuf::from("."),
        }
    }
}

/// A navigation link shown in the page header.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NavLink {
    pub title: String,
    pub href: String,
}

impl NavLink {
    #[must_use]
    pub fn new(title: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            href: href.into(),
        }
    }
}

/// Page chrome keyed by document language.
///
/// Empty tables mean the converter's built-in chrome is used.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ChromeConfig {
    /// Header navigation links per language.
    pub navigation: BTreeMap<String, Vec<NavLink>>,
    /// Footer HTML per language.
    pub footer: BTreeMap<String, String>,
}

impl ChromeConfig {
    /// Navigation links for `lang`, falling back to the `default` entry.
    #[must_use]
    pub fn navigation_for(&self, lang: &str) -> Option<&[NavLink]> {
        self.navigation
            .get(lang)
            .or_else(|| self.navigation.get(DEFAULT_LANG_KEY))
            .map(Vec::as_slice)
    }

    /// Footer HTML for `lang`, falling back to the `default` entry.
    #[must_use]
    pub fn footer_for(&self, lang: &str) -> Option<&str> {
        self.footer
            .get(lang)
            .or_else(|| self.footer.get(DEFAULT_LANG_KEY))
            .map(String::as_str)
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`attributes.author`").
        field: String,
        /// Error message (e.g., "${`USER`} not set").
        message: String,
    },
}

/// Expand `${VAR}` references in place; `field` names the value in errors.
fn expand_field(value: &mut String, field: impl FnOnce() -> String) -> Result<(), ConfigError> {
    if !value.contains("${") {
        return Ok(());
    }
    let expanded = shellexpand::env_with_context(value.as_str(), |var| std::env::var(var).map(Some))
        .map_err(|e| ConfigError::EnvVar {
            field: field(),
            message: format!("${{{}}}: {}", e.var_name, e.cause),
        })?;
    *value = expanded.into_owned();
    Ok(())
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional host overrides.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `wl.toml` in current directory and parents.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// an environment variable is missing, or validation fails.
    pub fn load(
        config_path: Option<&Path>,
        overrides: Option<&Overrides>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(overrides) = overrides {
            config.apply_overrides(overrides);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply host overrides to the configuration.
    fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(standalone) = overrides.standalone {
            self.output_resolved.standalone = standalone;
        }
        if let Some(base_dir) = &overrides.base_dir {
            self.output_resolved.base_dir.clone_from(base_dir);
        }
        for (name, value) in &overrides.attributes {
            self.attributes.insert(name.clone(), value.clone());
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            output: OutputConfigRaw::default(),
            attributes: BTreeMap::new(),
            chrome: ChromeConfig::default(),
            output_resolved: OutputConfig {
                standalone: true,
                base_dir: base.to_path_buf(),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        tracing::debug!(
            path = %path.display(),
            attributes = config.attributes.len(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output.base_dir.as_deref() == Some("")
            || self.output_resolved.base_dir.as_os_str().is_empty()
        {
            return Err(ConfigError::Validation(
                "output.base_dir cannot be empty".to_owned(),
            ));
        }
        self.validate_attributes()?;
        self.validate_chrome()?;
        Ok(())
    }

    fn validate_attributes(&self) -> Result<(), ConfigError> {
        for name in self.attributes.keys() {
            require_non_empty(name, "attribute name")?;
            if name.chars().any(char::is_whitespace) {
                return Err(ConfigError::Validation(format!(
                    "attribute name '{name}' cannot contain whitespace"
                )));
            }
        }
        Ok(())
    }

    fn validate_chrome(&self) -> Result<(), ConfigError> {
        for (lang, links) in &self.chrome.navigation {
            for link in links {
                require_non_empty(&link.title, &format!("chrome.navigation.{lang}.title"))?;
                require_non_empty(&link.href, &format!("chrome.navigation.{lang}.href"))?;
            }
        }
        Ok(())
    }

    /// Expand environment variable references before paths are resolved.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(base_dir) = &mut self.output.base_dir {
            expand_field(base_dir, || "output.base_dir".to_owned())?;
        }
        for (name, value) in &mut self.attributes {
            expand_field(value, || format!("attributes.{name}"))?;
        }
        for (lang, links) in &mut self.chrome.navigation {
            for link in links {
                expand_field(&mut link.href, || format!("chrome.navigation.{lang}.href"))?;
            }
        }
        Ok(())
    }

    /// Resolve the output base directory relative to the config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.output_resolved = OutputConfig {
            standalone: self.output.standalone.unwrap_or(true),
            base_dir: config_dir.join(self.output.base_dir.as_deref().unwrap_or(".")),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert!(config.output_resolved.standalone);
        assert_eq!(config.output_resolved.base_dir, PathBuf::from("/test"));
        assert!(config.attributes.is_empty());
        assert!(config.chrome.navigation.is_empty());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.attributes.is_empty());
        assert_eq!(config.output.standalone, None);
    }

    #[test]
    fn test_parse_attributes() {
        let toml = r#"
[attributes]
icons = "font"
sectanchors = ""
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.attributes.get("icons").map(String::as_str), Some("font"));
        assert_eq!(config.attributes.get("sectanchors").map(String::as_str), Some(""));
    }

    #[test]
    fn test_parse_chrome_with_default_fallback() {
        let toml = r#"
[[chrome.navigation.default]]
title = "Home"
href = "/index.html"

[[chrome.navigation.zh-hans]]
title = "主页"
href = "/zh/index.html"

[chrome.footer]
default = "<footer>site</footer>"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let chrome = &config.chrome;
        assert_eq!(
            chrome.navigation_for("zh-hans"),
            Some([NavLink::new("主页", "/zh/index.html")].as_slice())
        );
        assert_eq!(
            chrome.navigation_for("fr"),
            Some([NavLink::new("Home", "/index.html")].as_slice())
        );
        assert_eq!(chrome.footer_for("zh-hans"), Some("<footer>site</footer>"));
    }

    #[test]
    fn test_chrome_without_entries() {
        let chrome = ChromeConfig::default();
        assert_eq!(chrome.navigation_for("en"), None);
        assert_eq!(chrome.footer_for("en"), None);
    }

    #[test]
    fn test_resolve_paths() {
        let toml = r#"
[output]
standalone = false
base_dir = "content"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));
        assert!(!config.output_resolved.standalone);
        assert_eq!(
            config.output_resolved.base_dir,
            PathBuf::from("/project/content")
        );
    }

    #[test]
    fn test_apply_overrides() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.attributes.insert("icons".to_owned(), "image".to_owned());
        config.apply_overrides(&Overrides {
            standalone: Some(false),
            base_dir: Some(PathBuf::from("/other")),
            attributes: vec![("icons".to_owned(), "font".to_owned())],
        });
        assert!(!config.output_resolved.standalone);
        assert_eq!(config.output_resolved.base_dir, PathBuf::from("/other"));
        assert_eq!(config.attributes.get("icons").map(String::as_str), Some("font"));
    }

    #[test]
    fn test_apply_empty_overrides() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.apply_overrides(&Overrides::default());
        assert!(config.output_resolved.standalone);
        assert_eq!(config.output_resolved.base_dir, PathBuf::from("/test"));
    }

    #[test]
    fn test_expand_env_vars_in_attributes() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("WL_TEST_AUTHOR", "Ada");
        }
        let toml = r#"
[attributes]
author = "${WL_TEST_AUTHOR}"
lang = "${WL_TEST_LANG_UNSET:-en}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();
        assert_eq!(config.attributes.get("author").map(String::as_str), Some("Ada"));
        assert_eq!(config.attributes.get("lang").map(String::as_str), Some("en"));
        unsafe {
            std::env::remove_var("WL_TEST_AUTHOR");
        }
    }

    #[test]
    fn test_expand_env_vars_missing_required_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("WL_TEST_MISSING");
        }
        let toml = r#"
[attributes]
author = "${WL_TEST_MISSING}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        let err = config.expand_env_vars().unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("attributes.author"));
    }

    #[test]
    fn test_expand_env_vars_in_paths() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("WL_TEST_SITE_ROOT", "/srv/site");
        }
        let toml = r#"
[output]
base_dir = "${WL_TEST_SITE_ROOT}/content"

[[chrome.navigation.default]]
title = "Home"
href = "${WL_TEST_HOME_UNSET:-/}index.html"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();
        config.resolve_paths(Path::new("/project"));
        assert_eq!(
            config.output_resolved.base_dir,
            PathBuf::from("/srv/site/content")
        );
        assert_eq!(
            config.chrome.navigation_for("en"),
            Some([NavLink::new("Home", "/index.html")].as_slice())
        );
        unsafe {
            std::env::remove_var("WL_TEST_SITE_ROOT");
        }
    }

    #[test]
    fn test_expand_env_vars_error_names_field_and_variable() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("WL_TEST_DOCS_HOST");
        }
        let toml = r#"
[[chrome.navigation.fr]]
title = "Accueil"
href = "https://${WL_TEST_DOCS_HOST}/"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        let msg = config.expand_env_vars().unwrap_err().to_string();
        assert!(msg.contains("chrome.navigation.fr.href"), "{msg}");
        assert!(msg.contains("WL_TEST_DOCS_HOST"), "{msg}");
    }

    #[test]
    fn test_bare_dollar_is_kept() {
        let toml = r#"
[attributes]
price = "costs $5"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();
        assert_eq!(config.attributes.get("price").map(String::as_str), Some("costs $5"));
    }

    /// Assert that validation fails with expected substrings in the error message.
    fn assert_validation_error(config: &Config, expected_substrings: &[&str]) {
        let err = config.validate().unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        let msg = err.to_string();
        for s in expected_substrings {
            assert!(msg.contains(s), "Expected error to contain '{s}', got: {msg}");
        }
    }

    #[test]
    fn test_validate_default_config_passes() {
        assert!(Config::default_with_base(Path::new("/test")).validate().is_ok());
    }

    #[test]
    fn test_validate_empty_base_dir() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.output.base_dir = Some(String::new());
        assert_validation_error(&config, &["base_dir", "empty"]);
    }

    #[test]
    fn test_validate_attribute_name_with_whitespace() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config
            .attributes
            .insert("table frame".to_owned(), "none".to_owned());
        assert_validation_error(&config, &["table frame", "whitespace"]);
    }

    #[test]
    fn test_validate_nav_link_without_href() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config
            .chrome
            .navigation
            .insert("en".to_owned(), vec![NavLink::new("Home", "")]);
        assert_validation_error(&config, &["chrome.navigation.en.href"]);
    }

    #[test]
    fn test_load_explicit_path_not_found() {
        let err = Config::load(Some(Path::new("/nonexistent/wl.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_from_file_resolves_relative_to_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wl.toml");
        std::fs::write(
            &path,
            r#"
[output]
base_dir = "assets"

[attributes]
icons = "font"
"#,
        )
        .unwrap();

        let config = Config::load(Some(&path), None).unwrap();
        assert_eq!(config.output_resolved.base_dir, dir.path().join("assets"));
        assert_eq!(config.config_path.as_deref(), Some(path.as_path()));
        assert_eq!(config.attributes.get("icons").map(String::as_str), Some("font"));
    }

    #[test]
    fn test_load_rejects_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wl.toml");
        std::fs::write(&path, "[output\nstandalone = ").unwrap();
        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
