//! Converter options.

use std::collections::BTreeMap;
use std::path::PathBuf;

use wl_config::{ChromeConfig, Config};

/// Settings shared by every render of a [`Converter`](crate::Converter).
#[derive(Clone, Debug)]
pub struct ConverterOptions {
    /// Produce a full page from [`Converter::convert`](crate::Converter::convert).
    pub standalone: bool,
    /// Directory inline SVG images and embedded stylesheets are read from.
    pub base_dir: PathBuf,
    /// Global default attributes, consulted after document attributes.
    pub attributes: BTreeMap<String, String>,
    /// Header navigation and footer overrides.
    pub chrome: ChromeConfig,
}

impl Default for ConverterOptions {
    fn default() -> Self {
        Self {
            standalone: true,
            base_dir: PathBuf::from("."),
            attributes: BTreeMap::new(),
            chrome: ChromeConfig::default(),
        }
    }
}

impl ConverterOptions {
    /// Map a loaded `wl.toml` onto converter options.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            standalone: config.output_resolved.standalone,
            base_dir: config.output_resolved.base_dir.clone(),
            attributes: config.attributes.clone(),
            chrome: config.chrome.clone(),
        }
    }

    #[must_use]
    pub fn with_standalone(mut self, standalone: bool) -> Self {
        self.standalone = standalone;
        self
    }

    #[must_use]
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    /// Set a global default attribute.
    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wl.toml");
        std::fs::write(
            &path,
            r#"
[output]
standalone = false
base_dir = "assets"

[attributes]
icons = "font"
"#,
        )
        .unwrap();
        let config = Config::load(Some(&path), None).unwrap();

        let options = ConverterOptions::from_config(&config);
        assert!(!options.standalone);
        assert_eq!(options.base_dir, dir.path().join("assets"));
        assert_eq!(options.attributes.get("icons").map(String::as_str), Some("font"));
    }
}
