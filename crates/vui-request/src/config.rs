use serde::{Deserialize, Serialize};

/// vui-request configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VuiConfig {
    /// Log level
    pub log_level: String,

    /// Locale assumed for payloads that do not carry one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_locale: Option<String>,

    /// Built-in parsers to register
    pub parsers: ParsersConfig,
}

impl Default for VuiConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            default_locale: None,
            parsers: ParsersConfig::default(),
        }
    }
}

impl VuiConfig {
    /// Load from configuration file, TOML for `.toml` files and JSON otherwise
    pub fn load_from_file(path: &std::path::Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file: {}", e))?;

        if path.extension().is_some_and(|ext| ext == "toml") {
            toml::from_str(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse config file: {}", e))
        } else {
            serde_json::from_str(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse config file: {}", e))
        }
    }

    /// Render as TOML
    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))
    }
}

/// Built-in parser configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsersConfig {
    /// Accept payloads already in canonical JSON shape
    pub canonical: bool,

    /// Accept bare utterance text
    pub plain_text: bool,
}

impl Default for ParsersConfig {
    fn default() -> Self {
        Self {
            canonical: true,
            plain_text: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_file(name: &str, content: &str) -> PathBuf {
        let path =
            std::env::temp_dir().join(format!("vui-request-{}-{}", std::process::id(), name));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_json_with_defaults() {
        let path = temp_file("config.json", r#"{"default_locale": "en-US"}"#);
        let config = VuiConfig::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.default_locale.as_deref(), Some("en-US"));
        assert_eq!(config.log_level, "info");
        assert_eq!(config.parsers, ParsersConfig::default());
    }

    #[test]
    fn test_load_toml() {
        let path = temp_file(
            "config.toml",
            "log_level = \"debug\"\n\n[parsers]\nplain_text = false\n",
        );
        let config = VuiConfig::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.log_level, "debug");
        assert!(config.parsers.canonical);
        assert!(!config.parsers.plain_text);
    }

    #[test]
    fn test_load_errors() {
        let missing = std::env::temp_dir().join("vui-request-does-not-exist.json");
        assert!(VuiConfig::load_from_file(&missing).is_err());

        let path = temp_file("broken.json", "{ not json");
        let result = VuiConfig::load_from_file(&path);
        std::fs::remove_file(&path).unwrap();
        assert!(result.is_err());
    }

    #[test]
    fn test_toml_output_loads_back() {
        let config = VuiConfig {
            default_locale: Some("de-DE".to_string()),
            ..Default::default()
        };
        let rendered = config.to_toml_string().unwrap();
        assert!(rendered.contains("default_locale = \"de-DE\""));
        assert_eq!(toml::from_str::<VuiConfig>(&rendered).unwrap(), config);
    }
}
