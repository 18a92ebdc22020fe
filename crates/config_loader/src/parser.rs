//! Configuration parsing
//!
//! TOML (primary) and JSON formats.

use contracts::{MotionError, PipelineConfig};

/// Configuration file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML (recommended)
    Toml,
    Json,
}

impl ConfigFormat {
    /// Infer format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Parse TOML configuration
pub fn parse_toml(content: &str) -> Result<PipelineConfig, MotionError> {
    toml::from_str(content).map_err(|e| MotionError::ConfigParse {
        message: format!("TOML parse error: {e}"),
        source: Some(Box::new(e)),
    })
}

/// Parse JSON configuration
pub fn parse_json(content: &str) -> Result<PipelineConfig, MotionError> {
    serde_json::from_str(content).map_err(|e| MotionError::ConfigParse {
        message: format!("JSON parse error: {e}"),
        source: Some(Box::new(e)),
    })
}

/// Parse configuration by format
pub fn parse(content: &str, format: ConfigFormat) -> Result<PipelineConfig, MotionError> {
    match format {
        ConfigFormat::Toml => parse_toml(content),
        ConfigFormat::Json => parse_json(content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{AxisRole, HeaderMode, NumericMode};

    #[test]
    fn test_parse_toml_keywords_replace_table() {
        let content = r#"
[keywords]
x = ["tilt"]
y = ["nod"]
z = ["turn", "steer"]
"#;
        let config = parse_toml(content).unwrap();
        assert_eq!(config.keywords.keywords(AxisRole::X), ["tilt"]);
        assert_eq!(config.keywords.keywords(AxisRole::Z), ["turn", "steer"]);
    }

    #[test]
    fn test_parse_toml_header_modes() {
        let config = parse_toml("[parse]\nheader = \"none\"\n").unwrap();
        assert_eq!(config.parse.header, HeaderMode::None);

        let config = parse_toml("[parse]\nheader = { explicit = [\"t\", \"x\"] }\n").unwrap();
        assert_eq!(
            config.parse.header,
            HeaderMode::Explicit(vec!["t".into(), "x".into()])
        );
    }

    #[test]
    fn test_parse_json_minimal() {
        let content = r#"{
            "parse": { "delimiter": ";", "numeric_mode": "tolerant" },
            "outputs": [{ "name": "log", "format": "csv" }]
        }"#;
        let result = parse_json(content);
        assert!(result.is_ok(), "Failed: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.parse.delimiter, ';');
        assert_eq!(config.parse.numeric_mode, NumericMode::Tolerant);
    }

    #[test]
    fn test_parse_toml_syntax_error() {
        let content = "invalid toml [[[";
        let result = parse_toml(content);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, MotionError::ConfigParse { .. }));
    }

    #[test]
    fn test_parse_unknown_policy_rejected() {
        let result = parse_toml("[timeline]\nresample_policy = \"cubic\"\n");
        assert!(matches!(result, Err(MotionError::ConfigParse { .. })));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ConfigFormat::from_extension("toml"), Some(ConfigFormat::Toml));
        assert_eq!(ConfigFormat::from_extension("TOML"), Some(ConfigFormat::Toml));
        assert_eq!(ConfigFormat::from_extension("json"), Some(ConfigFormat::Json));
        assert_eq!(ConfigFormat::from_extension("yaml"), None);
    }
}
