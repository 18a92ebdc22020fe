//! Loads a `PipelineConfig` from TOML or JSON and checks it before any file
//! is touched.
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let config = ConfigLoader::load_from_path(Path::new("pipeline.toml")).unwrap();
//! println!("Frame rate: {}", config.timeline.frame_rate);
//! ```

mod parser;
mod validator;

pub use contracts::PipelineConfig;
pub use parser::ConfigFormat;

use contracts::MotionError;
use std::path::Path;

/// Configuration loader
///
/// Provides static methods to load configuration from files or strings.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from file path
    ///
    /// Automatically detects format from file extension (.toml / .json).
    ///
    /// # Errors
    /// - File read failure
    /// - Unsupported format
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_path(path: &Path) -> Result<PipelineConfig, MotionError> {
        let format = Self::detect_format(path)?;
        let content = Self::read_file(path)?;
        Self::load_from_str(&content, format)
    }

    /// Load configuration from string
    ///
    /// # Errors
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_str(content: &str, format: ConfigFormat) -> Result<PipelineConfig, MotionError> {
        Self::parse_and_validate(content, format)
    }

    /// Validate an already constructed configuration
    pub fn validate(config: &PipelineConfig) -> Result<(), MotionError> {
        validator::validate(config)
    }

    /// Serialize PipelineConfig to TOML string
    pub fn to_toml(config: &PipelineConfig) -> Result<String, MotionError> {
        toml::to_string_pretty(config)
            .map_err(|e| MotionError::config_parse(format!("TOML serialize error: {e}")))
    }

    /// Serialize PipelineConfig to JSON string
    pub fn to_json(config: &PipelineConfig) -> Result<String, MotionError> {
        serde_json::to_string_pretty(config)
            .map_err(|e| MotionError::config_parse(format!("JSON serialize error: {e}")))
    }
}

impl ConfigLoader {
    /// Infer configuration format from file extension
    fn detect_format(path: &Path) -> Result<ConfigFormat, MotionError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            MotionError::config_parse("cannot determine file format from extension")
        })?;

        ConfigFormat::from_extension(ext)
            .ok_or_else(|| MotionError::config_parse(format!("unsupported config format: .{ext}")))
    }

    /// Read configuration file content
    fn read_file(path: &Path) -> Result<String, MotionError> {
        Ok(std::fs::read_to_string(path)?)
    }

    /// Parse and validate configuration content
    fn parse_and_validate(content: &str, format: ConfigFormat) -> Result<PipelineConfig, MotionError> {
        let config = parser::parse(content, format)?;
        validator::validate(&config)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{ExportFormat, ResamplePolicy};

    const SAMPLE_TOML: &str = r#"
[keywords]
x = ["camber", "cam"]
y = ["rotation", "pitch"]
z = ["steering", "yaw"]

[parse]
numeric_mode = "tolerant"

[timeline]
frame_rate = 60.0
resample_policy = "linear"

[units]
angles = "radians"

[[outputs]]
name = "motion"
format = "csv"
path = "out/motion.csv"

[[outputs]]
name = "hve"
format = "h3d"
path = "out/motion.h3d"
object_name = "Vehicle"
"#;

    #[test]
    fn test_load_from_str_toml() {
        let result = ConfigLoader::load_from_str(SAMPLE_TOML, ConfigFormat::Toml);
        assert!(result.is_ok(), "Failed: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.timeline.frame_rate, 60.0);
        assert_eq!(config.timeline.resample_policy, ResamplePolicy::Linear);
        assert_eq!(config.outputs.len(), 2);
        assert_eq!(config.outputs[1].format, ExportFormat::H3d);
    }

    #[test]
    fn test_empty_document_is_default() {
        let config = ConfigLoader::load_from_str("", ConfigFormat::Toml).unwrap();
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn test_round_trip_toml() {
        let config = ConfigLoader::load_from_str(SAMPLE_TOML, ConfigFormat::Toml).unwrap();
        let serialized = ConfigLoader::to_toml(&config).unwrap();
        let config2 = ConfigLoader::load_from_str(&serialized, ConfigFormat::Toml).unwrap();
        assert_eq!(config, config2);
    }

    #[test]
    fn test_round_trip_json() {
        let config = ConfigLoader::load_from_str(SAMPLE_TOML, ConfigFormat::Toml).unwrap();
        let json = ConfigLoader::to_json(&config).unwrap();
        let config2 = ConfigLoader::load_from_str(&json, ConfigFormat::Json).unwrap();
        assert_eq!(config, config2);
    }

    #[test]
    fn test_validation_runs_after_parse() {
        let content = r#"
[[outputs]]
name = "a"
format = "csv"

[[outputs]]
name = "a"
format = "racerender"
"#;
        let result = ConfigLoader::load_from_str(content, ConfigFormat::Toml);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("duplicate"));
    }

    #[test]
    fn test_load_from_path_unknown_extension() {
        let err = ConfigLoader::load_from_path(Path::new("pipeline.yaml")).unwrap_err();
        assert!(matches!(err, MotionError::ConfigParse { .. }));
    }
}
