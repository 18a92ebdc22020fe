//! Configuration validation
//!
//! Rules:
//! - keywords non-blank and unique per axis
//! - frame_rate finite and > 0
//! - position_scale finite and non-zero
//! - delimiter a single ASCII character other than `"`
//! - explicit header names non-empty and unique
//! - output names non-empty and unique; h3d outputs carry an object_name

use std::collections::HashSet;

use contracts::{AxisRole, ExportFormat, HeaderMode, MotionError, PipelineConfig};

/// Validate PipelineConfig
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(config: &PipelineConfig) -> Result<(), MotionError> {
    validate_keywords(config)?;
    validate_parse(config)?;
    validate_timeline(config)?;
    validate_units(config)?;
    validate_outputs(config)?;
    Ok(())
}

/// Keywords must be non-blank and unique (case-insensitive) within an axis
fn validate_keywords(config: &PipelineConfig) -> Result<(), MotionError> {
    for axis in AxisRole::ALL {
        let field = format!("keywords.{}", axis.to_string().to_lowercase());
        let mut seen = HashSet::new();
        for keyword in config.keywords.keywords(axis) {
            if keyword.trim().is_empty() {
                return Err(MotionError::config_validation(
                    &field,
                    "keyword cannot be blank",
                ));
            }
            if !seen.insert(keyword.to_lowercase()) {
                return Err(MotionError::config_validation(
                    &field,
                    format!("duplicate keyword '{keyword}'"),
                ));
            }
        }
    }
    Ok(())
}

fn validate_parse(config: &PipelineConfig) -> Result<(), MotionError> {
    let delimiter = config.parse.delimiter;
    if !delimiter.is_ascii() || delimiter == '"' || delimiter == '\n' || delimiter == '\r' {
        return Err(MotionError::config_validation(
            "parse.delimiter",
            format!("delimiter must be a single ASCII character other than quote or newline, got {delimiter:?}"),
        ));
    }

    if let HeaderMode::Explicit(names) = &config.parse.header {
        if names.is_empty() {
            return Err(MotionError::config_validation(
                "parse.header",
                "explicit header must list at least one column",
            ));
        }
        let mut seen = HashSet::new();
        for (idx, name) in names.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(MotionError::config_validation(
                    format!("parse.header[{idx}]"),
                    "column name cannot be empty",
                ));
            }
            if !seen.insert(name.trim()) {
                return Err(MotionError::config_validation(
                    format!("parse.header[{idx}]"),
                    format!("duplicate column name '{name}'"),
                ));
            }
        }
    }
    Ok(())
}

fn validate_timeline(config: &PipelineConfig) -> Result<(), MotionError> {
    let rate = config.timeline.frame_rate;
    if !rate.is_finite() || rate <= 0.0 {
        return Err(MotionError::config_validation(
            "timeline.frame_rate",
            format!("frame_rate must be > 0, got {rate}"),
        ));
    }
    Ok(())
}

fn validate_units(config: &PipelineConfig) -> Result<(), MotionError> {
    let scale = config.units.position_scale;
    if !scale.is_finite() || scale == 0.0 {
        return Err(MotionError::config_validation(
            "units.position_scale",
            format!("position_scale must be finite and non-zero, got {scale}"),
        ));
    }
    Ok(())
}

/// Validate output routes
fn validate_outputs(config: &PipelineConfig) -> Result<(), MotionError> {
    let mut seen = HashSet::new();
    for (idx, output) in config.outputs.iter().enumerate() {
        if output.name.trim().is_empty() {
            return Err(MotionError::config_validation(
                format!("outputs[{idx}].name"),
                "output name cannot be empty",
            ));
        }
        if !seen.insert(output.name.as_str()) {
            return Err(MotionError::config_validation(
                format!("outputs[name={}]", output.name),
                "duplicate output name",
            ));
        }
        if output.format == ExportFormat::H3d
            && output
                .object_name
                .as_deref()
                .is_none_or(|name| name.trim().is_empty())
        {
            return Err(MotionError::config_validation(
                format!("outputs[{}].object_name", output.name),
                "h3d output requires object_name",
            ));
        }
    }
    Ok(())
}
