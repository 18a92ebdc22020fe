//! Pipeline orchestrator - runs one input file through every stage.
//!
//! parse -> build -> (rig) -> dispatch. Stages are synchronous; the batch runner
//! moves whole files onto blocking worker tasks.

use std::path::{Path, PathBuf};
use std::time::Instant;

use contracts::{
    BindingWarning, ChannelSet, ColumnRole, ExportFormat, MotionSample, NumericMode,
    OutputConfig, PipelineConfig,
};
use exporters::Dispatcher;
use ingestion::TabularParser;
use observability::{record_binding_warnings, record_output, record_stage_latency_ms, FileOutcome};
use timeline::{KeyedSamples, ModelBuilder, Timing};
use tracing::{debug, error, info, instrument, warn};

use crate::cli::{PipelineArgs, ProfileArg};
use crate::error::{CliError, Result};

/// Per-run options layered on top of the configuration file
#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    pub profile: ProfileArg,
    pub rig: bool,
    /// Directory that replaces every configured output path
    pub output_dir: Option<PathBuf>,
    /// Formats that replace the configured outputs
    pub formats: Vec<ExportFormat>,
}

/// What one file produced
#[derive(Debug, Clone, Default)]
pub struct FileReport {
    pub source: String,
    pub rows: usize,
    pub samples: usize,
    pub warnings: Vec<BindingWarning>,
    /// Outputs that received the samples
    pub delivered: Vec<String>,
}

impl FileReport {
    pub fn outcome(&self, elapsed_ms: f64) -> FileOutcome {
        FileOutcome {
            source: self.source.clone(),
            rows: self.rows,
            samples: self.samples,
            warning_kinds: self.warnings.iter().map(BindingWarning::kind).collect(),
            elapsed_ms,
            error: None,
        }
    }
}

/// Single-file pipeline
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    options: PipelineOptions,
}

impl Pipeline {
    pub fn new(config: PipelineConfig, options: PipelineOptions) -> Self {
        Self { config, options }
    }

    /// Read an input table according to the profile
    pub fn load(&self, path: &Path) -> Result<ChannelSet> {
        if !path.is_file() {
            return Err(CliError::input_not_found(path.display().to_string()));
        }
        let set = match self.options.profile {
            ProfileArg::Generic => TabularParser::new(self.config.parse.clone()).parse_path(path)?,
            // Positions are scaled once, by the model builder
            ProfileArg::Xyzrpy => ingestion::parse_xyzrpy_path(path, 1.0)?,
        };
        Ok(set)
    }

    /// Samples plus the keys their helper channels are looked up at
    pub fn build(&self, set: &ChannelSet) -> Result<KeyedSamples> {
        let builder = ModelBuilder::new(self.config.timeline.clone(), self.config.units.clone());
        Ok(builder.build_keyed(set, Timing::FrameRate(self.config.timeline.frame_rate))?)
    }

    /// Bind auxiliary columns to rotation axes and drive the samples from them
    ///
    /// Returns the inference warnings; they are also logged.
    #[instrument(name = "pipeline_rig", skip_all, fields(source = %set.source_name))]
    pub fn rig(&self, set: &ChannelSet, built: &mut KeyedSamples) -> Result<Vec<BindingWarning>> {
        let helpers = helper_names(set);
        let report = rigging::infer(&helpers, &self.config.keywords);
        for warning in &report.warnings {
            warn!(source = %set.source_name, kind = warning.kind(), "{}", warning);
        }
        record_binding_warnings(&report.warnings);

        if report.sources.missing().len() == 3 {
            info!(helpers = helpers.len(), "no helper drives a rotation axis");
            return Ok(report.warnings);
        }

        let curves = rigging::reconstruct(
            &built.samples,
            &built.keys,
            &report.sources,
            set,
            self.config.units.angles,
        )?;
        curves.apply(&mut built.samples)?;
        info!(
            axes = ?curves.driven_axes(),
            helpers = helpers.len(),
            "rotations reconstructed"
        );
        Ok(report.warnings)
    }

    /// Output routes for one input, after CLI overrides
    pub fn outputs_for(&self, input: &Path) -> Result<Vec<OutputConfig>> {
        let mut outputs = if self.options.formats.is_empty() {
            self.config.outputs.clone()
        } else {
            let dir = self
                .options
                .output_dir
                .clone()
                .or_else(|| input.parent().map(Path::to_path_buf))
                .filter(|dir| !dir.as_os_str().is_empty())
                .unwrap_or_else(|| PathBuf::from("."));
            self.options
                .formats
                .iter()
                .map(|format| OutputConfig {
                    name: format.label().to_string(),
                    format: *format,
                    path: Some(dir.clone()),
                    object_name: None,
                })
                .collect()
        };

        if let Some(dir) = &self.options.output_dir {
            std::fs::create_dir_all(dir)?;
            for output in &mut outputs {
                output.path = Some(dir.clone());
            }
        }
        Ok(outputs)
    }

    /// Deliver samples to every output; any failed output fails the file
    pub fn export(&self, input: &Path, samples: &[MotionSample]) -> Result<Vec<String>> {
        let outputs = self.outputs_for(input)?;
        if outputs.is_empty() {
            warn!(source = %input.display(), "No outputs configured - samples will be dropped");
            return Ok(Vec::new());
        }

        let stem = file_stem(input);
        let mut dispatcher = Dispatcher::from_outputs(&outputs, &stem)?;
        let report = dispatcher.dispatch(samples);
        dispatcher.shutdown();

        for name in &report.delivered {
            record_output(name, true);
        }
        for (name, e) in &report.failed {
            record_output(name, false);
            error!(sink = %name, error = %e, "output failed");
        }

        if report.is_success() {
            Ok(report.delivered)
        } else {
            Err(CliError::OutputsFailed {
                source_name: stem,
                failed: report.failed.len(),
                total: outputs.len(),
            })
        }
    }

    /// Run every stage on one file
    #[instrument(name = "pipeline_file", skip(self), fields(path = %path.display()))]
    pub fn run_file(&self, path: &Path) -> Result<FileReport> {
        let started = Instant::now();
        let set = self.load(path)?;
        record_stage_latency_ms("parse", elapsed_ms(started));

        let started = Instant::now();
        let mut built = self.build(&set)?;
        record_stage_latency_ms("build", elapsed_ms(started));

        let warnings = if self.options.rig {
            let started = Instant::now();
            let warnings = self.rig(&set, &mut built)?;
            record_stage_latency_ms("rig", elapsed_ms(started));
            warnings
        } else {
            Vec::new()
        };

        let samples = built.samples;
        let started = Instant::now();
        let delivered = self.export(path, &samples)?;
        record_stage_latency_ms("export", elapsed_ms(started));

        debug!(rows = set.row_count, samples = samples.len(), "file complete");
        Ok(FileReport {
            source: set.source_name.clone(),
            rows: set.row_count,
            samples: samples.len(),
            warnings,
            delivered,
        })
    }
}

/// Names of the auxiliary columns of a set, the helper candidates
pub fn helper_names(set: &ChannelSet) -> Vec<String> {
    set.iter()
        .filter(|c| c.role == ColumnRole::Auxiliary)
        .map(|c| c.name.clone())
        .collect()
}

/// File name without extension, used to name outputs
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "motion".to_string())
}

/// Load the configuration file, or defaults when none is given
pub fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    match path {
        Some(path) => {
            if !path.exists() {
                return Err(CliError::config_not_found(path.display().to_string()));
            }
            info!(config = %path.display(), "Loading configuration");
            Ok(config_loader::ConfigLoader::load_from_path(path)?)
        }
        None => {
            debug!("No configuration file, using defaults");
            Ok(PipelineConfig::default())
        }
    }
}

/// Configuration plus CLI overrides, validated
pub fn resolve_config(args: &PipelineArgs) -> Result<PipelineConfig> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(rate) = args.frame_rate {
        info!(frame_rate = rate, "Overriding frame rate from CLI");
        config.timeline.frame_rate = rate;
    }
    if let Some(policy) = args.policy {
        config.timeline.resample_policy = policy.into();
    }
    if args.tolerant {
        config.parse.numeric_mode = NumericMode::Tolerant;
    }
    config_loader::ConfigLoader::validate(&config)?;
    Ok(config)
}

impl PipelineOptions {
    pub fn from_args(args: &PipelineArgs, profile: ProfileArg, rig: bool) -> Self {
        Self {
            profile,
            rig,
            output_dir: args.output_dir.clone(),
            formats: args.formats.iter().map(|f| (*f).into()).collect(),
        }
    }
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}
