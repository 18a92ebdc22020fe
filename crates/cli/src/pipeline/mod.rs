//! Pipeline orchestration module.

mod batch;
mod orchestrator;

pub use batch::{collect_inputs, run_batch};
pub use orchestrator::{
    file_stem, helper_names, load_config, resolve_config, Pipeline, PipelineOptions,
};
