//! Types shared by every stage of the motion pipeline: channels, samples,
//! bindings, configuration, errors and the sink/scene traits.
//!
//! Nothing in here depends on another workspace crate.
//!
//! Channel timestamps are seconds and strictly increasing. A sample sequence
//! is ordered by `MotionSample::frame`.

mod binding;
mod channel;
mod column;
mod config;
mod edr;
mod error;
mod export;
mod sample;
mod scene;
mod sink;
mod vehicle;

pub use binding::*;
pub use channel::*;
pub use column::*;
pub use config::*;
pub use edr::*;
pub use error::*;
pub use export::*;
pub use sample::*;
pub use scene::KeyframeTarget;
pub use sink::MotionSink;
pub use vehicle::*;
