//! Sink implementations

mod file;
mod log;

pub use file::FileSink;
pub use log::LogSink;
