//! Command implementations.

mod batch;
mod convert;
mod edr;
mod infer;
mod info;
mod validate;

pub use batch::run_batch_command;
pub use convert::run_convert;
pub use edr::run_edr;
pub use infer::run_infer;
pub use info::run_info;
pub use validate::run_validate;
