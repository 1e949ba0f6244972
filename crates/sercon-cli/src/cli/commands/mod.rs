//! CLI command handlers, one per file.

mod check;
mod completions;
mod ports;
mod validate;

pub use check::run_check;
pub use completions::run_completions;
pub use ports::run_ports;
pub use validate::run_validate;
