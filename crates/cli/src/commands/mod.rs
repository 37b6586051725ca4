//! Command implementations.

mod probe;
mod run;
mod validate;

pub use probe::run_probe;
pub use run::run_dispatch;
pub use validate::run_validate;
