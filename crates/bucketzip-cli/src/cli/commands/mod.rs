//! CLI command handlers, one file per command.

mod extract;
mod list;
mod run;

pub use extract::run_extract;
pub use list::run_list;
pub use run::run_harvest;
