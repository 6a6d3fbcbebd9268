//! Command implementations for splice-cli

pub mod apply;
pub mod check;
pub mod restore;
pub mod run;

pub use apply::run_apply;
pub use check::run_check;
pub use restore::run_restore;
pub use run::run_recipe;
