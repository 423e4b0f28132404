//! vfbeta command line interface.

pub mod cli;

pub use vfbeta_core::{BatchSummary, Workspace, run_batch};
