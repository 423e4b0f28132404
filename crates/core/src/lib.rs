//! vfbeta core: find multi-master Glyphs sources and turn each into a
//! variable font beta directory.
//!
//! The batch runs in four stages: [`scan`] finds eligible sources,
//! [`staging`] copies them to a scratch directory, [`family`] converts each
//! staged copy, and [`pipeline`] drives the whole run and collects failures.

pub mod compiler;
pub mod config;
pub mod family;
pub mod io;
pub mod pipeline;
pub mod scan;
pub mod staging;

pub use config::Workspace;
pub use family::{FamilyError, FamilyOutput, Step, convert_family};
pub use pipeline::{BatchSummary, FailedFamily, FailureReport, run_batch};
pub use scan::find_variable_sources;
pub use staging::stage_sources;

pub use font_metadata::Category;
pub use glyphs_source::{FontSourceRecord, GlyphsSource};
