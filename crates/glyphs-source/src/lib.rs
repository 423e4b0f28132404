//! Read, edit, and write Glyphs.app font sources (`.glyphs`).
//!
//! Only the handful of fields a build pipeline needs are typed; everything
//! else is carried through untouched so that a load/modify/save cycle
//! changes nothing but the edited values.

mod error;
mod plist;
mod source;

pub use error::{Error, Result, SyntaxError};
pub use plist::Plist;
pub use source::{FontSourceRecord, GlyphsSource};

/// File extension of Glyphs sources, without the dot.
pub const GLYPHS_EXTENSION: &str = "glyphs";
