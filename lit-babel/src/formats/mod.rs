//! Format implementations
//!
//! This module contains all format implementations that convert between the lit document
//! tree and its text representations.

pub mod common;
pub mod csv;
pub mod debug;
pub mod html;
pub mod lit;
pub mod tex;

pub use self::csv::CsvFormat;
pub use debug::DebugFormat;
pub use html::{default_css, HtmlFormat, HtmlOptions};
pub use lit::LitFormat;
pub use tex::TexFormat;
