//! SpreadsheetML (.xlsx) package builder.
//!
//! Writes rows of string cells into a single worksheet named `Sheet1`.

pub mod builder;

pub use builder::{build_spreadsheet, SpreadsheetBuilder, SHEET_NAME};
