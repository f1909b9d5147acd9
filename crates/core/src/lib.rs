//! Core domain types, error taxonomy, column references, and command parsing
//! for generating Office Open XML packages.

pub mod column;
pub mod command;
pub mod error;
pub mod types;

pub use column::{cell_reference, column_name};
pub use command::{Command, CommandParser};
pub use error::{Error, Result};
pub use types::{decode_utf8, DocumentKind, Row, Slide};
