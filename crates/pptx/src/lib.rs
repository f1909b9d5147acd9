//! PresentationML (.pptx) package builder.
//!
//! Turns an ordered list of slide texts into a minimal presentation package
//! with one text shape per slide.

pub mod builder;

pub use builder::{build_presentation, PresentationBuilder};
