//! MiniLight core - model file support.
//!
//! This crate provides:
//!
//! - **Tokenization**: [`TokenStream`], a whitespace/parenthesis-tolerant
//!   token iterator over model file text
//! - **Parsing**: [`ModelDescription`], the parsed form of a `.ml` model
//!   file, ready for the renderer to consume
//!
//! # Example
//!
//! ```ignore
//! use minilight_core::ModelDescription;
//!
//! let content = std::fs::read_to_string("cornellbox.ml")?;
//! let model = ModelDescription::parse(&content)?;
//! println!("{} triangles over {} iterations",
//!     model.triangles.len(), model.iterations);
//! ```

pub mod model;
pub mod tokens;

pub use model::{
    CameraDescription, ModelDescription, ParseError, ParseResult, TriangleDescription,
    MAX_TRIANGLES,
};
pub use tokens::TokenStream;
