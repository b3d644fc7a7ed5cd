//! Front-end for a text-based page-description script.
//!
//! [`reader::StatementReader`] turns script source into typed, validated
//! statements. [`flow::TextFlow`] lays text out in a rectangle, and
//! [`convert::Converter`] feeds both to a document [`convert::Writer`].

pub use error::{ParseError, PdfResult};

pub mod color;
pub mod content;
pub mod convert;
pub mod data_structures;
pub mod error;
pub mod flow;
pub mod font;
pub mod lex;
pub mod objects;
pub mod page;
pub mod reader;
pub mod resources;
pub mod statement;
