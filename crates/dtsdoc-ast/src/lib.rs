//! TypeScript declaration (`.d.ts`) model and printer for dtsdoc.
//!
//! The synthesizer builds [`DtsItem`] trees; [`print_items`] renders them to
//! source text.

mod ast;
mod config;
mod printer;

pub use ast::*;
pub use config::PrintConfig;
pub use printer::{is_identifier, print_item, print_items, quote};
