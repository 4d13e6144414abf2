//! Parser and compiler for the sift expression language.
//!
//! The pipeline is source text -> tokens -> [`ast::Expr`] ->
//! [`Code`](sift_common::Code):
//!
//! - [`parse`] tokenizes and parses one expression
//! - [`compile`] lowers the tree to a nested instruction list
//! - [`dump`] renders a list for inspection
//!
//! Everything the subset excludes fails here, at construction time:
//! assignment and sequence expressions, and operators missing from the
//! operator tables. Compiled lists contain no jumps and cannot loop.

pub mod ast;
mod compile;
mod dump;
pub mod error;
pub mod lexer;
mod parser;

pub use compile::compile;
pub use dump::dump;
pub use error::{CompileError, ParseError};
pub use parser::parse;
