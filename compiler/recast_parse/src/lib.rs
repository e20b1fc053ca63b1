//! Parser for the recast source language.
//!
//! The language is a C#-like subset: methods and top-level statements, local
//! declarations, `if`/`while`/`for`/`foreach`, lambdas, member access with
//! `?.`, invocations with `ref`/`out` arguments and element access.
//!
//! ```text
//! let tree = recast_parse::parse(source, SharedInterner::new())?;
//! ```

mod error;
pub mod lexer;
mod parser;

pub use error::ParseError;
pub use parser::parse;
