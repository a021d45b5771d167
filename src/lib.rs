//! Streaming token pattern matching.
//!
//! A pattern such as `word (symbol word)+ $` is compiled once into an
//! immutable graph and then driven token by token through a
//! [`StreamMatcher`], which tracks every overlapping attempt at once
//! without buffering or backtracking.

pub mod errors;
pub mod matcher;
pub mod options;
pub mod pattern;
pub mod token;

pub use errors::{Error, Result};
pub use matcher::{MatchLocation, StreamMatcher, scan_sentences};
pub use options::{CompileFlags, OptionsError, PatternOptions, PatternOptionsBuilder};
pub use pattern::{CompiledPattern, PatternError, PatternResult, compile, compile_with_options};
pub use token::{PropertyValue, Token, TokenType};
