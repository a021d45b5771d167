pub mod ast;
mod compiled;
mod constraint;
mod error;
mod lexer;
mod parser;

pub use ast::{PatternAst, PatternNode, Quantifier};
pub use compiled::{
    CompiledPattern, MatcherNode, NodeId, PatternGraph, QuantifierSpan, compile,
    compile_pattern_ast, compile_with_options,
};
pub use constraint::{AtomMatcher, PropertyConstraint, ValueMatcher};
pub use error::{PatternError, PatternResult};
pub use parser::parse_pattern;
