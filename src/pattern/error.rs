use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PatternError {
    #[error("pattern '{pattern}' does not match anything")]
    EmptyPattern { pattern: String },
    #[error("group starting at index {start} in pattern '{pattern}' is empty")]
    EmptyGroup { pattern: String, start: usize },
    #[error("alternation starting at index {start} in pattern '{pattern}' has no alternatives")]
    EmptyAlternation { pattern: String, start: usize },
    #[error("'{open}' at index {start} in pattern '{pattern}' is never closed")]
    UnterminatedGroup {
        pattern: String,
        open: char,
        start: usize,
    },
    #[error("unbalanced '{found}' at index {index} in pattern '{pattern}'")]
    UnexpectedClosingDelimiter {
        pattern: String,
        found: char,
        index: usize,
    },
    #[error("expected '{expected}' but found '{found}' at index {index} in pattern '{pattern}'")]
    MismatchedDelimiter {
        pattern: String,
        expected: char,
        found: char,
        index: usize,
    },
    #[error("string literal starting at index {start} in pattern '{pattern}' is not terminated")]
    UnterminatedString { pattern: String, start: usize },
    #[error("unknown escape '\\{escape}' at index {index} in pattern '{pattern}'")]
    UnknownEscape {
        pattern: String,
        escape: char,
        index: usize,
    },
    #[error("escape character at index {index} in pattern '{pattern}' has nothing to escape")]
    LoneEscapeCharacter { pattern: String, index: usize },
    #[error("regex literal starting at index {start} in pattern '{pattern}' is not terminated")]
    UnterminatedRegex { pattern: String, start: usize },
    #[error("unknown regex flag '{flag}' at index {index} in pattern '{pattern}'")]
    UnknownRegexFlag {
        pattern: String,
        flag: char,
        index: usize,
    },
    #[error("regex /{regex}/ at index {index} in pattern '{pattern}' is invalid: {error}")]
    InvalidRegex {
        pattern: String,
        regex: String,
        index: usize,
        error: String,
    },
    #[error("expected a token type at index {index} in pattern '{pattern}', found '{found}'")]
    UnknownTokenType {
        pattern: String,
        found: String,
        index: usize,
    },
    #[error("property constraint at index {index} in pattern '{pattern}' has no name")]
    EmptyPropertyName { pattern: String, index: usize },
    #[error("property '{name}' at index {index} in pattern '{pattern}' is missing its value")]
    MissingPropertyValue {
        pattern: String,
        name: String,
        index: usize,
    },
    #[error("quantifier '{modifier}' at index {index} in pattern '{pattern}' has nothing to repeat")]
    DanglingQuantifier {
        pattern: String,
        modifier: char,
        index: usize,
    },
    #[error("repetition range at index {index} in pattern '{pattern}' is invalid: {reason}")]
    InvalidRepetitionRange {
        pattern: String,
        index: usize,
        reason: &'static str,
    },
    #[error("repetition range starting at index {start} in pattern '{pattern}' is not terminated")]
    UnterminatedRepetition { pattern: String, start: usize },
    #[error("negation at index {index} in pattern '{pattern}' is not followed by anything")]
    DanglingNegation { pattern: String, index: usize },
    #[error("element at index {index} in pattern '{pattern}' is nested too deeply")]
    NestingTooDeep { pattern: String, index: usize },
}

impl PatternError {
    /// Byte offset of the offending fragment within the pattern source.
    pub fn index(&self) -> usize {
        match self {
            PatternError::EmptyPattern { .. } => 0,
            PatternError::EmptyGroup { start, .. }
            | PatternError::EmptyAlternation { start, .. }
            | PatternError::UnterminatedGroup { start, .. }
            | PatternError::UnterminatedString { start, .. }
            | PatternError::UnterminatedRegex { start, .. }
            | PatternError::UnterminatedRepetition { start, .. } => *start,
            PatternError::UnexpectedClosingDelimiter { index, .. }
            | PatternError::MismatchedDelimiter { index, .. }
            | PatternError::UnknownEscape { index, .. }
            | PatternError::LoneEscapeCharacter { index, .. }
            | PatternError::UnknownRegexFlag { index, .. }
            | PatternError::InvalidRegex { index, .. }
            | PatternError::UnknownTokenType { index, .. }
            | PatternError::EmptyPropertyName { index, .. }
            | PatternError::MissingPropertyValue { index, .. }
            | PatternError::DanglingQuantifier { index, .. }
            | PatternError::InvalidRepetitionRange { index, .. }
            | PatternError::DanglingNegation { index, .. }
            | PatternError::NestingTooDeep { index, .. } => *index,
        }
    }
}

pub type PatternResult<T> = Result<T, PatternError>;
