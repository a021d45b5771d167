use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of a token produced by segmentation.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TokenType {
    /// The tokenizer could not classify the token.
    #[default]
    Unknown = 0,
    Word = 1,
    /// One or more symbol characters.
    Symbol = 2,
    Whitespace = 3,
    /// URLs, e-mail addresses, phone numbers and similar forms.
    Special = 4,
}

impl TokenType {
    pub const ALL: [TokenType; 5] = [
        TokenType::Unknown,
        TokenType::Word,
        TokenType::Symbol,
        TokenType::Whitespace,
        TokenType::Special,
    ];

    /// Resolve a pattern keyword. `any` is not a type and resolves to `None`.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "word" => Some(Self::Word),
            "symbol" => Some(Self::Symbol),
            "ws" | "whitespace" => Some(Self::Whitespace),
            "special" => Some(Self::Special),
            "unkn" | "unknown" => Some(Self::Unknown),
            _ => None,
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Word => "word",
            Self::Symbol => "symbol",
            Self::Whitespace => "whitespace",
            Self::Special => "special",
        }
    }

    pub fn is_whitespace(&self) -> bool {
        matches!(self, Self::Whitespace)
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}
