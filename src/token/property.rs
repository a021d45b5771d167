use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

pub const NORMALIZED: &str = "normalized";
pub const LEMMA: &str = "lemma";
pub const POS: &str = "pos";
/// Refines `TokenType::Special`, e.g. `url` or `email`.
pub const EXTENDED_TYPE: &str = "extendedType";

/// Pseudo-property naming the literal text of a token.
pub const TEXT: &str = "text";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Flag(bool),
    Number(i64),
    Text(String),
}

impl PropertyValue {
    /// Textual form used when a pattern constraint is evaluated.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            PropertyValue::Text(s) => Cow::Borrowed(s.as_str()),
            PropertyValue::Number(n) => Cow::Owned(n.to_string()),
            PropertyValue::Flag(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
        }
    }

    /// Whether a bare `name` constraint (no value) accepts this value.
    pub fn is_set(&self) -> bool {
        !matches!(self, PropertyValue::Flag(false))
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Text(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Text(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Number(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Flag(value)
    }
}
