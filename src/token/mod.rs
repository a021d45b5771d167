mod kind;
pub mod property;

pub use kind::TokenType;
pub use property::PropertyValue;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// One classified unit of text. The matcher only ever reads tokens.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenType,
    pub text: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub properties: HashMap<String, PropertyValue>,
}

impl Token {
    pub fn new<S: Into<String>>(kind: TokenType, text: S) -> Self {
        Self {
            kind,
            text: text.into(),
            properties: HashMap::new(),
        }
    }

    pub fn of_type(kind: TokenType) -> Self {
        Self::new(kind, String::new())
    }

    pub fn with_text<S: Into<String>>(mut self, text: S) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_property<K, V>(mut self, name: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<PropertyValue>,
    {
        self.set(name, value);
        self
    }

    pub fn set<K, V>(&mut self, name: K, value: V)
    where
        K: Into<String>,
        V: Into<PropertyValue>,
    {
        self.properties.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    /// Text of a named property, with `text` resolving to the token text.
    pub fn property_text(&self, name: &str) -> Option<std::borrow::Cow<'_, str>> {
        if name == property::TEXT {
            return Some(std::borrow::Cow::Borrowed(self.text.as_str()));
        }
        self.get(name).map(PropertyValue::as_text)
    }

    /// Concatenate the text of several tokens into one `Unknown` token.
    pub fn merge<'a, I>(tokens: I) -> Token
    where
        I: IntoIterator<Item = &'a Token>,
    {
        let text: String = tokens.into_iter().map(|t| t.text.as_str()).collect();
        Token::new(TokenType::Unknown, text)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:?}", self.kind, self.text)
    }
}

/// Value fed through matcher threads: a real token or one of the sentinels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input<'a> {
    Start,
    Token(&'a Token),
    End,
}

impl<'a> Input<'a> {
    pub fn token(&self) -> Option<&'a Token> {
        match *self {
            Input::Token(token) => Some(token),
            _ => None,
        }
    }

    pub fn sentinel(&self) -> Option<Sentinel> {
        match self {
            Input::Start => Some(Sentinel::Start),
            Input::End => Some(Sentinel::End),
            Input::Token(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sentinel {
    Start,
    End,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_text_resolves_pseudo_property() {
        let token = Token::new(TokenType::Word, "Cookies").with_property(property::NORMALIZED, "cookie");
        assert_eq!(token.property_text("text").as_deref(), Some("Cookies"));
        assert_eq!(token.property_text("normalized").as_deref(), Some("cookie"));
        assert_eq!(token.property_text("lemma"), None);
    }

    #[test]
    fn merge_concatenates_text() {
        let tokens = [
            Token::new(TokenType::Word, "e"),
            Token::new(TokenType::Symbol, "."),
            Token::new(TokenType::Word, "g").with_property(property::POS, "X"),
        ];
        let merged = Token::merge(&tokens);
        assert_eq!(merged.kind, TokenType::Unknown);
        assert_eq!(merged.text, "e.g");
        assert!(merged.properties.is_empty());
    }

    #[test]
    fn sentinels_carry_no_token() {
        assert_eq!(Input::End.token(), None);
        assert_eq!(Input::Start.sentinel(), Some(Sentinel::Start));
        let token = Token::of_type(TokenType::Word);
        assert_eq!(Input::Token(&token).sentinel(), None);
    }
}
