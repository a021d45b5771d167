use regex::{Regex, RegexBuilder};
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;

use super::ast::{ConstraintNode, RegexLiteral, TokenNode, ValueNode};
use super::{PatternError, PatternResult};
use crate::token::{PropertyValue, Token, TokenType, property};

/// Expected value of a property.
#[derive(Debug, Clone)]
pub enum ValueMatcher {
    Exact(Box<str>),
    /// Full-match regex; `raw` and `flags` keep the literal as written.
    Regex {
        raw: Box<str>,
        flags: Box<str>,
        compiled: Arc<Regex>,
    },
    Present,
}

impl ValueMatcher {
    fn compile(value: &ValueNode, pattern: &str) -> PatternResult<Self> {
        match value {
            ValueNode::Text(text) => Ok(Self::Exact(text.as_str().into())),
            ValueNode::Regex(literal) => {
                let compiled = compile_regex(literal, pattern)?;
                Ok(Self::Regex {
                    raw: literal.source.as_str().into(),
                    flags: literal.flags.as_str().into(),
                    compiled: Arc::new(compiled),
                })
            }
            ValueNode::Present => Ok(Self::Present),
        }
    }

    pub fn matches(&self, value: &str) -> bool {
        match self {
            Self::Exact(expected) => value == &**expected,
            Self::Regex { compiled, .. } => compiled.is_match(value),
            Self::Present => true,
        }
    }
}

impl PartialEq for ValueMatcher {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Exact(a), Self::Exact(b)) => a == b,
            (Self::Regex { raw: a, flags: fa, .. }, Self::Regex { raw: b, flags: fb, .. }) => {
                a == b && fa == fb
            }
            (Self::Present, Self::Present) => true,
            _ => false,
        }
    }
}

/// Anchor to the whole value. `\A`/`\z` ignore the `m` flag, and the newline
/// ends a trailing `#` comment under `x`.
fn compile_regex(literal: &RegexLiteral, pattern: &str) -> PatternResult<Regex> {
    let source = if literal.flags.contains('x') {
        format!("\\A(?:{}\n)\\z", literal.source)
    } else {
        format!("\\A(?:{})\\z", literal.source)
    };
    RegexBuilder::new(&source)
        .case_insensitive(literal.flags.contains('i'))
        .multi_line(literal.flags.contains('m'))
        .dot_matches_new_line(literal.flags.contains('s'))
        .ignore_whitespace(literal.flags.contains('x'))
        .build()
        .map_err(|err| PatternError::InvalidRegex {
            pattern: pattern.to_string(),
            regex: literal.source.clone(),
            index: literal.index,
            error: err.to_string(),
        })
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyConstraint {
    pub name: Box<str>,
    pub value: ValueMatcher,
}

impl PropertyConstraint {
    pub fn matches(&self, token: &Token) -> bool {
        if let ValueMatcher::Present = self.value {
            return &*self.name == property::TEXT
                || token.get(&self.name).is_some_and(PropertyValue::is_set);
        }

        token
            .property_text(&self.name)
            .is_some_and(|found| self.value.matches(&found))
    }
}

/// Compiled test for a single token.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomMatcher {
    pub kind: Option<TokenType>,
    pub constraints: SmallVec<[PropertyConstraint; 2]>,
}

impl AtomMatcher {
    pub(crate) fn compile(node: &TokenNode, pattern: &str) -> PatternResult<Self> {
        let constraints = node
            .constraints
            .iter()
            .map(|ConstraintNode { name, value }| {
                Ok(PropertyConstraint {
                    name: name.as_str().into(),
                    value: ValueMatcher::compile(value, pattern)?,
                })
            })
            .collect::<PatternResult<SmallVec<_>>>()?;

        Ok(Self {
            kind: node.kind,
            constraints,
        })
    }

    pub fn matches(&self, token: &Token) -> bool {
        if self.kind.is_some_and(|kind| kind != token.kind) {
            return false;
        }
        self.constraints.iter().all(|c| c.matches(token))
    }
}

impl fmt::Display for AtomMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            Some(kind) => write!(f, "{kind}")?,
            None => f.write_str("any")?,
        }
        for constraint in &self.constraints {
            write!(f, ",{}", constraint.name)?;
            match &constraint.value {
                ValueMatcher::Exact(text) => {
                    f.write_str("='")?;
                    for ch in text.chars() {
                        match ch {
                            '\n' => f.write_str("\\n")?,
                            '\r' => f.write_str("\\r")?,
                            '\t' => f.write_str("\\t")?,
                            '\\' => f.write_str("\\\\")?,
                            '\'' => f.write_str("\\'")?,
                            ch => write!(f, "{ch}")?,
                        }
                    }
                    f.write_str("'")?;
                }
                ValueMatcher::Regex { raw, flags, .. } => {
                    write!(f, "=/{}/{flags}", raw.replace('/', "\\/"))?;
                }
                ValueMatcher::Present => {}
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atom(kind: Option<TokenType>, constraints: Vec<ConstraintNode>) -> AtomMatcher {
        AtomMatcher::compile(&TokenNode::new(kind, constraints), "test").expect("atom should compile")
    }

    fn regex(source: &str, flags: &str) -> ValueNode {
        ValueNode::Regex(RegexLiteral {
            source: source.to_string(),
            flags: flags.to_string(),
            index: 0,
        })
    }

    #[test]
    fn regex_requires_full_match() {
        let matcher = atom(
            Some(TokenType::Word),
            vec![ConstraintNode::new("text", regex("[Cc]ookie", ""))],
        );
        assert!(matcher.matches(&Token::new(TokenType::Word, "cookie")));
        assert!(matcher.matches(&Token::new(TokenType::Word, "Cookie")));
        assert!(!matcher.matches(&Token::new(TokenType::Word, "Cookies")));
        assert!(!matcher.matches(&Token::new(TokenType::Symbol, "cookie")));
    }

    #[test]
    fn case_insensitive_flag_applies() {
        let matcher = atom(None, vec![ConstraintNode::new("text", regex("cookie", "i"))]);
        assert!(matcher.matches(&Token::new(TokenType::Word, "COOKIE")));
    }

    #[test]
    fn multi_line_flag_keeps_whole_value_anchoring() {
        let matcher = atom(None, vec![ConstraintNode::new("text", regex("a", "m"))]);
        assert!(matcher.matches(&Token::new(TokenType::Word, "a")));
        assert!(!matcher.matches(&Token::new(TokenType::Word, "a\nb")));
        assert!(!matcher.matches(&Token::new(TokenType::Word, "b\na")));
    }

    #[test]
    fn dot_all_flag_lets_dot_cross_newlines() {
        let token = Token::new(TokenType::Word, "a\nb");
        let plain = atom(None, vec![ConstraintNode::new("text", regex("a.b", ""))]);
        let dot_all = atom(None, vec![ConstraintNode::new("text", regex("a.b", "s"))]);
        assert!(!plain.matches(&token));
        assert!(dot_all.matches(&token));
    }

    #[test]
    fn extended_flag_allows_trailing_comment() {
        let matcher = atom(
            None,
            vec![ConstraintNode::new("text", regex("a b # letters", "x"))],
        );
        assert!(matcher.matches(&Token::new(TokenType::Word, "ab")));
        assert!(!matcher.matches(&Token::new(TokenType::Word, "a b")));
        assert!(!matcher.matches(&Token::new(TokenType::Word, "abc")));
    }

    #[test]
    fn regex_values_differ_by_flags() {
        let compile = |flags: &str| {
            ValueMatcher::compile(&regex("a", flags), "test").expect("regex should compile")
        };
        assert_eq!(compile("i"), compile("i"));
        assert_ne!(compile("i"), compile(""));
    }

    #[test]
    fn alternation_in_regex_is_anchored_as_a_whole() {
        let matcher = atom(None, vec![ConstraintNode::new("text", regex("a|b", ""))]);
        assert!(matcher.matches(&Token::new(TokenType::Word, "b")));
        assert!(!matcher.matches(&Token::new(TokenType::Word, "ab")));
    }

    #[test]
    fn named_properties_are_checked() {
        let matcher = atom(
            Some(TokenType::Word),
            vec![ConstraintNode::new(
                "normalized",
                ValueNode::Text("mrs".into()),
            )],
        );
        let token = Token::new(TokenType::Word, "Mrs");
        assert!(!matcher.matches(&token));
        assert!(matcher.matches(&token.clone().with_property("normalized", "mrs")));
        assert!(!matcher.matches(&token.with_property("normalized", "mr")));
    }

    #[test]
    fn presence_constraint_rejects_false_flag() {
        let matcher = atom(None, vec![ConstraintNode::new("continuation", ValueNode::Present)]);
        let token = Token::of_type(TokenType::Symbol);
        assert!(!matcher.matches(&token));
        assert!(matcher.matches(&token.clone().with_property("continuation", true)));
        assert!(!matcher.matches(&token.with_property("continuation", PropertyValue::Flag(false))));
    }

    #[test]
    fn numeric_property_compares_textually() {
        let matcher = atom(None, vec![ConstraintNode::new("rank", regex(r"\d+", ""))]);
        assert!(matcher.matches(&Token::of_type(TokenType::Word).with_property("rank", 12i64)));
    }

    #[test]
    fn invalid_regex_reports_source() {
        let node = TokenNode::new(None, vec![ConstraintNode::new("text", regex("[", ""))]);
        match AtomMatcher::compile(&node, "/[/") {
            Err(PatternError::InvalidRegex { regex, .. }) => assert_eq!(regex, "["),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
