use crate::token::{Sentinel, TokenType};

#[derive(Debug, Clone, PartialEq)]
pub struct PatternAst {
    pub nodes: Vec<PatternNode>,
}

impl PatternAst {
    pub fn new(nodes: Vec<PatternNode>) -> Self {
        Self { nodes }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PatternNode {
    Token(TokenNode),
    Anchor(Sentinel),
    Group(GroupNode),
    Alternation(AlternationNode),
    Negation(Box<PatternNode>),
    Repeat(RepeatNode),
}

/// A single token test: an optional type plus conjunctive property constraints.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenNode {
    /// `None` for `any`.
    pub kind: Option<TokenType>,
    pub constraints: Vec<ConstraintNode>,
}

impl TokenNode {
    pub fn new(kind: Option<TokenType>, constraints: Vec<ConstraintNode>) -> Self {
        Self { kind, constraints }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintNode {
    pub name: String,
    pub value: ValueNode,
}

impl ConstraintNode {
    pub fn new<S: Into<String>>(name: S, value: ValueNode) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValueNode {
    Text(String),
    Regex(RegexLiteral),
    /// `name` without `=value`.
    Present,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegexLiteral {
    pub source: String,
    pub flags: String,
    /// Byte index of the opening `/`.
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupNode {
    pub nodes: Vec<PatternNode>,
}

impl GroupNode {
    pub fn new(nodes: Vec<PatternNode>) -> Self {
        Self { nodes }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlternationNode {
    pub branches: Vec<PatternNode>,
}

impl AlternationNode {
    pub fn new(branches: Vec<PatternNode>) -> Self {
        Self { branches }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RepeatNode {
    pub node: Box<PatternNode>,
    pub quantifier: Quantifier,
}

impl RepeatNode {
    pub fn new(node: PatternNode, quantifier: Quantifier) -> Self {
        Self {
            node: Box::new(node),
            quantifier,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantifier {
    ZeroOrOne,
    ZeroOrMore,
    OneOrMore,
    Range { min: u32, max: Option<u32> },
}

impl Quantifier {
    pub fn from_modifier(ch: Option<char>) -> Option<Self> {
        match ch {
            Some('?') => Some(Self::ZeroOrOne),
            Some('*') => Some(Self::ZeroOrMore),
            Some('+') => Some(Self::OneOrMore),
            _ => None,
        }
    }

    pub fn bounds(&self) -> (u32, Option<u32>) {
        match *self {
            Self::ZeroOrOne => (0, Some(1)),
            Self::ZeroOrMore => (0, None),
            Self::OneOrMore => (1, None),
            Self::Range { min, max } => (min, max),
        }
    }
}
