use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;

use super::ast::{PatternAst, PatternNode, Quantifier};
use super::constraint::AtomMatcher;
use super::parser::parse_pattern;
use super::{PatternError, PatternResult};
use crate::matcher::StreamMatcher;
use crate::options::{CompileFlags, PatternOptions};
use crate::token::Sentinel;

pub type NodeId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QuantifierSpan {
    pub min: u32,
    pub max: Option<u32>,
}

impl QuantifierSpan {
    pub fn from_quantifier(quantifier: Quantifier) -> Self {
        let (min, max) = quantifier.bounds();
        Self { min, max }
    }

    pub fn allows_more(&self, count: u32) -> bool {
        self.max.is_none_or(|max| count < max)
    }

    pub fn is_satisfied(&self, count: u32) -> bool {
        count >= self.min
    }

    /// Counts past `min` are indistinguishable when there is no upper bound.
    pub fn clamp(&self, count: u32) -> u32 {
        match self.max {
            Some(_) => count,
            None => count.min(self.min),
        }
    }
}

impl fmt::Display for QuantifierSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.min, self.max) {
            (0, Some(1)) => f.write_str("?"),
            (0, None) => f.write_str("*"),
            (1, None) => f.write_str("+"),
            (min, Some(max)) if min == max => write!(f, "{{{min}}}"),
            (0, Some(max)) => write!(f, "{{,{max}}}"),
            (min, Some(max)) => write!(f, "{{{min},{max}}}"),
            (min, None) => write!(f, "{{{min},}}"),
        }
    }
}

/// A node of the compiled graph. `next` is the node tried against the token
/// after this one; `None` means the enclosing scope is complete.
#[derive(Debug, Clone, PartialEq)]
pub enum MatcherNode {
    Atom {
        matcher: AtomMatcher,
        next: Option<NodeId>,
    },
    Anchor {
        sentinel: Sentinel,
        next: Option<NodeId>,
    },
    /// Group of nodes whose tail is already wired to `exit`.
    Sequence { head: NodeId, exit: Option<NodeId> },
    /// Every branch is wired to the shared `exit`.
    Alternation {
        branches: SmallVec<[NodeId; 4]>,
        exit: Option<NodeId>,
    },
    Repeat {
        body: NodeId,
        span: QuantifierSpan,
        next: Option<NodeId>,
    },
    Negation { body: NodeId, next: Option<NodeId> },
}

/// Immutable arena of matcher nodes.
#[derive(Debug)]
pub struct PatternGraph {
    nodes: Vec<MatcherNode>,
    nullable: Vec<bool>,
    entry: NodeId,
    has_start_anchor: bool,
}

impl PatternGraph {
    pub fn node(&self, id: NodeId) -> &MatcherNode {
        &self.nodes[id as usize]
    }

    pub fn entry(&self) -> NodeId {
        self.entry
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `id` can finish its scope without consuming any input.
    pub fn is_nullable(&self, id: NodeId) -> bool {
        self.nullable[id as usize]
    }

    pub fn has_start_anchor(&self) -> bool {
        self.has_start_anchor
    }

    fn write_chain(
        &self,
        f: &mut fmt::Formatter<'_>,
        mut current: Option<NodeId>,
        stop: Option<NodeId>,
    ) -> fmt::Result {
        let mut first = true;
        while let Some(id) = current {
            if Some(id) == stop {
                break;
            }
            if !first {
                f.write_str(" ")?;
            }
            first = false;
            current = self.write_node(f, id)?;
        }
        Ok(())
    }

    fn write_node(&self, f: &mut fmt::Formatter<'_>, id: NodeId) -> Result<Option<NodeId>, fmt::Error> {
        match self.node(id) {
            MatcherNode::Atom { matcher, next } => {
                write!(f, "{matcher}")?;
                Ok(*next)
            }
            MatcherNode::Anchor { sentinel, next } => {
                f.write_str(match sentinel {
                    Sentinel::Start => "^",
                    Sentinel::End => "$",
                })?;
                Ok(*next)
            }
            MatcherNode::Sequence { head, exit } => {
                f.write_str("(")?;
                self.write_chain(f, Some(*head), *exit)?;
                f.write_str(")")?;
                Ok(*exit)
            }
            MatcherNode::Alternation { branches, exit } => {
                f.write_str("[")?;
                for (idx, branch) in branches.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(" ")?;
                    }
                    self.write_chain(f, Some(*branch), *exit)?;
                }
                f.write_str("]")?;
                Ok(*exit)
            }
            MatcherNode::Repeat { body, span, next } => {
                self.write_chain(f, Some(*body), None)?;
                write!(f, "{span}")?;
                Ok(*next)
            }
            MatcherNode::Negation { body, next } => {
                f.write_str("!")?;
                self.write_chain(f, Some(*body), None)?;
                Ok(*next)
            }
        }
    }
}

struct GraphBuilder<'p> {
    pattern: &'p str,
    nodes: Vec<MatcherNode>,
    nullable: Vec<bool>,
    has_start_anchor: bool,
}

impl<'p> GraphBuilder<'p> {
    fn new(pattern: &'p str) -> Self {
        Self {
            pattern,
            nodes: Vec::new(),
            nullable: Vec::new(),
            has_start_anchor: false,
        }
    }

    fn finish(self, entry: NodeId) -> PatternGraph {
        PatternGraph {
            nodes: self.nodes,
            nullable: self.nullable,
            entry,
            has_start_anchor: self.has_start_anchor,
        }
    }

    fn push(&mut self, node: MatcherNode) -> NodeId {
        let nullable = self.compute_nullable(&node);
        let id = self.nodes.len() as NodeId;
        self.nodes.push(node);
        self.nullable.push(nullable);
        id
    }

    fn continues_empty(&self, next: Option<NodeId>) -> bool {
        next.is_none_or(|id| self.nullable[id as usize])
    }

    // Children are always pushed before their parent, so their flags exist.
    fn compute_nullable(&self, node: &MatcherNode) -> bool {
        match node {
            MatcherNode::Atom { .. } | MatcherNode::Anchor { .. } | MatcherNode::Negation { .. } => {
                false
            }
            MatcherNode::Sequence { head, .. } => self.nullable[*head as usize],
            MatcherNode::Alternation { branches, .. } => {
                branches.iter().any(|id| self.nullable[*id as usize])
            }
            MatcherNode::Repeat { body, span, next } => {
                (span.min == 0 || self.nullable[*body as usize]) && self.continues_empty(*next)
            }
        }
    }

    /// Lower `nodes` back to front so each element knows its continuation.
    fn lower_sequence(&mut self, nodes: &[PatternNode], exit: Option<NodeId>) -> PatternResult<NodeId> {
        if nodes.is_empty() {
            return Err(PatternError::EmptyPattern {
                pattern: self.pattern.to_string(),
            });
        }

        let mut continuation = exit;
        for node in nodes.iter().rev() {
            continuation = Some(self.lower_node(node, continuation)?);
        }

        match continuation {
            Some(head) => Ok(self.push(MatcherNode::Sequence { head, exit })),
            None => Err(PatternError::EmptyPattern {
                pattern: self.pattern.to_string(),
            }),
        }
    }

    fn lower_node(&mut self, node: &PatternNode, next: Option<NodeId>) -> PatternResult<NodeId> {
        match node {
            PatternNode::Token(token) => {
                let matcher = AtomMatcher::compile(token, self.pattern)?;
                Ok(self.push(MatcherNode::Atom { matcher, next }))
            }
            PatternNode::Anchor(sentinel) => {
                if *sentinel == Sentinel::Start {
                    self.has_start_anchor = true;
                }
                Ok(self.push(MatcherNode::Anchor {
                    sentinel: *sentinel,
                    next,
                }))
            }
            PatternNode::Group(group) => self.lower_sequence(&group.nodes, next),
            PatternNode::Alternation(alternation) => {
                let branches = alternation
                    .branches
                    .iter()
                    .map(|branch| self.lower_node(branch, next))
                    .collect::<PatternResult<SmallVec<_>>>()?;
                Ok(self.push(MatcherNode::Alternation {
                    branches,
                    exit: next,
                }))
            }
            PatternNode::Negation(inner) => {
                let body = self.lower_node(inner, None)?;
                Ok(self.push(MatcherNode::Negation { body, next }))
            }
            PatternNode::Repeat(repeat) => {
                let body = self.lower_node(&repeat.node, None)?;
                let span = QuantifierSpan::from_quantifier(repeat.quantifier);
                Ok(self.push(MatcherNode::Repeat { body, span, next }))
            }
        }
    }
}

/// A compiled pattern. Cloning is cheap and clones share the graph.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    source: Arc<str>,
    graph: Arc<PatternGraph>,
    options: PatternOptions,
}

impl CompiledPattern {
    /// Create a new matcher for streaming matching.
    pub fn matcher(&self) -> StreamMatcher {
        StreamMatcher::new(self.clone())
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn graph(&self) -> &PatternGraph {
        &self.graph
    }

    pub fn options(&self) -> &PatternOptions {
        &self.options
    }

    pub fn node_count(&self) -> usize {
        self.graph.len()
    }
}

impl fmt::Display for CompiledPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.graph.node(self.graph.entry()) {
            MatcherNode::Sequence { head, exit: None } => self.graph.write_chain(f, Some(*head), None),
            _ => self.graph.write_chain(f, Some(self.graph.entry()), None),
        }
    }
}

pub fn compile_pattern_ast(
    ast: &PatternAst,
    pattern: &str,
    options: PatternOptions,
) -> PatternResult<CompiledPattern> {
    let mut builder = GraphBuilder::new(pattern);
    let entry = builder.lower_sequence(&ast.nodes, None)?;
    let graph = builder.finish(entry);

    tracing::debug!(pattern = %pattern, nodes = graph.len(), "compiled token pattern");

    Ok(CompiledPattern {
        source: Arc::from(pattern),
        graph: Arc::new(graph),
        options,
    })
}

/// Compile a pattern that can be used to match tokens.
#[tracing::instrument(level = "trace", fields(pattern = %pattern))]
pub fn compile(pattern: &str, flags: CompileFlags) -> PatternResult<CompiledPattern> {
    let ast = parse_pattern(pattern)?;
    compile_pattern_ast(&ast, pattern, PatternOptions::from(flags))
}

#[tracing::instrument(level = "trace", skip(options), fields(pattern = %pattern))]
pub fn compile_with_options(
    pattern: &str,
    options: PatternOptions,
) -> crate::errors::Result<CompiledPattern> {
    options.validate()?;
    let ast = parse_pattern(pattern)?;
    Ok(compile_pattern_ast(&ast, pattern, options)?)
}
