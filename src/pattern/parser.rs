use crate::pattern::ast::{
    AlternationNode, ConstraintNode, GroupNode, PatternAst, PatternNode, Quantifier, RepeatNode,
    TokenNode, ValueNode,
};
use crate::pattern::lexer::Cursor;
use crate::pattern::{PatternError, PatternResult};
use crate::token::{Sentinel, TokenType, property};

#[tracing::instrument(level = "trace", fields(pattern = %pattern))]
pub fn parse_pattern(pattern: &str) -> PatternResult<PatternAst> {
    let mut parser = PatternParser::new(pattern);
    let nodes = parser.parse_sequence(None)?;
    if nodes.is_empty() {
        return Err(PatternError::EmptyPattern {
            pattern: pattern.to_string(),
        });
    }

    Ok(PatternAst::new(nodes))
}

/// An open `(` or `[` waiting for its closing character.
#[derive(Clone, Copy)]
struct OpenDelimiter {
    open: char,
    close: char,
    start: usize,
}

/// Deepest allowed stack of open groups, alternations and negations.
const MAX_NESTING_DEPTH: usize = 128;

struct PatternParser<'a> {
    cursor: Cursor<'a>,
    depth: usize,
}

impl<'a> PatternParser<'a> {
    fn new(pattern: &'a str) -> Self {
        Self {
            cursor: Cursor::new(pattern),
            depth: 0,
        }
    }

    fn pattern(&self) -> String {
        self.cursor.pattern().to_string()
    }

    fn parse_sequence(&mut self, open: Option<OpenDelimiter>) -> PatternResult<Vec<PatternNode>> {
        let mut nodes = Vec::new();
        loop {
            self.cursor.skip_whitespace();
            match self.cursor.peek() {
                None => {
                    if let Some(open) = open {
                        return Err(PatternError::UnterminatedGroup {
                            pattern: self.pattern(),
                            open: open.open,
                            start: open.start,
                        });
                    }
                    return Ok(nodes);
                }
                Some(ch @ (')' | ']')) => {
                    let index = self.cursor.current_byte_index();
                    return match open {
                        Some(open) if open.close == ch => {
                            self.cursor.next();
                            Ok(nodes)
                        }
                        Some(open) => Err(PatternError::MismatchedDelimiter {
                            pattern: self.pattern(),
                            expected: open.close,
                            found: ch,
                            index,
                        }),
                        None => Err(PatternError::UnexpectedClosingDelimiter {
                            pattern: self.pattern(),
                            found: ch,
                            index,
                        }),
                    };
                }
                Some(_) => nodes.push(self.parse_element()?),
            }
        }
    }

    fn parse_element(&mut self) -> PatternResult<PatternNode> {
        let node = self.parse_unquantified()?;
        let node = match self.parse_quantifier()? {
            Some(quantifier) => PatternNode::Repeat(RepeatNode::new(node, quantifier)),
            None => node,
        };

        if let Some(modifier @ ('?' | '*' | '+' | '{')) = self.cursor.peek() {
            return Err(PatternError::DanglingQuantifier {
                pattern: self.pattern(),
                modifier,
                index: self.cursor.current_byte_index(),
            });
        }

        Ok(node)
    }

    fn parse_unquantified(&mut self) -> PatternResult<PatternNode> {
        let index = self.cursor.current_byte_index();
        match self.cursor.peek() {
            Some('!') => self.nested(index, Self::parse_negation),
            Some('(') => self.nested(index, Self::parse_group),
            Some('[') => self.nested(index, Self::parse_alternation),
            Some('\'') => {
                let text = self.cursor.read_string()?;
                Ok(text_shorthand(ValueNode::Text(text)))
            }
            Some('/') => {
                let regex = self.cursor.read_regex()?;
                Ok(text_shorthand(ValueNode::Regex(regex)))
            }
            Some('$') => {
                self.cursor.expect('$');
                Ok(PatternNode::Anchor(Sentinel::End))
            }
            Some('^') => {
                self.cursor.expect('^');
                Ok(PatternNode::Anchor(Sentinel::Start))
            }
            Some(modifier @ ('?' | '*' | '+' | '{')) => Err(PatternError::DanglingQuantifier {
                pattern: self.pattern(),
                modifier,
                index,
            }),
            _ => self.parse_token_with_type(),
        }
    }

    fn nested(
        &mut self,
        index: usize,
        parse: fn(&mut Self, usize) -> PatternResult<PatternNode>,
    ) -> PatternResult<PatternNode> {
        if self.depth == MAX_NESTING_DEPTH {
            return Err(PatternError::NestingTooDeep {
                pattern: self.pattern(),
                index,
            });
        }
        self.depth += 1;
        let node = parse(self, index);
        self.depth -= 1;
        node
    }

    fn parse_negation(&mut self, index: usize) -> PatternResult<PatternNode> {
        self.cursor.expect('!');
        match self.cursor.peek() {
            None | Some(')' | ']') => Err(PatternError::DanglingNegation {
                pattern: self.pattern(),
                index,
            }),
            Some(ch) if ch.is_whitespace() => Err(PatternError::DanglingNegation {
                pattern: self.pattern(),
                index,
            }),
            Some(_) => Ok(PatternNode::Negation(Box::new(self.parse_unquantified()?))),
        }
    }

    fn parse_group(&mut self, index: usize) -> PatternResult<PatternNode> {
        self.cursor.expect('(');
        let nodes = self.parse_sequence(Some(OpenDelimiter {
            open: '(',
            close: ')',
            start: index,
        }))?;
        if nodes.is_empty() {
            return Err(PatternError::EmptyGroup {
                pattern: self.pattern(),
                start: index,
            });
        }
        Ok(PatternNode::Group(GroupNode::new(nodes)))
    }

    fn parse_alternation(&mut self, index: usize) -> PatternResult<PatternNode> {
        self.cursor.expect('[');
        let branches = self.parse_sequence(Some(OpenDelimiter {
            open: '[',
            close: ']',
            start: index,
        }))?;
        if branches.is_empty() {
            return Err(PatternError::EmptyAlternation {
                pattern: self.pattern(),
                start: index,
            });
        }
        Ok(PatternNode::Alternation(AlternationNode::new(branches)))
    }

    fn parse_token_with_type(&mut self) -> PatternResult<PatternNode> {
        let index = self.cursor.current_byte_index();
        let keyword = self.cursor.take_until(|ch| ch == '=' || is_boundary(ch));
        let kind = if keyword == "any" {
            None
        } else {
            Some(
                TokenType::from_keyword(keyword).ok_or_else(|| PatternError::UnknownTokenType {
                    pattern: self.pattern(),
                    found: keyword.to_string(),
                    index,
                })?,
            )
        };

        let mut constraints = Vec::new();
        if self.cursor.peek() == Some('=') {
            self.cursor.expect('=');
            let value = self.parse_value(property::TEXT, index)?;
            constraints.push(ConstraintNode::new(property::TEXT, value));
        }

        while self.cursor.peek() == Some(',') {
            self.cursor.expect(',');
            let name_index = self.cursor.current_byte_index();
            let name = self.cursor.take_until(is_boundary);
            if name.is_empty() {
                return Err(PatternError::EmptyPropertyName {
                    pattern: self.pattern(),
                    index: name_index,
                });
            }

            let value = if self.cursor.peek() == Some('=') {
                self.cursor.expect('=');
                self.parse_value(name, name_index)?
            } else {
                ValueNode::Present
            };
            constraints.push(ConstraintNode::new(name, value));
        }

        Ok(PatternNode::Token(TokenNode::new(kind, constraints)))
    }

    fn parse_value(&mut self, name: &str, index: usize) -> PatternResult<ValueNode> {
        match self.cursor.peek() {
            Some('\'') => Ok(ValueNode::Text(self.cursor.read_string()?)),
            Some('/') => Ok(ValueNode::Regex(self.cursor.read_regex()?)),
            _ => {
                let raw = self
                    .cursor
                    .take_until(|ch| matches!(ch, ',' | ']' | ')') || ch.is_whitespace());
                if raw.is_empty() {
                    return Err(PatternError::MissingPropertyValue {
                        pattern: self.pattern(),
                        name: name.to_string(),
                        index,
                    });
                }
                Ok(ValueNode::Text(raw.to_string()))
            }
        }
    }

    fn parse_quantifier(&mut self) -> PatternResult<Option<Quantifier>> {
        match self.cursor.peek() {
            Some('?' | '*' | '+') => Ok(Quantifier::from_modifier(self.cursor.next())),
            Some('{') => self.parse_repetition_range().map(Some),
            _ => Ok(None),
        }
    }

    /// `{m}`, `{m,}`, `{,n}` or `{m,n}`.
    fn parse_repetition_range(&mut self) -> PatternResult<Quantifier> {
        let start = self.cursor.current_byte_index();
        self.cursor.expect('{');
        let min = self.cursor.read_number()?;

        let (min, max) = match self.cursor.next() {
            Some('}') => match min {
                Some(count) => (count, Some(count)),
                None => {
                    return Err(PatternError::InvalidRepetitionRange {
                        pattern: self.pattern(),
                        index: start,
                        reason: "a repetition count is required",
                    });
                }
            },
            Some(',') => {
                let max = self.cursor.read_number()?;
                match self.cursor.next() {
                    Some('}') => (min.unwrap_or(0), max),
                    Some(_) => {
                        return Err(PatternError::InvalidRepetitionRange {
                            pattern: self.pattern(),
                            index: start,
                            reason: "bounds must be decimal numbers",
                        });
                    }
                    None => {
                        return Err(PatternError::UnterminatedRepetition {
                            pattern: self.pattern(),
                            start,
                        });
                    }
                }
            }
            Some(_) => {
                return Err(PatternError::InvalidRepetitionRange {
                    pattern: self.pattern(),
                    index: start,
                    reason: "bounds must be decimal numbers",
                });
            }
            None => {
                return Err(PatternError::UnterminatedRepetition {
                    pattern: self.pattern(),
                    start,
                });
            }
        };

        if max == Some(0) {
            return Err(PatternError::InvalidRepetitionRange {
                pattern: self.pattern(),
                index: start,
                reason: "upper bound must be at least 1",
            });
        }
        if max.is_some_and(|max| min > max) {
            return Err(PatternError::InvalidRepetitionRange {
                pattern: self.pattern(),
                index: start,
                reason: "lower bound exceeds upper bound",
            });
        }

        Ok(Quantifier::Range { min, max })
    }
}

fn text_shorthand(value: ValueNode) -> PatternNode {
    PatternNode::Token(TokenNode::new(
        None,
        vec![ConstraintNode::new(property::TEXT, value)],
    ))
}

fn is_boundary(ch: char) -> bool {
    matches!(
        ch,
        ',' | '=' | ']' | ')' | '(' | '[' | '?' | '*' | '+' | '{'
    ) || ch.is_whitespace()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(pattern: &str) -> PatternNode {
        let mut ast = parse_pattern(pattern).expect("pattern should parse");
        assert_eq!(ast.nodes.len(), 1, "expected a single element in {pattern}");
        ast.nodes.remove(0)
    }

    #[test]
    fn whitespace_keyword_is_not_special() {
        match single("ws") {
            PatternNode::Token(token) => assert_eq!(token.kind, Some(TokenType::Whitespace)),
            other => panic!("expected token node, got {other:?}"),
        }
    }

    #[test]
    fn bare_property_value_stops_at_closing_group() {
        match single("(symbol,normalized=test)") {
            PatternNode::Group(group) => match &group.nodes[0] {
                PatternNode::Token(token) => {
                    assert_eq!(
                        token.constraints,
                        vec![ConstraintNode::new("normalized", ValueNode::Text("test".into()))]
                    );
                }
                other => panic!("expected token node, got {other:?}"),
            },
            other => panic!("expected group node, got {other:?}"),
        }
    }

    #[test]
    fn flag_property_without_value_is_presence_check() {
        match single("symbol,text='.',continuation") {
            PatternNode::Token(token) => {
                assert_eq!(token.constraints.len(), 2);
                assert_eq!(token.constraints[1].value, ValueNode::Present);
            }
            other => panic!("expected token node, got {other:?}"),
        }
    }

    #[test]
    fn negation_binds_tighter_than_quantifier() {
        match single("!word+") {
            PatternNode::Repeat(repeat) => {
                assert_eq!(repeat.quantifier, Quantifier::OneOrMore);
                assert!(matches!(*repeat.node, PatternNode::Negation(_)));
            }
            other => panic!("expected repeat node, got {other:?}"),
        }
    }

    #[test]
    fn open_ended_ranges_parse() {
        for (pattern, min, max) in [
            ("word{2}", 2, Some(2)),
            ("word{2,}", 2, None),
            ("word{,5}", 0, Some(5)),
            ("word{1,5}", 1, Some(5)),
        ] {
            match single(pattern) {
                PatternNode::Repeat(repeat) => {
                    assert_eq!(repeat.quantifier.bounds(), (min, max), "bounds of {pattern}");
                }
                other => panic!("expected repeat node, got {other:?}"),
            }
        }
    }

    #[test]
    fn anchors_parse_as_elements() {
        let ast = parse_pattern("^ word $").expect("pattern should parse");
        assert_eq!(ast.nodes[0], PatternNode::Anchor(Sentinel::Start));
        assert_eq!(ast.nodes[2], PatternNode::Anchor(Sentinel::End));
    }

    #[test]
    fn dollar_is_a_bare_value_inside_constraints() {
        match single("symbol=$") {
            PatternNode::Token(token) => {
                assert_eq!(token.constraints[0].value, ValueNode::Text("$".into()));
            }
            other => panic!("expected token node, got {other:?}"),
        }
    }
}
