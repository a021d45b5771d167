use crate::options::PatternOptions;
use crate::pattern::CompiledPattern;
use crate::token::{Input, Token};

use super::frontier::{self, Frontier};
use super::thread::Successors;

/// Matches one compiled pattern against a stream of tokens.
///
/// Tokens are fed one at a time with [`StreamMatcher::add`]; every token
/// starts a new attempt alongside those already in flight. A matcher is
/// not shared between streams, but any number of matchers can run over
/// the same [`CompiledPattern`] at once.
#[derive(Debug, Clone)]
pub struct StreamMatcher {
    pattern: CompiledPattern,
    frontier: Frontier,
    matched: bool,
    at_start: bool,
}

impl StreamMatcher {
    pub fn new(pattern: CompiledPattern) -> Self {
        let frontier = Frontier::new(pattern.options().max_threads);
        Self {
            pattern,
            frontier,
            matched: false,
            at_start: true,
        }
    }

    /// Feed the next token. Returns `true` when some attempt completed on it,
    /// after which the matcher starts over from a clean frontier. A skipped
    /// whitespace token never matches and leaves the frontier alone.
    pub fn add(&mut self, token: &Token) -> bool {
        if self.pattern.options().skips_whitespace() && token.kind.is_whitespace() {
            self.matched = false;
            return false;
        }

        let (threads, completed) = self.run(Input::Token(token)).into_parts();
        self.at_start = false;
        self.matched = completed;
        if completed {
            self.frontier.clear();
        } else {
            self.frontier.replace(threads);
        }

        tracing::trace!(
            token = %token,
            matched = self.matched,
            frontier = self.frontier.len(),
            "token added"
        );
        self.matched
    }

    /// Test whether the stream ending here completes the pattern. Only the
    /// matched flag changes.
    pub fn end(&mut self) -> bool {
        let (_, completed) = self.run(Input::End).into_parts();
        self.matched = completed;
        tracing::trace!(matched = completed, frontier = self.frontier.len(), "end of stream");
        completed
    }

    pub fn reset(&mut self) {
        self.frontier.clear();
        self.matched = false;
        self.at_start = true;
    }

    pub fn is_match(&self) -> bool {
        self.matched
    }

    /// Number of attempts currently in flight.
    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    pub fn options(&self) -> &PatternOptions {
        self.pattern.options()
    }

    pub fn pattern(&self) -> &CompiledPattern {
        &self.pattern
    }

    fn run(&self, input: Input<'_>) -> Successors {
        let graph = self.pattern.graph();
        if self.at_start && graph.has_start_anchor() {
            let (primed, _) = frontier::step(graph, self.frontier.threads(), Input::Start).into_parts();
            frontier::step(graph, &primed, input)
        } else {
            frontier::step(graph, self.frontier.threads(), input)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::CompileFlags;
    use crate::pattern::compile;
    use crate::token::TokenType;

    fn matcher(pattern: &str) -> StreamMatcher {
        compile(pattern, CompileFlags::empty())
            .expect("pattern should compile")
            .matcher()
    }

    fn token(kind: TokenType) -> Token {
        Token::of_type(kind)
    }

    #[test]
    fn frontier_clears_after_match() {
        let mut matcher = matcher("word symbol");
        assert!(!matcher.add(&token(TokenType::Word)));
        assert_eq!(matcher.frontier_len(), 1);
        assert!(matcher.add(&token(TokenType::Symbol)));
        assert_eq!(matcher.frontier_len(), 0);
    }

    #[test]
    fn skipped_whitespace_keeps_frontier() {
        let mut matcher = matcher("word symbol");
        matcher.add(&token(TokenType::Word));
        assert!(!matcher.add(&token(TokenType::Whitespace)));
        assert_eq!(matcher.frontier_len(), 1);
        assert!(matcher.add(&token(TokenType::Symbol)));
    }

    #[test]
    fn skipped_whitespace_clears_previous_match() {
        let mut matcher = matcher("word");
        assert!(matcher.add(&token(TokenType::Word)));
        assert!(!matcher.add(&token(TokenType::Whitespace)));
        assert!(!matcher.is_match());
    }

    #[test]
    fn start_anchor_only_holds_before_first_token() {
        let mut matcher = matcher("^ word");
        assert!(matcher.add(&token(TokenType::Word)));
        assert!(!matcher.add(&token(TokenType::Word)));
        matcher.reset();
        assert!(matcher.add(&token(TokenType::Word)));
    }

    #[test]
    fn end_does_not_consume_frontier() {
        let mut matcher = matcher("symbol $");
        matcher.add(&token(TokenType::Symbol));
        assert!(matcher.end());
        assert!(matcher.is_match());
        assert_eq!(matcher.frontier_len(), 1);
        assert!(matcher.end());
    }

    #[test]
    fn thread_limit_bounds_frontier() {
        let options = PatternOptions::builder()
            .max_threads(2)
            .build()
            .expect("options should be valid");
        let pattern = crate::pattern::compile_with_options("word word word word symbol", options)
            .expect("pattern should compile");
        let mut matcher = pattern.matcher();
        for _ in 0..6 {
            assert!(!matcher.add(&token(TokenType::Word)));
            assert!(matcher.frontier_len() <= 2);
        }
    }
}
