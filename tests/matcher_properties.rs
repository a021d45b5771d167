use std::thread;

use tokenpat_rs::{CompileFlags, CompiledPattern, PatternOptions, Token, TokenType, compile, compile_with_options};

const PATTERNS: [&str; 6] = [
    "word symbol",
    "symbol (word word)+ symbol",
    "[word symbol] unkn",
    "!(symbol word) special",
    "word? symbol $",
    "[(word symbol) special]{1,3} unkn",
];

fn stream() -> Vec<Token> {
    use TokenType::*;
    [
        Word, Symbol, Whitespace, Word, Word, Symbol, Unknown, Special, Symbol, Word, Whitespace,
        Special, Unknown, Word, Word, Word, Word, Symbol, Symbol, Word, Unknown, Special, Unknown,
    ]
    .into_iter()
    .map(Token::of_type)
    .collect()
}

fn compiled(pattern: &str) -> CompiledPattern {
    compile(pattern, CompileFlags::empty()).expect("pattern should compile")
}

fn run(pattern: &CompiledPattern, tokens: &[Token]) -> Vec<bool> {
    let mut matcher = pattern.matcher();
    let mut results: Vec<bool> = tokens.iter().map(|token| matcher.add(token)).collect();
    results.push(matcher.end());
    results
}

#[test]
fn matcher_when_same_stream_is_replayed_after_reset_then_results_repeat() {
    let tokens = stream();
    for pattern in PATTERNS {
        let pattern = compiled(pattern);
        let mut matcher = pattern.matcher();
        let mut first = Vec::new();
        let mut second = Vec::new();
        for token in &tokens {
            first.push(matcher.add(token));
        }
        matcher.reset();
        for token in &tokens {
            second.push(matcher.add(token));
        }
        assert_eq!(first, second, "{pattern}");
    }
}

#[test]
fn is_match_when_queried_after_any_call_then_equals_returned_value() {
    let tokens = stream();
    for pattern in PATTERNS {
        let mut matcher = compiled(pattern).matcher();
        for token in &tokens {
            let added = matcher.add(token);
            assert_eq!(matcher.is_match(), added, "{pattern} after add");
            let ended = matcher.end();
            assert_eq!(matcher.is_match(), ended, "{pattern} after end");
        }
    }
}

#[test]
fn matcher_when_pattern_completes_then_continues_like_a_fresh_matcher() {
    let tokens = stream();
    for pattern in PATTERNS {
        let pattern = compiled(pattern);
        let mut matcher = pattern.matcher();
        for (index, token) in tokens.iter().enumerate() {
            if !matcher.add(token) {
                continue;
            }
            assert_eq!(matcher.frontier_len(), 0, "{pattern}");
            let rest = &tokens[index + 1..];
            let mut fresh = pattern.matcher();
            let mut continued = matcher.clone();
            for token in rest {
                assert_eq!(continued.add(token), fresh.add(token), "{pattern}");
            }
        }
    }
}

#[test]
fn whitespace_when_skipped_then_results_match_stream_without_whitespace() {
    let tokens = stream();
    let mut spaced = Vec::new();
    for token in &tokens {
        spaced.push(token.clone());
        spaced.push(Token::new(TokenType::Whitespace, " "));
    }

    for pattern in PATTERNS {
        let pattern = compiled(pattern);
        let mut plain = pattern.matcher();
        let mut matcher = pattern.matcher();
        for token in &spaced {
            let frontier = matcher.frontier_len();
            let result = matcher.add(token);
            if token.kind.is_whitespace() {
                assert!(!result);
                assert_eq!(matcher.frontier_len(), frontier, "{pattern}");
                assert!(!matcher.is_match(), "{pattern}");
            } else {
                assert_eq!(result, plain.add(token), "{pattern}");
            }
        }
    }
}

#[test]
fn whitespace_when_significant_then_breaks_sequences() {
    let tokens = [
        Token::new(TokenType::Word, "hello"),
        Token::new(TokenType::Whitespace, " "),
        Token::new(TokenType::Symbol, "!"),
    ];

    let adjacent = compile("word symbol", CompileFlags::WITH_WHITESPACE).expect("pattern should compile");
    assert_eq!(run(&adjacent, &tokens), vec![false, false, false, false]);

    let spaced = compile("word ws symbol", CompileFlags::WITH_WHITESPACE).expect("pattern should compile");
    assert_eq!(run(&spaced, &tokens), vec![false, false, true, false]);
}

#[test]
fn frontier_when_unbounded_repetitions_nest_then_size_stays_flat() {
    let pattern = compiled("(word* [word symbol]*)* special");
    let mut matcher = pattern.matcher();
    let mut sizes = Vec::new();
    for index in 0..300 {
        let kind = if index % 3 == 0 { TokenType::Symbol } else { TokenType::Word };
        assert!(!matcher.add(&Token::of_type(kind)));
        sizes.push(matcher.frontier_len());
    }
    let early = sizes[30..150].iter().max().copied().unwrap_or_default();
    let late = sizes[150..].iter().max().copied().unwrap_or_default();
    assert_eq!(early, late, "frontier kept growing");
    assert!(late < 64, "frontier grew to {late}");
    assert!(matcher.add(&Token::of_type(TokenType::Special)));
}

#[test]
fn frontier_when_thread_limit_is_reached_then_stays_within_limit() {
    let options = PatternOptions::builder()
        .max_threads(3)
        .build()
        .expect("options should be valid");
    let pattern = compile_with_options("word word word word word word symbol", options)
        .expect("pattern should compile");
    let mut matcher = pattern.matcher();
    for _ in 0..20 {
        matcher.add(&Token::of_type(TokenType::Word));
        assert!(matcher.frontier_len() <= 3);
    }
}

#[test]
fn compiled_pattern_when_shared_across_threads_then_matchers_agree() {
    let tokens = stream();
    for pattern in PATTERNS {
        let pattern = compiled(pattern);
        let expected = run(&pattern, &tokens);
        thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    let pattern = pattern.clone();
                    let tokens = &tokens;
                    scope.spawn(move || run(&pattern, tokens))
                })
                .collect();
            for handle in handles {
                assert_eq!(handle.join().expect("matcher thread should finish"), expected);
            }
        });
    }
}
