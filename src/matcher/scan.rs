use crate::pattern::CompiledPattern;
use crate::token::Token;

/// Where a match was reported while scanning sentences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MatchLocation {
    pub sentence: usize,
    /// Index of the token that completed the match, or `None` when it
    /// completed at the end of the sentence.
    pub token: Option<usize>,
}

/// Run `pattern` over each sentence in turn. Matches never span sentences.
pub fn scan_sentences<'a, S, T>(pattern: &CompiledPattern, sentences: S) -> Vec<MatchLocation>
where
    S: IntoIterator<Item = T>,
    T: IntoIterator<Item = &'a Token>,
{
    let mut matcher = pattern.matcher();
    let mut found = Vec::new();

    for (sentence, tokens) in sentences.into_iter().enumerate() {
        matcher.reset();
        for (index, token) in tokens.into_iter().enumerate() {
            if matcher.add(token) {
                found.push(MatchLocation {
                    sentence,
                    token: Some(index),
                });
            }
        }
        if matcher.end() {
            found.push(MatchLocation {
                sentence,
                token: None,
            });
        }
    }

    found
}
