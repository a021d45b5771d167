use memchr::memchr2;

use super::ast::RegexLiteral;
use super::{PatternError, PatternResult};

const REGEX_FLAGS: [char; 4] = ['i', 'm', 's', 'x'];

/// Character cursor over a pattern source. Positions reported in errors are
/// byte offsets into the source.
pub(crate) struct Cursor<'a> {
    pattern: &'a str,
    chars: Vec<(usize, char)>,
    index: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(pattern: &'a str) -> Self {
        Self {
            pattern,
            chars: pattern.char_indices().collect(),
            index: 0,
        }
    }

    pub(crate) fn pattern(&self) -> &'a str {
        self.pattern
    }

    pub(crate) fn peek(&self) -> Option<char> {
        self.chars.get(self.index).map(|(_, ch)| *ch)
    }

    pub(crate) fn next(&mut self) -> Option<char> {
        let ch = self.peek();
        if ch.is_some() {
            self.index += 1;
        }
        ch
    }

    pub(crate) fn expect(&mut self, expected: char) {
        let actual = self.next();
        debug_assert_eq!(Some(expected), actual);
    }

    pub(crate) fn current_byte_index(&self) -> usize {
        self.chars
            .get(self.index)
            .map(|(idx, _)| *idx)
            .unwrap_or(self.pattern.len())
    }

    fn seek_byte(&mut self, byte: usize) {
        self.index = self.chars.partition_point(|(idx, _)| *idx < byte);
    }

    pub(crate) fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.index += 1;
        }
    }

    /// Consume characters up to (not including) the first one accepted by
    /// `stop`, or to the end of input.
    pub(crate) fn take_until(&mut self, stop: impl Fn(char) -> bool) -> &'a str {
        let start = self.current_byte_index();
        while let Some(ch) = self.peek() {
            if stop(ch) {
                break;
            }
            self.index += 1;
        }
        &self.pattern[start..self.current_byte_index()]
    }

    /// Read a `'...'` literal. Supported escapes are `\n`, `\r`, `\t`, `\\`
    /// and `\'`.
    pub(crate) fn read_string(&mut self) -> PatternResult<String> {
        let start = self.current_byte_index();
        self.expect('\'');
        let mut value = String::new();

        loop {
            let from = self.current_byte_index();
            let rest = &self.pattern.as_bytes()[from..];
            let Some(offset) = memchr2(b'\'', b'\\', rest) else {
                return Err(PatternError::UnterminatedString {
                    pattern: self.pattern.to_string(),
                    start,
                });
            };
            value.push_str(&self.pattern[from..from + offset]);
            self.seek_byte(from + offset);

            if self.next() == Some('\'') {
                return Ok(value);
            }

            let escape_index = from + offset;
            match self.next() {
                Some('n') => value.push('\n'),
                Some('r') => value.push('\r'),
                Some('t') => value.push('\t'),
                Some('\\') => value.push('\\'),
                Some('\'') => value.push('\''),
                Some(escape) => {
                    return Err(PatternError::UnknownEscape {
                        pattern: self.pattern.to_string(),
                        escape,
                        index: escape_index,
                    });
                }
                None => {
                    return Err(PatternError::LoneEscapeCharacter {
                        pattern: self.pattern.to_string(),
                        index: escape_index,
                    });
                }
            }
        }
    }

    /// Read a `/regex/flags` literal. `\/` yields a literal slash, every other
    /// escape is handed to the regex engine untouched.
    pub(crate) fn read_regex(&mut self) -> PatternResult<RegexLiteral> {
        let start = self.current_byte_index();
        self.expect('/');
        let mut source = String::new();

        loop {
            let from = self.current_byte_index();
            let rest = &self.pattern.as_bytes()[from..];
            let Some(offset) = memchr2(b'/', b'\\', rest) else {
                return Err(PatternError::UnterminatedRegex {
                    pattern: self.pattern.to_string(),
                    start,
                });
            };
            source.push_str(&self.pattern[from..from + offset]);
            self.seek_byte(from + offset);

            if self.next() == Some('/') {
                break;
            }

            match self.next() {
                Some('/') => source.push('/'),
                Some(escaped) => {
                    source.push('\\');
                    source.push(escaped);
                }
                None => {
                    return Err(PatternError::LoneEscapeCharacter {
                        pattern: self.pattern.to_string(),
                        index: from + offset,
                    });
                }
            }
        }

        let mut flags = String::new();
        while let Some(ch) = self.peek() {
            if !ch.is_ascii_alphabetic() {
                break;
            }
            if !REGEX_FLAGS.contains(&ch) || flags.contains(ch) {
                return Err(PatternError::UnknownRegexFlag {
                    pattern: self.pattern.to_string(),
                    flag: ch,
                    index: self.current_byte_index(),
                });
            }
            flags.push(ch);
            self.next();
        }

        Ok(RegexLiteral {
            source,
            flags,
            index: start,
        })
    }

    /// Read an unsigned decimal number, returning `None` when no digit is present.
    pub(crate) fn read_number(&mut self) -> PatternResult<Option<u32>> {
        let start = self.current_byte_index();
        let digits = self.take_until(|ch| !ch.is_ascii_digit());
        if digits.is_empty() {
            return Ok(None);
        }
        digits
            .parse()
            .map(Some)
            .map_err(|_| PatternError::InvalidRepetitionRange {
                pattern: self.pattern.to_string(),
                index: start,
                reason: "bound is too large",
            })
    }
}
