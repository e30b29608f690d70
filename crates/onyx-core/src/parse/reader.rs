// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Lexical analysis for Onyx source code.
//!
//! The [`Reader`] walks a [`Stream`] of characters and produces [`Token`]s.
//! Dispatch is driven by the [`Classifier`]: the current character's
//! highest-priority class selects the read routine, and class *membership*
//! decides how far a token extends (so `mutate!` is one identifier even
//! though `!` starts a binary selector).
//!
//! Bracketed groups are read recursively: the whole group becomes a single
//! [`TokenKind::Compound`] token carrying its inner token sequence, so the
//! parser never sees an unmatched bracket.
//!
//! The first malformed construct aborts the read with a typed [`ReadError`];
//! there is no error recovery.
//!
//! # Example
//!
//! ```
//! use onyx_core::parse::{read_all, TokenKind};
//!
//! let tokens = read_all("x + 1").unwrap();
//! assert_eq!(tokens.len(), 3); // x, +, 1
//! ```

use ecow::EcoString;

use super::classifier::{CharClass, Classifier, ClassSet};
use super::error::{ReadError, ReadErrorKind};
use super::stream::Stream;
use super::token::{CompoundShape, Token, TokenKind};
use super::Span;

#[expect(
    clippy::cast_possible_truncation,
    reason = "a char is at most four bytes"
)]
fn char_width(c: char) -> u32 {
    c.len_utf8() as u32
}

/// A reader that tokenizes Onyx source code.
///
/// The reader holds its own cursor (a character stream position and a byte
/// offset for spans) and nothing else; it is not meant to be shared. It
/// implements [`Iterator`] over `Result<Token, ReadError>`, ending after the
/// last real token — end of input is reported by [`Reader::read_term`] as an
/// idempotent [`TokenKind::Eof`], which the iterator does not yield.
#[derive(Debug)]
pub struct Reader {
    /// Current position in the character stream.
    chars: Stream<char>,
    /// The classification table driving dispatch.
    classifier: Classifier,
    /// Current byte offset in the source.
    position: u32,
    /// Set once the iterator has delivered everything.
    done: bool,
}

impl Reader {
    /// Creates a reader over a character stream with the default
    /// classification table.
    #[must_use]
    pub fn new(chars: Stream<char>) -> Self {
        Self::with_classifier(chars, Classifier::default())
    }

    /// Creates a reader with an explicit classifier.
    #[must_use]
    pub fn with_classifier(chars: Stream<char>, classifier: Classifier) -> Self {
        Self {
            chars,
            classifier,
            position: 0,
            done: false,
        }
    }

    /// Creates a reader over the characters of `source`.
    #[must_use]
    pub fn from_source(source: &str) -> Self {
        Self::new(Stream::from_iter(source.chars().collect::<Vec<_>>()))
    }

    /// Returns true if the character stream is exhausted.
    #[must_use]
    pub fn is_at_end(&self) -> bool {
        self.chars.is_empty()
    }

    /// Returns the current character, if any.
    fn current_char(&self) -> Option<char> {
        self.chars.head().ok()
    }

    /// Returns the class set of the current character (empty at end).
    fn current_class(&self) -> ClassSet {
        self.current_char()
            .map_or(ClassSet::EMPTY, |c| self.classifier.classify(c))
    }

    /// Returns true if the current character belongs to `class`.
    fn current_is(&self, class: CharClass) -> bool {
        self.current_class().contains(class)
    }

    /// Advances past the current character.
    fn step(&mut self) {
        if let Ok(c) = self.chars.head() {
            self.position += char_width(c);
            if let Ok(tail) = self.chars.tail() {
                self.chars = tail;
            }
        }
    }

    /// Creates a span from `start` to the current position.
    fn span_from(&self, start: u32) -> Span {
        Span::new(start, self.position)
    }

    /// Creates a span covering the current character.
    fn char_span(&self, c: char) -> Span {
        Span::new(self.position, self.position + char_width(c))
    }

    /// Accumulates a maximal run of characters belonging to `class`.
    fn take_while_class(&mut self, class: CharClass) -> EcoString {
        let mut text = EcoString::new();
        while let Some(c) = self.current_char() {
            if !self.classifier.classify(c).contains(class) {
                break;
            }
            text.push(c);
            self.step();
        }
        text
    }

    /// Skips interleaved runs of whitespace and comments.
    ///
    /// # Errors
    ///
    /// Fails if input ends inside a comment.
    fn skip_trivia(&mut self) -> Result<(), ReadError> {
        loop {
            match self.current_char().and_then(|c| self.classifier.initial_class(c)) {
                Some(CharClass::Space) => self.read_space(),
                Some(CharClass::CommentDelimiter) => self.read_comment()?,
                _ => return Ok(()),
            }
        }
    }

    fn read_space(&mut self) {
        while self.current_is(CharClass::Space) {
            self.step();
        }
    }

    /// Skips a `"…"` comment. Contents are opaque and comments do not nest.
    fn read_comment(&mut self) -> Result<(), ReadError> {
        let start = self.position;
        self.step();
        while !self.is_at_end() && !self.current_is(CharClass::CommentDelimiter) {
            self.step();
        }
        if self.is_at_end() {
            return Err(ReadError::new(
                ReadErrorKind::UnterminatedComment,
                self.span_from(start),
            ));
        }
        self.step();
        Ok(())
    }

    /// Reads the next term.
    ///
    /// At end of input this returns [`TokenKind::Eof`] and keeps returning
    /// it on every further call without consuming anything.
    ///
    /// # Errors
    ///
    /// Fails with a [`ReadError`] on the first malformed construct.
    pub fn read_term(&mut self) -> Result<Token, ReadError> {
        self.skip_trivia()?;
        let start = self.position;
        let Some(c) = self.current_char() else {
            return Ok(Token::new(TokenKind::Eof, Span::new(start, start)));
        };

        match self.classifier.initial_class(c) {
            Some(CharClass::IdChar) => Ok(self.read_identifier_or_keyword()),
            Some(CharClass::BinarySelector) => Ok(self.read_binary_selector()),
            Some(CharClass::Digit) => self.read_integer(),
            Some(CharClass::StringDelimiter) => self.read_string(),
            Some(CharClass::Delimiter) => {
                self.step();
                Ok(Token::new(TokenKind::Delimiter(c), self.span_from(start)))
            }
            Some(CharClass::Assignment) => self.read_assignment_or_block_argument(),
            Some(CharClass::Opener) => match CompoundShape::from_opener(c) {
                Some(shape) => self.read_compound(shape),
                None => Err(ReadError::unknown_character(c, self.char_span(c))),
            },
            Some(CharClass::Closer) => Err(ReadError::unbalanced_delimiter(c, self.char_span(c))),
            // skip_trivia consumed every space and comment run
            Some(CharClass::Space | CharClass::CommentDelimiter) | None => {
                Err(ReadError::unknown_character(c, self.char_span(c)))
            }
        }
    }

    /// Reads an identifier, or a keyword if a `:` follows directly.
    fn read_identifier_or_keyword(&mut self) -> Token {
        let start = self.position;
        let mut name = self.take_while_class(CharClass::IdChar);
        if self.current_is(CharClass::Assignment) {
            name.push(':');
            self.step();
            Token::new(TokenKind::Keyword(name), self.span_from(start))
        } else {
            Token::new(TokenKind::Identifier(name), self.span_from(start))
        }
    }

    /// Reads a maximal run of binary selector characters.
    fn read_binary_selector(&mut self) -> Token {
        let start = self.position;
        let text = self.take_while_class(CharClass::BinarySelector);
        Token::new(TokenKind::BinarySelector(text), self.span_from(start))
    }

    /// Reads a base-10 integer literal.
    fn read_integer(&mut self) -> Result<Token, ReadError> {
        let start = self.position;
        let digits = self.take_while_class(CharClass::Digit);
        let value: i64 = digits
            .parse()
            .map_err(|_| ReadError::new(ReadErrorKind::InvalidInteger, self.span_from(start)))?;
        Ok(Token::new(TokenKind::Integer(value), self.span_from(start)))
    }

    /// Reads a `'…'` string literal. Contents are taken verbatim; there are
    /// no escape sequences.
    fn read_string(&mut self) -> Result<Token, ReadError> {
        let start = self.position;
        let mut text = EcoString::new();
        self.step();
        loop {
            match self.current_char() {
                None => {
                    return Err(ReadError::new(
                        ReadErrorKind::UnterminatedString,
                        self.span_from(start),
                    ));
                }
                Some(c) if self.classifier.classify(c).contains(CharClass::StringDelimiter) => {
                    self.step();
                    return Ok(Token::new(TokenKind::String(text), self.span_from(start)));
                }
                Some(c) => {
                    text.push(c);
                    self.step();
                }
            }
        }
    }

    /// Reads the constructs introduced by `:` — the `:=` assignment
    /// operator or a `:name` block argument.
    fn read_assignment_or_block_argument(&mut self) -> Result<Token, ReadError> {
        let start = self.position;
        self.step();
        match self.current_char() {
            Some('=') => {
                self.step();
                Ok(Token::new(TokenKind::Assign, self.span_from(start)))
            }
            Some(c) if self.classifier.classify(c).contains(CharClass::IdChar) => {
                let name = self.take_while_class(CharClass::IdChar);
                Ok(Token::new(
                    TokenKind::BlockArgument(name),
                    self.span_from(start),
                ))
            }
            Some(c) => Err(ReadError::unexpected_character(c, self.char_span(c))),
            None => Err(ReadError::unexpected_character(':', self.span_from(start))),
        }
    }

    /// Reads a bracketed group into a single compound token.
    ///
    /// Terms are read recursively until the matching closer; a wrong closer
    /// surfaces as `UnbalancedDelimiter` from the recursive [`Self::read_term`].
    fn read_compound(&mut self, shape: CompoundShape) -> Result<Token, ReadError> {
        let start = self.position;
        self.step();
        let mut inner = Vec::new();
        loop {
            self.skip_trivia()?;
            match self.current_char() {
                None => {
                    return Err(ReadError::unbalanced_delimiter(
                        shape.opener(),
                        self.span_from(start),
                    ));
                }
                Some(c) if c == shape.closer() => {
                    self.step();
                    return Ok(Token::new(
                        TokenKind::Compound(shape, inner),
                        self.span_from(start),
                    ));
                }
                Some(_) => inner.push(self.read_term()?),
            }
        }
    }
}

impl Iterator for Reader {
    type Item = Result<Token, ReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.read_term() {
            Ok(token) if token.kind().is_eof() => {
                self.done = true;
                None
            }
            Ok(token) => Some(Ok(token)),
            Err(error) => {
                self.done = true;
                Some(Err(error))
            }
        }
    }
}

/// Reads all of `source` into a vector of tokens (excluding `Eof`).
///
/// # Errors
///
/// Fails with the first [`ReadError`] in the source.
pub fn read_all(source: &str) -> Result<Vec<Token>, ReadError> {
    Reader::from_source(source).collect()
}
