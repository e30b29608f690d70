// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Token types produced by the reader.
//!
//! Onyx tokens cover the full message-send syntax:
//! - Unary messages: `object message`
//! - Binary messages: `3 + 4`
//! - Keyword messages: `array at: 1 put: value`
//! - Blocks: `[:x | x + 1]`
//! - Cascades: `stream nextPut: 'a'; nextPut: 'b'`
//!
//! Bracketed groups are matched by the reader, not the parser: a whole
//! `( … )`, `[ … ]`, or `{ … }` group arrives as one [`TokenKind::Compound`]
//! token carrying its fully-read inner token sequence. Tokens are cheap to
//! clone ([`EcoString`] for string data).

use ecow::EcoString;

use super::error::{ParseError, ParseErrorKind};
use super::Span;
use crate::ast::Identifier;

/// The kind of token, not including source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// An identifier: `foo`, `x1`, `mutate!`, `really?`
    Identifier(EcoString),

    /// A keyword selector part, trailing colon included: `at:`, `put:`
    Keyword(EcoString),

    /// A binary selector: `+`, `*`, `<=`, `~~`
    BinarySelector(EcoString),

    /// A base-10 integer literal: `42`
    Integer(i64),

    /// A single-quoted string literal, taken verbatim (no escapes)
    String(EcoString),

    /// One of the reserved delimiters `.` `;` `^`
    Delimiter(char),

    /// The assignment operator `:=`
    Assign,

    /// A block argument declaration: `:x`
    BlockArgument(EcoString),

    /// A bracketed group and the tokens read inside it
    Compound(CompoundShape, Vec<Token>),

    /// End of input
    Eof,
}

impl TokenKind {
    /// Returns `true` if this token is an identifier.
    #[must_use]
    pub const fn is_identifier(&self) -> bool {
        matches!(self, Self::Identifier(_))
    }

    /// Returns `true` if this token is a keyword selector part.
    #[must_use]
    pub const fn is_keyword(&self) -> bool {
        matches!(self, Self::Keyword(_))
    }

    /// Returns `true` if this token is a binary selector.
    #[must_use]
    pub const fn is_binary_selector(&self) -> bool {
        matches!(self, Self::BinarySelector(_))
    }

    /// Returns `true` if this token is the given reserved delimiter.
    #[must_use]
    pub fn is_delimiter(&self, delimiter: char) -> bool {
        matches!(self, Self::Delimiter(c) if *c == delimiter)
    }

    /// Returns `true` if this token is the binary selector with exactly
    /// the given text.
    #[must_use]
    pub fn is_selector_text(&self, text: &str) -> bool {
        matches!(self, Self::BinarySelector(s) if s == text)
    }

    /// Returns `true` if this is the end-of-input marker.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self, Self::Eof)
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Identifier(s) | Self::Keyword(s) | Self::BinarySelector(s) => write!(f, "{s}"),
            Self::Integer(value) => write!(f, "{value}"),
            Self::String(s) => write!(f, "'{s}'"),
            Self::Delimiter(c) => write!(f, "{c}"),
            Self::Assign => write!(f, ":="),
            Self::BlockArgument(s) => write!(f, ":{s}"),
            Self::Compound(shape, tokens) => {
                write!(f, "{}", shape.opener())?;
                for (i, token) in tokens.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", token.kind())?;
                }
                write!(f, "{}", shape.closer())
            }
            Self::Eof => write!(f, "<eof>"),
        }
    }
}

/// The bracket pair a compound token was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompoundShape {
    /// `( … )`
    Parens,
    /// `[ … ]`
    Brackets,
    /// `{ … }`
    Braces,
}

impl CompoundShape {
    /// Returns the shape opened by `c`, if any.
    #[must_use]
    pub const fn from_opener(c: char) -> Option<Self> {
        match c {
            '(' => Some(Self::Parens),
            '[' => Some(Self::Brackets),
            '{' => Some(Self::Braces),
            _ => None,
        }
    }

    /// The opening bracket character.
    #[must_use]
    pub const fn opener(self) -> char {
        match self {
            Self::Parens => '(',
            Self::Brackets => '[',
            Self::Braces => '{',
        }
    }

    /// The closing bracket character.
    #[must_use]
    pub const fn closer(self) -> char {
        match self {
            Self::Parens => ')',
            Self::Brackets => ']',
            Self::Braces => '}',
        }
    }
}

/// A token with its source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    kind: TokenKind,
    span: Span,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns the kind of this token.
    #[must_use]
    pub fn kind(&self) -> &TokenKind {
        &self.kind
    }

    /// Consumes the token and returns its kind.
    #[must_use]
    pub fn into_kind(self) -> TokenKind {
        self.kind
    }

    /// Returns the source span of this token.
    #[must_use]
    pub fn span(&self) -> Span {
        self.span
    }

    /// Converts this token into an [`Identifier`] AST node.
    ///
    /// Only identifier and block-argument tokens name things; every other
    /// token kind is rejected.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseErrorKind::NotAnIdentifier`] error for any other
    /// token kind.
    pub fn to_identifier(&self) -> Result<Identifier, ParseError> {
        match &self.kind {
            TokenKind::Identifier(name) | TokenKind::BlockArgument(name) => {
                Ok(Identifier::new(name.clone(), self.span))
            }
            other => Err(ParseError::new(
                ParseErrorKind::NotAnIdentifier(other.clone()),
                self.span,
            )),
        }
    }
}
