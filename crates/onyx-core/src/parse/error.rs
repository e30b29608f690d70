// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Error types for the Onyx front end.
//!
//! Errors carry source locations ([`Span`]) for precise diagnostics and
//! integrate with [`miette`] for rendering. There is no recovery: the first
//! error aborts the read or parse and unwinds to the caller.

// Spurious warnings from miette derive macro expansion
#![allow(unused_assignments)]

use miette::Diagnostic;
use thiserror::Error;

use super::token::{Token, TokenKind};
use super::Span;

/// A lexical error encountered while reading terms.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("{kind}")]
#[diagnostic()]
pub struct ReadError {
    /// The kind of lexical error.
    #[source]
    pub kind: ReadErrorKind,
    /// The source location of the error.
    #[label("here")]
    pub span: Span,
}

impl ReadError {
    /// Creates a new lexical error.
    #[must_use]
    pub fn new(kind: ReadErrorKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Creates an "unknown character" error.
    #[must_use]
    pub fn unknown_character(c: char, span: Span) -> Self {
        Self::new(ReadErrorKind::UnknownCharacter(c), span)
    }

    /// Creates an "unexpected character" error.
    #[must_use]
    pub fn unexpected_character(c: char, span: Span) -> Self {
        Self::new(ReadErrorKind::UnexpectedCharacter(c), span)
    }

    /// Creates an "unbalanced delimiter" error.
    #[must_use]
    pub fn unbalanced_delimiter(c: char, span: Span) -> Self {
        Self::new(ReadErrorKind::UnbalancedDelimiter(c), span)
    }
}

/// The kind of lexical error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadErrorKind {
    /// A character no classification rule matches.
    #[error("unknown character '{0}'")]
    UnknownCharacter(char),

    /// Input ended inside a `"…"` comment.
    #[error("unterminated comment")]
    UnterminatedComment,

    /// Input ended inside a `'…'` string literal.
    #[error("unterminated string literal")]
    UnterminatedString,

    /// A bracket without a matching partner.
    #[error("unbalanced delimiter '{0}'")]
    UnbalancedDelimiter(char),

    /// A character that cannot follow `:`.
    #[error("unexpected character '{0}'")]
    UnexpectedCharacter(char),

    /// An integer literal too large to represent.
    #[error("integer literal out of range")]
    InvalidInteger,
}

/// A syntax error encountered while parsing a term stream.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("{kind}")]
#[diagnostic()]
pub struct ParseError {
    /// The kind of syntax error.
    #[source]
    pub kind: ParseErrorKind,
    /// The source location of the error.
    #[label("here")]
    pub span: Span,
}

impl ParseError {
    /// Creates a new parse error.
    #[must_use]
    pub fn new(kind: ParseErrorKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Creates an "expected primary" error at the offending token.
    #[must_use]
    pub fn expected_primary(token: &Token) -> Self {
        Self::new(ParseErrorKind::ExpectedPrimary(token.kind().clone()), token.span())
    }

    /// Creates an "unexpected end of input" error.
    #[must_use]
    pub fn unexpected_end_of_input(span: Span) -> Self {
        Self::new(ParseErrorKind::UnexpectedEndOfInput, span)
    }

    /// Creates a "trailing terms" error at the first unconsumed token.
    #[must_use]
    pub fn trailing_terms(token: &Token) -> Self {
        Self::new(ParseErrorKind::TrailingTerms(token.kind().clone()), token.span())
    }

    /// Creates an "expected cascade part" error at the offending token.
    #[must_use]
    pub fn expected_cascade_part(token: &Token) -> Self {
        Self::new(
            ParseErrorKind::ExpectedCascadePart(token.kind().clone()),
            token.span(),
        )
    }

    /// Creates an "invalid method header" error at the offending token.
    #[must_use]
    pub fn invalid_method_header(token: &Token) -> Self {
        Self::new(
            ParseErrorKind::InvalidMethodHeader(token.kind().clone()),
            token.span(),
        )
    }
}

impl From<ReadError> for ParseError {
    fn from(error: ReadError) -> Self {
        Self::new(ParseErrorKind::Read(error.kind), error.span)
    }
}

/// The kind of syntax error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// A lexical error surfaced through the token stream.
    #[error(transparent)]
    Read(ReadErrorKind),

    /// A token that cannot begin a primary expression.
    #[error("expected a primary expression, found {0}")]
    ExpectedPrimary(TokenKind),

    /// Input ended where the grammar required more.
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,

    /// Input continued past a complete parse.
    #[error("expected no more terms, found {0}")]
    TrailingTerms(TokenKind),

    /// A token after `;` that fits no cascade message shape.
    #[error("expected a cascade message, found {0}")]
    ExpectedCascadePart(TokenKind),

    /// A `;` following an expression that is not a message send.
    #[error("cascade requires a message send before ';'")]
    CascadeWithoutSend,

    /// Block parameters not terminated by `|`.
    #[error("expected '|' after block parameters, found {0}")]
    ExpectedBlockSeparator(TokenKind),

    /// A method header that is not a unary, binary, or keyword pattern.
    #[error("expected an identifier, binary selector, or keyword, found {0}")]
    InvalidMethodHeader(TokenKind),

    /// A token used where an identifier is required.
    #[error("expected an identifier, found {0}")]
    NotAnIdentifier(TokenKind),
}
