// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Parsing infrastructure for Onyx source code.
//!
//! This module contains the whole text-to-tree pipeline:
//!
//! character source → [`Stream<char>`](Stream) → [`Reader`] →
//! `Stream<Token>` → [`Parser`] → AST.
//!
//! # Lexical Analysis
//!
//! The [`Reader`] classifies characters with a [`Classifier`] and produces
//! [`Token`]s, reading bracketed groups recursively into single
//! [`TokenKind::Compound`] tokens.
//!
//! ```
//! use onyx_core::parse::{read_all, TokenKind};
//!
//! let tokens = read_all("x := 1").unwrap();
//! assert_eq!(tokens.len(), 3); // x, :=, 1
//! ```
//!
//! # Parsing
//!
//! The entry points [`parse_expression`], [`parse_module`], and
//! [`parse_method_header`] run the [`Parser`] over a source string and
//! require the whole input to be consumed. For other character sources,
//! build the pipeline by hand: `Stream::from_iter` → `Reader::new` →
//! `Parser::new`.
//!
//! # Error Handling
//!
//! There is no error recovery: the first malformed construct aborts with a
//! typed [`ReadError`] or [`ParseError`] carrying the offending span. Both
//! implement [`miette::Diagnostic`] for rendering.

mod classifier;
mod error;
mod parser;
mod reader;
mod span;
mod stream;
mod token;


pub use classifier::{CharClass, ClassSet, Classifier};
pub use error::{ParseError, ParseErrorKind, ReadError, ReadErrorKind};
pub use parser::{parse_expression, parse_method_header, parse_module, Parser};
pub use reader::{read_all, Reader};
pub use span::Span;
pub use stream::{Stream, StreamExhausted};
pub use token::{CompoundShape, Token, TokenKind};
