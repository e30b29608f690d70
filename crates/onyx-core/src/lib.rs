// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Onyx language front end.
//!
//! This crate turns Onyx source text — a small Smalltalk-style,
//! message-passing expression language — into an abstract syntax tree:
//!
//! - Lexical analysis over a lazy, memoizing character stream
//! - Recursive descent parsing of message sends, cascades, assignments,
//!   and blocks
//!
//! There is no evaluator or semantic analysis here; the crate is purely
//! recognition and tree construction. Callers supply a character source
//! and receive an AST node or a structured error.
//!
//! ```
//! use onyx_core::parse::parse_expression;
//! use onyx_core::ast::Expression;
//!
//! let ast = parse_expression("items at: 1 put: 'x'").unwrap();
//! assert!(matches!(ast, Expression::MessageSend { .. }));
//! ```

pub mod ast;
pub mod parse;

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::ast::{Expression, Identifier, Literal, Module};
    pub use crate::parse::Span;
}
