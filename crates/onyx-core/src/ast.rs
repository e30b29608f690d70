// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Abstract Syntax Tree (AST) definitions for Onyx.
//!
//! The AST represents the structure of an Onyx program after parsing.
//! Every node carries a [`Span`] for error reporting, nodes are immutable
//! once built, and ownership is a plain tree: a node's only owner is its
//! parent (or the caller, for the root).
//!
//! # Message Sending
//!
//! Onyx follows Smalltalk's message precedence:
//!
//! 1. **Unary messages**: `object message` (highest precedence)
//! 2. **Binary messages**: `3 + 4` (no ranking among selectors,
//!    strictly left-to-right)
//! 3. **Keyword messages**: `array at: 1 put: 'x'` (lowest precedence)
//!
//! A multi-part keyword message is one send: `at: 1 put: 'x'` has the
//! single selector `at:put:` and two arguments.
//!
//! # Example
//!
//! ```ignore
//! // Source: x := a + 4
//! Expression::Assignment {
//!     target: Identifier { name: "x".into(), span: ... },
//!     value: Box::new(Expression::MessageSend {
//!         receiver: Box::new(Expression::Identifier(...)),   // a
//!         selector: MessageSelector::Binary("+".into()),
//!         arguments: vec![Expression::Literal(Literal::Integer(4), ...)],
//!         span: ...
//!     }),
//!     span: ...
//! }
//! ```

use ecow::EcoString;

use crate::parse::Span;

/// Executable code: a temporary-variable declaration and a statement
/// sequence.
///
/// This is the result of parsing a top-level program; a block body has the
/// same shape inside [`Block`].
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    /// Temporaries declared at the top of the program (`| a b |`).
    pub temporaries: Vec<Identifier>,
    /// The statements, in order.
    pub statements: Vec<Expression>,
    /// Source location spanning the whole program.
    pub span: Span,
}

impl Module {
    /// Creates a new module.
    #[must_use]
    pub fn new(temporaries: Vec<Identifier>, statements: Vec<Expression>, span: Span) -> Self {
        Self {
            temporaries,
            statements,
            span,
        }
    }
}

/// An Onyx expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// A literal value.
    Literal(Literal, Span),

    /// A variable reference.
    Identifier(Identifier),

    /// A message send.
    MessageSend {
        /// The receiver of the message.
        receiver: Box<Expression>,
        /// The message selector.
        selector: MessageSelector,
        /// Arguments, one per selector arity slot.
        arguments: Vec<Expression>,
        /// Source location of the entire send.
        span: Span,
    },

    /// A cascade: several messages to one shared receiver.
    ///
    /// Syntax: `receiver message1; message2; message3`. Every element of
    /// `messages` — including the first — targets `receiver`; the messages
    /// themselves carry no receiver of their own.
    Cascade {
        /// The shared receiver (evaluated once).
        receiver: Box<Expression>,
        /// The messages, in send order. Always at least two.
        messages: Vec<CascadeMessage>,
        /// Source location of the entire cascade.
        span: Span,
    },

    /// An assignment: `name := value`.
    Assignment {
        /// The variable being assigned.
        target: Identifier,
        /// The value expression.
        value: Box<Expression>,
        /// Source location of the entire assignment.
        span: Span,
    },

    /// A block.
    Block(Block),
}

impl Expression {
    /// Returns the span of this expression.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Literal(_, span)
            | Self::MessageSend { span, .. }
            | Self::Cascade { span, .. }
            | Self::Assignment { span, .. } => *span,
            Self::Identifier(id) => id.span,
            Self::Block(block) => block.span,
        }
    }
}

/// A literal value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    /// An integer literal: `42`
    Integer(i64),

    /// A string literal: `'hello'` (verbatim, no escapes)
    String(EcoString),
}

/// A variable name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    /// The name of the identifier.
    pub name: EcoString,
    /// Source location.
    pub span: Span,
}

impl Identifier {
    /// Creates a new identifier.
    #[must_use]
    pub fn new(name: impl Into<EcoString>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

/// A message selector.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MessageSelector {
    /// A unary message (no arguments): `size`
    Unary(EcoString),

    /// A binary message (one argument): `+`
    Binary(EcoString),

    /// A keyword message, stored as the combined selector: `at:put:`
    Keyword(EcoString),
}

impl MessageSelector {
    /// Returns the selector name.
    #[must_use]
    pub fn name(&self) -> &EcoString {
        match self {
            Self::Unary(name) | Self::Binary(name) | Self::Keyword(name) => name,
        }
    }

    /// Returns the number of arguments this selector expects.
    #[must_use]
    pub fn arity(&self) -> usize {
        match self {
            Self::Unary(_) => 0,
            Self::Binary(_) => 1,
            Self::Keyword(parts) => parts.matches(':').count(),
        }
    }
}

/// One message in a cascade.
///
/// Cascade messages have no receiver field: they all implicitly target the
/// shared receiver of the enclosing [`Expression::Cascade`].
#[derive(Debug, Clone, PartialEq)]
pub struct CascadeMessage {
    /// The message selector.
    pub selector: MessageSelector,
    /// Arguments to the message.
    pub arguments: Vec<Expression>,
    /// Source location of this message in the cascade.
    pub span: Span,
}

impl CascadeMessage {
    /// Creates a new cascade message.
    #[must_use]
    pub fn new(selector: MessageSelector, arguments: Vec<Expression>, span: Span) -> Self {
        Self {
            selector,
            arguments,
            span,
        }
    }
}

/// A block: a deferred statement sequence with its own parameters and
/// temporaries.
///
/// Example: `[:x :y | | sum | sum := x + y. sum]`
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// Block parameters, in declaration order.
    pub parameters: Vec<Identifier>,
    /// Temporaries declared in the block (`| a b |`), in order.
    pub temporaries: Vec<Identifier>,
    /// The statements of the block body.
    pub body: Vec<Expression>,
    /// Source location of the entire block (including brackets).
    pub span: Span,
}

impl Block {
    /// Creates a new block.
    #[must_use]
    pub fn new(
        parameters: Vec<Identifier>,
        temporaries: Vec<Identifier>,
        body: Vec<Expression>,
        span: Span,
    ) -> Self {
        Self {
            parameters,
            temporaries,
            body,
            span,
        }
    }

    /// Returns the number of parameters.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.parameters.len()
    }
}

/// A parsed method header.
///
/// Unary headers take no parameters, binary headers exactly one, keyword
/// headers one per keyword part; `parameters.len() == selector.arity()`
/// always holds.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodHeader {
    /// The method selector.
    pub selector: MessageSelector,
    /// Parameter names, one per arity slot.
    pub parameters: Vec<Identifier>,
    /// Source location of the header.
    pub span: Span,
}

impl MethodHeader {
    /// Creates a new method header.
    #[must_use]
    pub fn new(selector: MessageSelector, parameters: Vec<Identifier>, span: Span) -> Self {
        Self {
            selector,
            parameters,
            span,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_creation() {
        let id = Identifier::new("total", Span::new(0, 5));
        assert_eq!(id.name, "total");
        assert_eq!(id.span, Span::new(0, 5));
    }

    #[test]
    fn selector_arity() {
        assert_eq!(MessageSelector::Unary("size".into()).arity(), 0);
        assert_eq!(MessageSelector::Binary("+".into()).arity(), 1);
        assert_eq!(MessageSelector::Keyword("at:".into()).arity(), 1);
        assert_eq!(MessageSelector::Keyword("at:put:".into()).arity(), 2);
    }

    #[test]
    fn selector_name() {
        assert_eq!(MessageSelector::Keyword("at:put:".into()).name(), "at:put:");
        assert_eq!(MessageSelector::Binary("~~".into()).name(), "~~");
    }

    #[test]
    fn expression_span() {
        let span = Span::new(2, 4);
        assert_eq!(Expression::Literal(Literal::Integer(7), span).span(), span);
        assert_eq!(
            Expression::Identifier(Identifier::new("x", span)).span(),
            span
        );
        let block = Block::new(Vec::new(), Vec::new(), Vec::new(), span);
        assert_eq!(Expression::Block(block).span(), span);
    }

    #[test]
    fn block_arity() {
        let block = Block::new(
            vec![
                Identifier::new("x", Span::new(1, 3)),
                Identifier::new("y", Span::new(4, 6)),
            ],
            Vec::new(),
            Vec::new(),
            Span::new(0, 10),
        );
        assert_eq!(block.arity(), 2);
    }
}
