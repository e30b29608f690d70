// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Recursive descent parser for Onyx source code.
//!
//! The parser consumes a memoizing [`Stream`] of tokens — sourced from a
//! [`Reader`], or from the materialized contents of a compound token — and
//! builds [`Expression`] trees. Lexing happens lazily as the parser pulls
//! tokens; a lexical error surfaces through the stream at the position where
//! it occurs.
//!
//! # Message Precedence
//!
//! Onyx has Smalltalk's three precedence tiers and nothing finer:
//!
//! 1. **Unary messages**: `object message` (highest precedence)
//! 2. **Binary messages**: `3 + 4`, strictly left-to-right — there is no
//!    ranking among binary selectors, so `a + b * c` is `(a + b) * c`
//! 3. **Keyword messages**: `array at: 1 put: 'x'` (lowest precedence);
//!    a multi-part message is one send with one combined selector
//!
//! Above the message tiers sit cascades (`;`), assignment (`:=`,
//! right-associative), and `.`-separated statement sequences.
//!
//! Every decision uses one token of lookahead, except assignment detection
//! which peeks two tokens ahead without consuming either. The first error
//! aborts the parse; there is no recovery and no partial result.
//!
//! # Sub-parsing
//!
//! A compound token's inner tokens are parsed by a fresh `Parser` over a
//! fresh stream. The sub-parser must consume its whole stream; leftover
//! terms are a [`ParseErrorKind::TrailingTerms`] error.
//!
//! # Usage
//!
//! ```
//! use onyx_core::parse::parse_expression;
//!
//! let ast = parse_expression("items at: 1 put: 'x'").unwrap();
//! ```

use ecow::EcoString;

use crate::ast::{
    Block, CascadeMessage, Expression, Identifier, Literal, MessageSelector, MethodHeader, Module,
};
use super::error::{ParseError, ParseErrorKind, ReadError};
use super::reader::Reader;
use super::stream::Stream;
use super::token::{CompoundShape, Token, TokenKind};
use super::Span;

/// The parser state: a position in a token stream.
///
/// A parser holds no state beyond its cursor. Each compound sub-term is
/// parsed by an independent `Parser` with no reference back to the
/// enclosing parse.
pub struct Parser {
    /// Current position in the token stream.
    stream: Stream<Result<Token, ReadError>>,
    /// Span of the last consumed token, for end-of-input reporting.
    last_span: Span,
}

impl Parser {
    /// Creates a parser over the tokens produced by `reader`.
    #[must_use]
    pub fn new(reader: Reader) -> Self {
        Self {
            stream: Stream::from_iter(reader),
            last_span: Span::default(),
        }
    }

    /// Creates a parser over already-materialized tokens, as when parsing
    /// the contents of a compound token.
    #[must_use]
    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        Self {
            stream: Stream::from_iter(tokens.into_iter().map(Ok)),
            last_span: Span::default(),
        }
    }

    // ========================================================================
    // Token Management
    // ========================================================================

    /// Returns the current token without consuming it, or `None` at end of
    /// input.
    ///
    /// # Errors
    ///
    /// Fails if the reader hit a lexical error at this position.
    fn peek(&self) -> Result<Option<Token>, ParseError> {
        match self.stream.head() {
            Ok(Ok(token)) => Ok(Some(token)),
            Ok(Err(error)) => Err(error.into()),
            Err(_) => Ok(None),
        }
    }

    /// Returns the token after the current one without consuming anything.
    ///
    /// This is the two-token lookahead used only for assignment detection.
    ///
    /// # Errors
    ///
    /// Fails if the reader hit a lexical error at that position.
    fn peek_second(&self) -> Result<Option<Token>, ParseError> {
        let Ok(tail) = self.stream.tail() else {
            return Ok(None);
        };
        match tail.head() {
            Ok(Ok(token)) => Ok(Some(token)),
            Ok(Err(error)) => Err(error.into()),
            Err(_) => Ok(None),
        }
    }

    /// Advances past the current token.
    fn step(&mut self) {
        if let Ok(Ok(token)) = self.stream.head() {
            self.last_span = token.span();
        }
        if let Ok(tail) = self.stream.tail() {
            self.stream = tail;
        }
    }

    /// Asserts that every token has been consumed.
    ///
    /// # Errors
    ///
    /// Fails with [`ParseErrorKind::TrailingTerms`] at the first leftover
    /// token.
    pub fn assert_at_end(&self) -> Result<(), ParseError> {
        match self.peek()? {
            None => Ok(()),
            Some(token) => Err(ParseError::trailing_terms(&token)),
        }
    }

    /// Builds an end-of-input error just past the last consumed token.
    fn end_of_input_error(&self) -> ParseError {
        let end = self.last_span.end();
        ParseError::unexpected_end_of_input(Span::new(end, end))
    }

    // ========================================================================
    // Grammar Rules
    // ========================================================================

    /// Parses a primary expression and any trailing unary sends.
    ///
    /// A primary is an identifier, a literal, a parenthesized expression
    /// (transparent grouping, never a node of its own), or a block. A chain
    /// of identifiers after the primary folds into left-associative unary
    /// sends: `a b c` is `(a b) c`.
    ///
    /// # Errors
    ///
    /// Fails with [`ParseErrorKind::ExpectedPrimary`] on any other token,
    /// or [`ParseErrorKind::UnexpectedEndOfInput`] if the stream is out of
    /// tokens.
    pub fn parse_primary(&mut self) -> Result<Expression, ParseError> {
        let Some(token) = self.peek()? else {
            return Err(self.end_of_input_error());
        };

        let mut term = match token.kind() {
            TokenKind::Identifier(name) => {
                let expr = Expression::Identifier(Identifier::new(name.clone(), token.span()));
                self.step();
                expr
            }
            TokenKind::Integer(value) => {
                let expr = Expression::Literal(Literal::Integer(*value), token.span());
                self.step();
                expr
            }
            TokenKind::String(text) => {
                let expr = Expression::Literal(Literal::String(text.clone()), token.span());
                self.step();
                expr
            }
            TokenKind::Compound(CompoundShape::Parens, inner) => {
                let mut sub = Self::from_tokens(inner.clone());
                let expr = sub.parse_expression()?;
                sub.assert_at_end()?;
                self.step();
                expr
            }
            TokenKind::Compound(CompoundShape::Brackets, inner) => {
                let block = Self::parse_block(inner.clone(), token.span())?;
                self.step();
                Expression::Block(block)
            }
            _ => return Err(ParseError::expected_primary(&token)),
        };

        // fold a trailing identifier chain into unary sends
        while let Some(next) = self.peek()? {
            let TokenKind::Identifier(name) = next.kind() else {
                break;
            };
            let span = term.span().merge(next.span());
            term = Expression::MessageSend {
                receiver: Box::new(term),
                selector: MessageSelector::Unary(name.clone()),
                arguments: Vec::new(),
                span,
            };
            self.step();
        }
        Ok(term)
    }

    /// Parses the contents of a `[ … ]` compound into a block.
    ///
    /// Shape: block arguments, a `|` closing a non-empty argument list, an
    /// optional temporaries declaration (`| names |`, or the single `||`
    /// token for the empty form), then executable code.
    fn parse_block(inner: Vec<Token>, span: Span) -> Result<Block, ParseError> {
        let mut parser = Self::from_tokens(inner);

        let mut parameters = Vec::new();
        while let Some(token) = parser.peek()? {
            let TokenKind::BlockArgument(name) = token.kind() else {
                break;
            };
            parameters.push(Identifier::new(name.clone(), token.span()));
            parser.step();
        }

        if !parameters.is_empty() {
            match parser.peek()? {
                Some(token) if token.kind().is_selector_text("|") => parser.step(),
                Some(token) => {
                    return Err(ParseError::new(
                        ParseErrorKind::ExpectedBlockSeparator(token.kind().clone()),
                        token.span(),
                    ));
                }
                None => return Err(parser.end_of_input_error()),
            }
        }

        let (temporaries, body) = parser.parse_executable_code()?;
        parser.assert_at_end()?;
        Ok(Block::new(parameters, temporaries, body, span))
    }

    /// Parses a chain of binary sends.
    ///
    /// All binary selectors have equal precedence and associate strictly
    /// left-to-right: `a + b * c` is `(a + b) * c`.
    ///
    /// # Errors
    ///
    /// Fails if an operand is missing or malformed.
    pub fn parse_binary(&mut self) -> Result<Expression, ParseError> {
        let mut term = self.parse_primary()?;
        while let Some(token) = self.peek()? {
            let TokenKind::BinarySelector(selector) = token.kind() else {
                break;
            };
            let selector = selector.clone();
            self.step();
            let argument = self.parse_primary()?;
            let span = term.span().merge(argument.span());
            term = Expression::MessageSend {
                receiver: Box::new(term),
                selector: MessageSelector::Binary(selector),
                arguments: vec![argument],
                span,
            };
        }
        Ok(term)
    }

    /// Parses a keyword send.
    ///
    /// All consecutive keyword parts belong to one message: `a at: i put: v`
    /// is a single send with selector `at:put:` and two arguments, each a
    /// binary-tier expression.
    ///
    /// # Errors
    ///
    /// Fails if a keyword part's argument is missing or malformed.
    pub fn parse_keyword(&mut self) -> Result<Expression, ParseError> {
        let receiver = self.parse_binary()?;
        let Some(message) = self.parse_keyword_message()? else {
            return Ok(receiver);
        };
        let span = receiver.span().merge(message.span);
        Ok(Expression::MessageSend {
            receiver: Box::new(receiver),
            selector: message.selector,
            arguments: message.arguments,
            span,
        })
    }

    /// Parses zero or more keyword parts with their arguments into one
    /// combined message. Shared by keyword sends and keyword cascade parts.
    fn parse_keyword_message(&mut self) -> Result<Option<CascadeMessage>, ParseError> {
        let mut selector = EcoString::new();
        let mut arguments = Vec::new();
        let mut span: Option<Span> = None;

        while let Some(token) = self.peek()? {
            let TokenKind::Keyword(part) = token.kind() else {
                break;
            };
            selector.push_str(part);
            let part_span = token.span();
            self.step();
            let argument = self.parse_binary()?;
            let covered = span.map_or(part_span, |s| s.merge(part_span));
            span = Some(covered.merge(argument.span()));
            arguments.push(argument);
        }

        let Some(span) = span else {
            return Ok(None);
        };
        Ok(Some(CascadeMessage::new(
            MessageSelector::Keyword(selector),
            arguments,
            span,
        )))
    }

    /// Parses a cascade: a send followed by `;`-separated extra messages,
    /// all to the send's receiver.
    ///
    /// The first send is split into the shared receiver and its message, so
    /// the cascade node holds the receiver once and a uniform message list:
    /// `r foo; bar` becomes `Cascade(r, [foo, bar])`.
    ///
    /// # Errors
    ///
    /// Fails with [`ParseErrorKind::CascadeWithoutSend`] if the expression
    /// before `;` is not a message send, or
    /// [`ParseErrorKind::ExpectedCascadePart`] if a `;` is not followed by a
    /// unary, binary, or keyword message.
    pub fn parse_cascade(&mut self) -> Result<Expression, ParseError> {
        let first = self.parse_keyword()?;

        let mut rest = Vec::new();
        while let Some(token) = self.peek()? {
            if !token.kind().is_delimiter(';') {
                break;
            }
            self.step();
            rest.push(self.parse_cascade_message()?);
        }
        if rest.is_empty() {
            return Ok(first);
        }

        let first_span = first.span();
        let Expression::MessageSend {
            receiver,
            selector,
            arguments,
            span,
        } = first
        else {
            return Err(ParseError::new(
                ParseErrorKind::CascadeWithoutSend,
                first_span,
            ));
        };

        let mut messages = Vec::with_capacity(rest.len() + 1);
        messages.push(CascadeMessage::new(selector, arguments, span));
        messages.extend(rest);
        let last_span = messages.last().map_or(span, |m| m.span);
        Ok(Expression::Cascade {
            span: receiver.span().merge(last_span),
            receiver,
            messages,
        })
    }

    /// Parses one message after a `;` — a bare identifier (unary), a binary
    /// selector with a primary argument, or keyword parts with arguments.
    fn parse_cascade_message(&mut self) -> Result<CascadeMessage, ParseError> {
        let Some(token) = self.peek()? else {
            return Err(self.end_of_input_error());
        };
        match token.kind() {
            TokenKind::Identifier(name) => {
                let message = CascadeMessage::new(
                    MessageSelector::Unary(name.clone()),
                    Vec::new(),
                    token.span(),
                );
                self.step();
                Ok(message)
            }
            TokenKind::BinarySelector(selector) => {
                let selector = selector.clone();
                self.step();
                let argument = self.parse_primary()?;
                let span = token.span().merge(argument.span());
                Ok(CascadeMessage::new(
                    MessageSelector::Binary(selector),
                    vec![argument],
                    span,
                ))
            }
            TokenKind::Keyword(_) => match self.parse_keyword_message()? {
                Some(message) => Ok(message),
                None => Err(ParseError::expected_cascade_part(&token)),
            },
            _ => Err(ParseError::expected_cascade_part(&token)),
        }
    }

    /// Parses an expression: an assignment or a cascade.
    ///
    /// Assignment is detected by peeking two tokens — an identifier followed
    /// by `:=` — without consuming either. The right-hand side is itself an
    /// expression, so chained assignment is right-associative:
    /// `a := b := c` is `a := (b := c)`.
    ///
    /// # Errors
    ///
    /// Fails if the expression is malformed.
    pub fn parse_expression(&mut self) -> Result<Expression, ParseError> {
        if let Some(token) = self.peek()? {
            if let TokenKind::Identifier(name) = token.kind() {
                let assign_follows = matches!(
                    self.peek_second()?.as_ref().map(Token::kind),
                    Some(TokenKind::Assign)
                );
                if assign_follows {
                    let target = Identifier::new(name.clone(), token.span());
                    self.step();
                    self.step();
                    let value = self.parse_expression()?;
                    let span = token.span().merge(value.span());
                    return Ok(Expression::Assignment {
                        target,
                        value: Box::new(value),
                        span,
                    });
                }
            }
        }
        self.parse_cascade()
    }

    /// Parses a statement. Statements are just expressions; there are no
    /// separate statement forms.
    ///
    /// # Errors
    ///
    /// Fails if the expression is malformed.
    pub fn parse_statement(&mut self) -> Result<Expression, ParseError> {
        self.parse_expression()
    }

    /// Parses executable code: an optional temporaries declaration followed
    /// by `.`-separated statements.
    ///
    /// A trailing `.` is allowed, and an empty statement list is legal.
    /// Used for block bodies and top-level programs.
    ///
    /// # Errors
    ///
    /// Fails if a declaration or statement is malformed.
    pub fn parse_executable_code(
        &mut self,
    ) -> Result<(Vec<Identifier>, Vec<Expression>), ParseError> {
        let temporaries = self.parse_temporaries()?;
        let mut statements = Vec::new();
        loop {
            if self.peek()?.is_none() {
                break;
            }
            statements.push(self.parse_statement()?);
            match self.peek()? {
                Some(token) if token.kind().is_delimiter('.') => self.step(),
                _ => break,
            }
        }
        Ok((temporaries, statements))
    }

    /// Parses an optional temporaries declaration: `| names |`, or the
    /// empty form `||` (which lexes as a single selector token).
    fn parse_temporaries(&mut self) -> Result<Vec<Identifier>, ParseError> {
        let Some(token) = self.peek()? else {
            return Ok(Vec::new());
        };
        if token.kind().is_selector_text("||") {
            self.step();
            return Ok(Vec::new());
        }
        if !token.kind().is_selector_text("|") {
            return Ok(Vec::new());
        }
        self.step();

        let mut names = Vec::new();
        loop {
            match self.peek()? {
                None => return Err(self.end_of_input_error()),
                Some(token) if token.kind().is_selector_text("|") => {
                    self.step();
                    return Ok(names);
                }
                Some(token) => {
                    names.push(token.to_identifier()?);
                    self.step();
                }
            }
        }
    }

    /// Parses an identifier token into an [`Identifier`] node.
    ///
    /// # Errors
    ///
    /// Fails with [`ParseErrorKind::NotAnIdentifier`] if the current token
    /// does not name anything.
    pub fn parse_identifier(&mut self) -> Result<Identifier, ParseError> {
        let Some(token) = self.peek()? else {
            return Err(self.end_of_input_error());
        };
        let identifier = token.to_identifier()?;
        self.step();
        Ok(identifier)
    }

    /// Parses a method header: a bare identifier (unary), a binary selector
    /// with one parameter, or keyword parts each with a parameter.
    ///
    /// # Errors
    ///
    /// Fails with [`ParseErrorKind::InvalidMethodHeader`] on any other
    /// shape.
    pub fn parse_method_header(&mut self) -> Result<MethodHeader, ParseError> {
        let Some(token) = self.peek()? else {
            return Err(self.end_of_input_error());
        };
        match token.kind() {
            TokenKind::Identifier(name) => {
                let header = MethodHeader::new(
                    MessageSelector::Unary(name.clone()),
                    Vec::new(),
                    token.span(),
                );
                self.step();
                Ok(header)
            }
            TokenKind::BinarySelector(selector) => {
                let selector = selector.clone();
                self.step();
                let parameter = self.parse_identifier()?;
                let span = token.span().merge(parameter.span);
                Ok(MethodHeader::new(
                    MessageSelector::Binary(selector),
                    vec![parameter],
                    span,
                ))
            }
            TokenKind::Keyword(_) => {
                let mut selector = EcoString::new();
                let mut parameters = Vec::new();
                let mut span = token.span();
                while let Some(part) = self.peek()? {
                    let TokenKind::Keyword(text) = part.kind() else {
                        break;
                    };
                    selector.push_str(text);
                    span = span.merge(part.span());
                    self.step();
                    let parameter = self.parse_identifier()?;
                    span = span.merge(parameter.span);
                    parameters.push(parameter);
                }
                Ok(MethodHeader::new(
                    MessageSelector::Keyword(selector),
                    parameters,
                    span,
                ))
            }
            _ => Err(ParseError::invalid_method_header(&token)),
        }
    }
}

// ============================================================================
// Entry Points
// ============================================================================

/// Parses `source` as a single expression.
///
/// The whole input must be consumed.
///
/// # Errors
///
/// Fails with the first [`ParseError`] (lexical errors included).
pub fn parse_expression(source: &str) -> Result<Expression, ParseError> {
    let mut parser = Parser::new(Reader::from_source(source));
    let expression = parser.parse_expression()?;
    parser.assert_at_end()?;
    Ok(expression)
}

/// Parses `source` as a top-level program: an optional temporaries
/// declaration and a `.`-separated statement sequence.
///
/// # Errors
///
/// Fails with the first [`ParseError`] (lexical errors included).
pub fn parse_module(source: &str) -> Result<Module, ParseError> {
    let mut parser = Parser::new(Reader::from_source(source));
    let (temporaries, statements) = parser.parse_executable_code()?;
    parser.assert_at_end()?;
    let span = temporaries
        .iter()
        .map(|t| t.span)
        .chain(statements.iter().map(Expression::span))
        .reduce(Span::merge)
        .unwrap_or_default();
    Ok(Module::new(temporaries, statements, span))
}

/// Parses `source` as a method header.
///
/// The whole input must be consumed.
///
/// # Errors
///
/// Fails with the first [`ParseError`] (lexical errors included).
pub fn parse_method_header(source: &str) -> Result<MethodHeader, ParseError> {
    let mut parser = Parser::new(Reader::from_source(source));
    let header = parser.parse_method_header()?;
    parser.assert_at_end()?;
    Ok(header)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::ReadErrorKind;

    fn expr(source: &str) -> Expression {
        parse_expression(source).unwrap()
    }

    fn expr_err(source: &str) -> ParseErrorKind {
        parse_expression(source).unwrap_err().kind
    }

    /// Runs one named grammar rule over the full token stream of `source`.
    fn parse_with(
        source: &str,
        rule: impl FnOnce(&mut Parser) -> Result<Expression, ParseError>,
    ) -> Expression {
        let mut parser = Parser::new(Reader::from_source(source));
        let term = rule(&mut parser).unwrap();
        parser.assert_at_end().unwrap();
        term
    }

    #[test]
    fn primary_identifier() {
        let term = parse_with("name", Parser::parse_primary);
        assert!(matches!(term, Expression::Identifier(ref id) if id.name == "name"));
    }

    #[test]
    fn primary_literals() {
        assert!(matches!(
            parse_with("42", Parser::parse_primary),
            Expression::Literal(Literal::Integer(42), _)
        ));
        assert!(matches!(
            parse_with("'hi'", Parser::parse_primary),
            Expression::Literal(Literal::String(ref s), _) if s == "hi"
        ));
    }

    #[test]
    fn unary_chain_is_left_associative() {
        // a b c  =>  (a b) c
        let term = expr("a b c");
        let Expression::MessageSend {
            receiver, selector, arguments, ..
        } = term
        else {
            panic!("expected message send");
        };
        assert_eq!(selector, MessageSelector::Unary("c".into()));
        assert!(arguments.is_empty());

        let Expression::MessageSend { receiver, selector, .. } = *receiver else {
            panic!("expected inner send");
        };
        assert_eq!(selector, MessageSelector::Unary("b".into()));
        assert!(matches!(*receiver, Expression::Identifier(ref id) if id.name == "a"));
    }

    #[test]
    fn unary_chain_same_at_every_tier() {
        let as_primary = parse_with("a b c", Parser::parse_primary);
        let as_binary = parse_with("a b c", Parser::parse_binary);
        let as_keyword = parse_with("a b c", Parser::parse_keyword);
        assert_eq!(as_primary, as_binary);
        assert_eq!(as_binary, as_keyword);
    }

    #[test]
    fn binary_has_no_precedence() {
        // a + b * c  =>  (a + b) * c
        let term = parse_with("a + b * c", Parser::parse_binary);
        let Expression::MessageSend { receiver, selector, arguments, .. } = term else {
            panic!("expected message send");
        };
        assert_eq!(selector, MessageSelector::Binary("*".into()));
        assert_eq!(arguments.len(), 1);
        assert!(matches!(arguments[0], Expression::Identifier(ref id) if id.name == "c"));

        let Expression::MessageSend { selector, .. } = *receiver else {
            panic!("expected inner send");
        };
        assert_eq!(selector, MessageSelector::Binary("+".into()));
    }

    #[test]
    fn keyword_parts_combine_into_one_send() {
        // a foo: b bar: c is a single two-argument send, not two sends
        let term = expr("a foo: b bar: c");
        let Expression::MessageSend { receiver, selector, arguments, .. } = term else {
            panic!("expected message send");
        };
        assert_eq!(selector, MessageSelector::Keyword("foo:bar:".into()));
        assert_eq!(arguments.len(), 2);
        assert!(matches!(*receiver, Expression::Identifier(ref id) if id.name == "a"));
    }

    #[test]
    fn keyword_arguments_are_binary_tier() {
        let term = expr("a foo: b + c");
        let Expression::MessageSend { selector, arguments, .. } = term else {
            panic!("expected message send");
        };
        assert_eq!(selector, MessageSelector::Keyword("foo:".into()));
        assert!(matches!(
            arguments[0],
            Expression::MessageSend { ref selector, .. }
                if *selector == MessageSelector::Binary("+".into())
        ));
    }

    #[test]
    fn cascade_shares_the_receiver() {
        let term = expr("r foo; bar: x; baz");
        let Expression::Cascade { receiver, messages, .. } = term else {
            panic!("expected cascade");
        };
        assert!(matches!(*receiver, Expression::Identifier(ref id) if id.name == "r"));
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].selector, MessageSelector::Unary("foo".into()));
        assert_eq!(messages[1].selector, MessageSelector::Keyword("bar:".into()));
        assert_eq!(messages[1].arguments.len(), 1);
        assert_eq!(messages[2].selector, MessageSelector::Unary("baz".into()));
    }

    #[test]
    fn cascade_detaches_keyword_receiver() {
        // the shared receiver is r, not the whole first send
        let term = expr("r at: 1 put: 2; yourself");
        let Expression::Cascade { receiver, messages, .. } = term else {
            panic!("expected cascade");
        };
        assert!(matches!(*receiver, Expression::Identifier(ref id) if id.name == "r"));
        assert_eq!(messages[0].selector, MessageSelector::Keyword("at:put:".into()));
        assert_eq!(messages[0].arguments.len(), 2);
        assert_eq!(messages[1].selector, MessageSelector::Unary("yourself".into()));
    }

    #[test]
    fn cascade_detaches_unary_receiver() {
        // a b; c  =>  receiver a, messages b and c
        let term = expr("a b; c");
        let Expression::Cascade { receiver, messages, .. } = term else {
            panic!("expected cascade");
        };
        assert!(matches!(*receiver, Expression::Identifier(ref id) if id.name == "a"));
        assert_eq!(messages[0].selector, MessageSelector::Unary("b".into()));
        assert_eq!(messages[1].selector, MessageSelector::Unary("c".into()));
    }

    #[test]
    fn cascade_needs_a_send_before_semicolon() {
        assert!(matches!(expr_err("r; foo"), ParseErrorKind::CascadeWithoutSend));
    }

    #[test]
    fn cascade_part_must_be_a_message() {
        assert!(matches!(
            expr_err("r foo; 3"),
            ParseErrorKind::ExpectedCascadePart(TokenKind::Integer(3))
        ));
    }

    #[test]
    fn assignment_is_right_associative() {
        let term = expr("a := b := c");
        let Expression::Assignment { target, value, .. } = term else {
            panic!("expected assignment");
        };
        assert_eq!(target.name, "a");
        let Expression::Assignment { target, value, .. } = *value else {
            panic!("expected nested assignment");
        };
        assert_eq!(target.name, "b");
        assert!(matches!(*value, Expression::Identifier(ref id) if id.name == "c"));
    }

    #[test]
    fn assignment_lookahead_does_not_consume() {
        // a bare identifier is still just an identifier
        assert!(matches!(expr("a"), Expression::Identifier(_)));
        // and := may appear nested in an argument group
        let term = expr("x foo: (y := 2)");
        let Expression::MessageSend { arguments, .. } = term else {
            panic!("expected message send");
        };
        assert!(matches!(arguments[0], Expression::Assignment { .. }));
    }

    #[test]
    fn assignment_target_is_one_identifier() {
        // `a b := c` is not an assignment; the := is left over
        assert!(matches!(
            expr_err("a b := c"),
            ParseErrorKind::TrailingTerms(TokenKind::Assign)
        ));
    }

    #[test]
    fn block_with_arguments_and_temporaries() {
        let term = expr("[ :a :b | | c d | a ]");
        let Expression::Block(block) = term else {
            panic!("expected block");
        };
        assert_eq!(block.arity(), 2);
        assert_eq!(block.parameters[0].name, "a");
        assert_eq!(block.parameters[1].name, "b");
        assert_eq!(block.temporaries.len(), 2);
        assert_eq!(block.temporaries[0].name, "c");
        assert_eq!(block.temporaries[1].name, "d");
        assert_eq!(block.body.len(), 1);
    }

    #[test]
    fn block_without_arguments() {
        let term = expr("[x + 1]");
        let Expression::Block(block) = term else {
            panic!("expected block");
        };
        assert!(block.parameters.is_empty());
        assert!(block.temporaries.is_empty());
        assert_eq!(block.body.len(), 1);
    }

    #[test]
    fn block_empty() {
        let Expression::Block(block) = expr("[]") else {
            panic!("expected block");
        };
        assert!(block.parameters.is_empty());
        assert!(block.temporaries.is_empty());
        assert!(block.body.is_empty());
    }

    #[test]
    fn block_empty_temporaries_form() {
        // `||` declares no temporaries
        let Expression::Block(block) = expr("[ || x ]") else {
            panic!("expected block");
        };
        assert!(block.temporaries.is_empty());
        assert_eq!(block.body.len(), 1);
    }

    #[test]
    fn block_statements_with_trailing_period() {
        let Expression::Block(block) = expr("[a. b. c.]") else {
            panic!("expected block");
        };
        assert_eq!(block.body.len(), 3);
    }

    #[test]
    fn block_arguments_need_separator() {
        assert!(matches!(
            expr_err("[:x y]"),
            ParseErrorKind::ExpectedBlockSeparator(TokenKind::Identifier(_))
        ));
    }

    #[test]
    fn block_temporaries_must_be_names() {
        assert!(matches!(
            expr_err("[ | 3 | x ]"),
            ParseErrorKind::NotAnIdentifier(TokenKind::Integer(3))
        ));
    }

    #[test]
    fn parentheses_are_transparent() {
        // grouping changes shape but produces no node of its own
        let term = expr("(a foo: b) bar");
        let Expression::MessageSend { receiver, selector, .. } = term else {
            panic!("expected message send");
        };
        assert_eq!(selector, MessageSelector::Unary("bar".into()));
        assert!(matches!(
            *receiver,
            Expression::MessageSend { ref selector, .. }
                if *selector == MessageSelector::Keyword("foo:".into())
        ));
    }

    #[test]
    fn parenthesized_group_must_be_one_expression() {
        assert!(matches!(
            expr_err("(a. b)"),
            ParseErrorKind::TrailingTerms(TokenKind::Delimiter('.'))
        ));
    }

    #[test]
    fn braces_are_not_primaries() {
        assert!(matches!(
            expr_err("{}"),
            ParseErrorKind::ExpectedPrimary(TokenKind::Compound(CompoundShape::Braces, _))
        ));
    }

    #[test]
    fn primary_failures() {
        assert!(matches!(
            expr_err("+ b"),
            ParseErrorKind::ExpectedPrimary(TokenKind::BinarySelector(_))
        ));
        assert!(matches!(expr_err("a +"), ParseErrorKind::UnexpectedEndOfInput));
        assert!(matches!(expr_err(""), ParseErrorKind::UnexpectedEndOfInput));
    }

    #[test]
    fn lexical_errors_surface_through_the_parser() {
        assert!(matches!(
            expr_err("[ a"),
            ParseErrorKind::Read(ReadErrorKind::UnbalancedDelimiter('['))
        ));
        assert!(matches!(
            expr_err("'abc"),
            ParseErrorKind::Read(ReadErrorKind::UnterminatedString)
        ));
        assert!(matches!(
            expr_err("a # b"),
            ParseErrorKind::Read(ReadErrorKind::UnknownCharacter('#'))
        ));
    }

    #[test]
    fn module_with_temporaries_and_statements() {
        let module = parse_module("| a b | a := 1. a + 2").unwrap();
        assert_eq!(module.temporaries.len(), 2);
        assert_eq!(module.statements.len(), 2);
        assert!(matches!(module.statements[0], Expression::Assignment { .. }));
    }

    #[test]
    fn module_trailing_period_is_optional() {
        assert_eq!(parse_module("x. y").unwrap().statements.len(), 2);
        assert_eq!(parse_module("x. y.").unwrap().statements.len(), 2);
    }

    #[test]
    fn module_may_be_empty() {
        let module = parse_module("").unwrap();
        assert!(module.temporaries.is_empty());
        assert!(module.statements.is_empty());
    }

    #[test]
    fn method_header_unary() {
        let header = parse_method_header("size").unwrap();
        assert_eq!(header.selector, MessageSelector::Unary("size".into()));
        assert!(header.parameters.is_empty());
    }

    #[test]
    fn method_header_binary() {
        let header = parse_method_header("+ other").unwrap();
        assert_eq!(header.selector, MessageSelector::Binary("+".into()));
        assert_eq!(header.parameters.len(), 1);
        assert_eq!(header.parameters[0].name, "other");
    }

    #[test]
    fn method_header_keyword() {
        let header = parse_method_header("at: index put: value").unwrap();
        assert_eq!(header.selector, MessageSelector::Keyword("at:put:".into()));
        assert_eq!(header.parameters.len(), 2);
        assert_eq!(header.parameters[0].name, "index");
        assert_eq!(header.parameters[1].name, "value");
        assert_eq!(header.parameters.len(), header.selector.arity());
    }

    #[test]
    fn method_header_failures() {
        assert!(matches!(
            parse_method_header("3").unwrap_err().kind,
            ParseErrorKind::InvalidMethodHeader(TokenKind::Integer(3))
        ));
        assert!(matches!(
            parse_method_header("+ 3").unwrap_err().kind,
            ParseErrorKind::NotAnIdentifier(TokenKind::Integer(3))
        ));
        assert!(matches!(
            parse_method_header("").unwrap_err().kind,
            ParseErrorKind::UnexpectedEndOfInput
        ));
        assert!(matches!(
            parse_method_header("size extra").unwrap_err().kind,
            ParseErrorKind::TrailingTerms(TokenKind::Identifier(_))
        ));
    }

    #[test]
    fn spans_cover_constructs() {
        let source = "a := b + c";
        let term = expr(source);
        assert_eq!(term.span(), Span::new(0, u32::try_from(source.len()).unwrap()));
    }

    #[test]
    fn sub_parser_over_materialized_tokens() {
        // the inner tokens of a compound parse exactly like fresh input
        let tokens = crate::parse::read_all("(x + 1)").unwrap();
        let TokenKind::Compound(CompoundShape::Parens, inner) = tokens[0].kind() else {
            panic!("expected compound");
        };
        let mut sub = Parser::from_tokens(inner.clone());
        let term = sub.parse_expression().unwrap();
        sub.assert_at_end().unwrap();
        assert!(matches!(
            term,
            Expression::MessageSend { ref selector, .. }
                if *selector == MessageSelector::Binary("+".into())
        ));
    }
}
