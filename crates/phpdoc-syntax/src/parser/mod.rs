//! Recursive descent parser for docblocks and docblock type expressions.

pub mod docblock;
pub mod error;
pub mod tags;
pub mod types;

use crate::ast::{InvalidType, TagValue, TypeNode};
use crate::lexer::Lexer;
use crate::token::{Span, Token};

pub use error::{ParseError, ParseErrorKind};

/// Maximum nesting depth before rejecting a type.
pub const MAX_PARSE_DEPTH: usize = 64;

/// Parser state over one tag body or type expression.
pub struct Parser<'a> {
    /// Text the tokens were lexed from
    source: &'a str,

    /// Pre-tokenized input, always terminated by `Eof`
    tokens: Vec<(Token, Span)>,

    /// Current position in token stream
    pos: usize,

    /// Current type nesting depth
    depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            tokens: Lexer::new(source).tokenize(),
            pos: 0,
            depth: 0,
        }
    }

    pub(crate) fn current(&self) -> &Token {
        self.peek(0)
    }

    pub(crate) fn current_span(&self) -> Span {
        let index = self.pos.min(self.tokens.len() - 1);
        self.tokens[index].1
    }

    /// Token `n` positions ahead; `Eof` past the end.
    pub(crate) fn peek(&self, n: usize) -> &Token {
        let index = (self.pos + n).min(self.tokens.len() - 1);
        &self.tokens[index].0
    }

    pub(crate) fn check(&self, token: &Token) -> bool {
        self.current() == token
    }

    pub(crate) fn at_eof(&self) -> bool {
        self.check(&Token::Eof)
    }

    pub(crate) fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    /// Consume the current token if it equals `token`.
    pub(crate) fn eat(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume the current token if it is the given keyword identifier.
    pub(crate) fn eat_keyword(&mut self, keyword: &str) -> bool {
        if self.current().is_keyword(keyword) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, token: Token) -> Result<Span, ParseError> {
        if self.check(&token) {
            let span = self.current_span();
            self.advance();
            Ok(span)
        } else {
            Err(self.unexpected(format!("'{}'", token)))
        }
    }

    /// Consume an identifier token and return its text.
    pub(crate) fn expect_identifier(&mut self, what: &str) -> Result<String, ParseError> {
        match self.current().clone() {
            Token::Identifier(name) => {
                self.advance();
                Ok(name)
            }
            _ => Err(self.unexpected(what)),
        }
    }

    pub(crate) fn unexpected(&self, expected: impl Into<String>) -> ParseError {
        ParseError::unexpected_token(expected, self.current().clone(), self.current_span())
    }

    /// True when no whitespace separates the current token from the previous one.
    pub(crate) fn is_adjacent(&self) -> bool {
        self.pos > 0 && self.tokens[self.pos - 1].1.end == self.current_span().start
    }

    /// Remaining source text from the current token on, trimmed.
    pub(crate) fn rest(&self) -> String {
        self.source[self.current_span().start..].trim().to_string()
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn rewind(&mut self, pos: usize) {
        self.pos = pos;
    }

    pub(crate) fn enter(&mut self) -> Result<(), ParseError> {
        if self.depth >= MAX_PARSE_DEPTH {
            return Err(ParseError::too_deep(MAX_PARSE_DEPTH, self.current_span()));
        }
        self.depth += 1;
        Ok(())
    }

    pub(crate) fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}

/// Parse a complete type expression.
pub fn parse_type(source: &str) -> Result<TypeNode, ParseError> {
    let mut parser = Parser::new(source);
    let ty = types::parse_type(&mut parser)?;
    if !parser.at_eof() {
        return Err(ParseError::trailing_input(
            parser.current().clone(),
            parser.current_span(),
        ));
    }
    Ok(ty)
}

/// Parse a type expression, turning a failure into [`TypeNode::Invalid`].
pub fn parse_type_lossy(source: &str) -> TypeNode {
    parse_type(source).unwrap_or_else(|error| {
        TypeNode::Invalid(InvalidType {
            source: source.trim().to_string(),
            error: error.to_string(),
        })
    })
}

/// Parse the body of a tag, given the tag name including its `@`.
pub fn parse_tag_value(name: &str, body: &str) -> TagValue {
    tags::parse_tag_value(name, body)
}

pub use docblock::parse_docblock;
