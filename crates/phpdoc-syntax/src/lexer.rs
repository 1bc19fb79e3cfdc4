//! Lexer for docblock tag bodies.
//!
//! Built on logos. Characters that cannot start any token are emitted as
//! [`Token::Error`] instead of aborting: tag bodies carry free-form
//! descriptions after the type, and those are sliced from the source rather
//! than lexed, so an odd character there must not poison the whole tag.

use crate::token::{Span, Token};
use logos::Logos;

/// Logos-based token enum, converted to [`Token`] after lexing.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
enum LogosToken {
    #[token("$this")]
    ThisVariable,

    #[regex(r"\$[a-zA-Z_\x{80}-\x{10FFFF}][0-9a-zA-Z_\x{80}-\x{10FFFF}]*", |lex| lex.slice().to_string())]
    Variable(String),

    #[regex(
        r"\\?[a-zA-Z_\x{80}-\x{10FFFF}][0-9a-zA-Z_\x{80}-\x{10FFFF}\-]*(\\[a-zA-Z_\x{80}-\x{10FFFF}][0-9a-zA-Z_\x{80}-\x{10FFFF}\-]*)*",
        |lex| lex.slice().to_string()
    )]
    Identifier(String),

    #[regex(r"-?[0-9][0-9_]*", |lex| lex.slice().to_string())]
    #[regex(r"-?0[xX][0-9a-fA-F][0-9a-fA-F_]*", |lex| lex.slice().to_string())]
    #[regex(r"-?0[bB][01][01_]*", |lex| lex.slice().to_string())]
    IntLiteral(String),

    #[regex(r"-?[0-9][0-9_]*\.[0-9_]*([eE][+-]?[0-9]+)?", |lex| lex.slice().to_string())]
    #[regex(r"-?\.[0-9][0-9_]*([eE][+-]?[0-9]+)?", |lex| lex.slice().to_string())]
    #[regex(r"-?[0-9][0-9_]*[eE][+-]?[0-9]+", |lex| lex.slice().to_string())]
    FloatLiteral(String),

    #[regex(r"'([^'\\]|\\.)*'", unquote)]
    #[regex(r#""([^"\\]|\\.)*""#, unquote)]
    StringLiteral(String),

    #[token("|")]
    Union,
    #[token("&")]
    Intersection,
    #[token("?")]
    Nullable,
    #[token("(")]
    OpenParen,
    #[token(")")]
    CloseParen,
    #[token("<")]
    OpenAngle,
    #[token(">")]
    CloseAngle,
    #[token("[")]
    OpenSquare,
    #[token("]")]
    CloseSquare,
    #[token("{")]
    OpenCurly,
    #[token("}")]
    CloseCurly,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token("::")]
    DoubleColon,
    #[token("...")]
    Variadic,
    #[token("=")]
    Equal,
    #[token("*")]
    Wildcard,
}

/// Strip the surrounding quotes and resolve backslash escapes of the quote
/// character and of the backslash itself.
fn unquote(lex: &mut logos::Lexer<LogosToken>) -> String {
    let slice = lex.slice();
    let inner = &slice[1..slice.len() - 1];
    let mut value = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(escaped @ ('\\' | '\'' | '"')) => value.push(escaped),
                Some(other) => {
                    value.push('\\');
                    value.push(other);
                }
                None => value.push('\\'),
            }
        } else {
            value.push(c);
        }
    }
    value
}

impl From<LogosToken> for Token {
    fn from(token: LogosToken) -> Self {
        match token {
            LogosToken::ThisVariable => Token::ThisVariable,
            LogosToken::Variable(name) => Token::Variable(name),
            LogosToken::Identifier(name) => Token::Identifier(name),
            LogosToken::IntLiteral(value) => Token::IntLiteral(value),
            LogosToken::FloatLiteral(value) => Token::FloatLiteral(value),
            LogosToken::StringLiteral(value) => Token::StringLiteral(value),
            LogosToken::Union => Token::Union,
            LogosToken::Intersection => Token::Intersection,
            LogosToken::Nullable => Token::Nullable,
            LogosToken::OpenParen => Token::OpenParen,
            LogosToken::CloseParen => Token::CloseParen,
            LogosToken::OpenAngle => Token::OpenAngle,
            LogosToken::CloseAngle => Token::CloseAngle,
            LogosToken::OpenSquare => Token::OpenSquare,
            LogosToken::CloseSquare => Token::CloseSquare,
            LogosToken::OpenCurly => Token::OpenCurly,
            LogosToken::CloseCurly => Token::CloseCurly,
            LogosToken::Comma => Token::Comma,
            LogosToken::Colon => Token::Colon,
            LogosToken::DoubleColon => Token::DoubleColon,
            LogosToken::Variadic => Token::Variadic,
            LogosToken::Equal => Token::Equal,
            LogosToken::Wildcard => Token::Wildcard,
        }
    }
}

/// Docblock lexer.
pub struct Lexer<'a> {
    source: &'a str,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source }
    }

    /// Tokenize the whole input. The result always ends with [`Token::Eof`].
    pub fn tokenize(self) -> Vec<(Token, Span)> {
        let mut tokens = Vec::new();
        let mut lexer = LogosToken::lexer(self.source);

        while let Some(result) = lexer.next() {
            let range = lexer.span();
            let span = Span::new(range.start, range.end);
            match result {
                Ok(token) => tokens.push((token.into(), span)),
                Err(()) => {
                    let c = self.source[range.start..].chars().next().unwrap_or('\u{fffd}');
                    tokens.push((Token::Error(c), span));
                }
            }
        }

        let end = self.source.len();
        tokens.push((Token::Eof, Span::new(end, end)));
        tokens
    }
}
