//! Token definitions for docblock type expressions.

use std::fmt;

/// A token of a docblock tag body.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Bare or namespaced name: `int`, `non-empty-list`, `\App\Foo`
    Identifier(String),
    /// `$this`
    ThisVariable,
    /// Variable name, including the leading `$`
    Variable(String),
    /// Integer literal, kept verbatim
    IntLiteral(String),
    /// Float literal, kept verbatim
    FloatLiteral(String),
    /// Quoted string literal, unescaped
    StringLiteral(String),

    // Operators and punctuation
    Union,
    Intersection,
    Nullable,
    OpenParen,
    CloseParen,
    OpenAngle,
    CloseAngle,
    OpenSquare,
    CloseSquare,
    OpenCurly,
    CloseCurly,
    Comma,
    Colon,
    DoubleColon,
    Variadic,
    Equal,
    Wildcard,

    /// A character no docblock type can contain
    Error(char),

    /// End of input
    Eof,
}

impl Token {
    /// Returns true if this token is an identifier with the given text.
    pub fn is_keyword(&self, keyword: &str) -> bool {
        matches!(self, Token::Identifier(name) if name.eq_ignore_ascii_case(keyword))
    }

    /// Short human-readable description used in parse errors.
    pub fn describe(&self) -> String {
        match self {
            Token::Identifier(name) => format!("identifier '{}'", name),
            Token::Variable(name) => format!("variable '{}'", name),
            Token::IntLiteral(value) | Token::FloatLiteral(value) => format!("number '{}'", value),
            Token::StringLiteral(value) => format!("string '{}'", value),
            Token::Error(c) => format!("character '{}'", c),
            Token::Eof => "end of input".to_string(),
            other => format!("'{}'", other),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Identifier(name) | Token::Variable(name) => write!(f, "{}", name),
            Token::ThisVariable => write!(f, "$this"),
            Token::IntLiteral(value) | Token::FloatLiteral(value) => write!(f, "{}", value),
            Token::StringLiteral(value) => write!(f, "'{}'", value),
            Token::Union => write!(f, "|"),
            Token::Intersection => write!(f, "&"),
            Token::Nullable => write!(f, "?"),
            Token::OpenParen => write!(f, "("),
            Token::CloseParen => write!(f, ")"),
            Token::OpenAngle => write!(f, "<"),
            Token::CloseAngle => write!(f, ">"),
            Token::OpenSquare => write!(f, "["),
            Token::CloseSquare => write!(f, "]"),
            Token::OpenCurly => write!(f, "{{"),
            Token::CloseCurly => write!(f, "}}"),
            Token::Comma => write!(f, ","),
            Token::Colon => write!(f, ":"),
            Token::DoubleColon => write!(f, "::"),
            Token::Variadic => write!(f, "..."),
            Token::Equal => write!(f, "="),
            Token::Wildcard => write!(f, "*"),
            Token::Error(c) => write!(f, "{}", c),
            Token::Eof => write!(f, "<eof>"),
        }
    }
}

/// Byte range of a token inside the text it was lexed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }

    pub fn merge(&self, other: &Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}
