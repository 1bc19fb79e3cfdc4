//! Lexer for PHP source files.
//!
//! Only the tokens needed to find namespaces, imports and declarations are
//! recognized. Everything else (operators, casts, inline HTML) is dropped,
//! which keeps the token stream small and the lexer total: it never fails.

use logos::{FilterResult, Logos};
use std::fmt;

/// A PHP source token.
#[derive(Logos, Debug, Clone, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum PhpToken {
    #[regex(r"<\?(php|PHP|Php|=)?", logos::skip)]
    #[token("?>", logos::skip)]
    #[regex(r"//[^\n]*", logos::skip)]
    #[regex(r"#([^\[\n][^\n]*)?", logos::skip)]
    Ignored,

    /// `/** ... */`, with its delimiters
    #[token("/*", lex_comment)]
    DocComment(String),

    /// `#[`
    #[token("#[")]
    AttributeOpen,

    #[token("namespace", ignore(ascii_case))]
    Namespace,
    #[token("use", ignore(ascii_case))]
    Use,
    #[token("as", ignore(ascii_case))]
    As,
    #[token("function", ignore(ascii_case))]
    Function,
    #[token("const", ignore(ascii_case))]
    Const,
    #[token("class", ignore(ascii_case))]
    Class,
    #[token("interface", ignore(ascii_case))]
    Interface,
    #[token("trait", ignore(ascii_case))]
    Trait,
    #[token("enum", ignore(ascii_case))]
    Enum,
    #[token("extends", ignore(ascii_case))]
    Extends,
    #[token("implements", ignore(ascii_case))]
    Implements,
    #[token("new", ignore(ascii_case))]
    New,

    /// Bare, qualified or fully qualified name
    #[regex(
        r"\\?[a-zA-Z_\x{80}-\x{10FFFF}][a-zA-Z0-9_\x{80}-\x{10FFFF}]*(\\[a-zA-Z_\x{80}-\x{10FFFF}][a-zA-Z0-9_\x{80}-\x{10FFFF}]*)*",
        |lex| lex.slice().to_string()
    )]
    Name(String),

    #[regex(r"\$[a-zA-Z_\x{80}-\x{10FFFF}][a-zA-Z0-9_\x{80}-\x{10FFFF}]*", |lex| lex.slice().to_string())]
    Variable(String),

    #[regex(r"'([^'\\]|\\.)*'")]
    #[regex(r#""([^"\\]|\\.)*""#)]
    #[regex(r"`([^`\\]|\\.)*`")]
    #[regex(r#"<<<[ \t]*("[a-zA-Z_][a-zA-Z0-9_]*"|'[a-zA-Z_][a-zA-Z0-9_]*'|[a-zA-Z_][a-zA-Z0-9_]*)"#, lex_heredoc)]
    StringLiteral,

    #[regex(r"[0-9][0-9_]*(\.[0-9_]*)?([eE][+-]?[0-9]+)?")]
    #[regex(r"0[xX][0-9a-fA-F][0-9a-fA-F_]*")]
    Number,

    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token("{")]
    OpenBrace,
    #[token("}")]
    CloseBrace,
    #[token("(")]
    OpenParen,
    #[token(")")]
    CloseParen,
    #[token("\\")]
    Backslash,
    #[token("::")]
    DoubleColon,
    #[token("->")]
    Arrow,
    #[token("?->")]
    NullsafeArrow,
    #[token("&")]
    Ampersand,
    #[token("=")]
    Equal,
    #[token("=>")]
    DoubleArrow,
    #[regex(r"===?|!==?|<=>?|>=")]
    Comparison,
}

/// Consume a block comment; keep it only if it is a docblock.
fn lex_comment(lex: &mut logos::Lexer<PhpToken>) -> FilterResult<String, ()> {
    let remainder = lex.remainder();
    match remainder.find("*/") {
        Some(end) => lex.bump(end + 2),
        None => lex.bump(remainder.len()),
    }

    let text = lex.slice();
    if text.starts_with("/**") && text.len() > "/**/".len() {
        FilterResult::Emit(text.to_string())
    } else {
        FilterResult::Skip
    }
}

/// Consume a heredoc/nowdoc body up to its closing label.
fn lex_heredoc(lex: &mut logos::Lexer<PhpToken>) -> bool {
    let label: String = lex.slice()[3..]
        .trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .to_string();
    let remainder = lex.remainder();

    let mut offset = match remainder.find('\n') {
        Some(newline) => newline + 1,
        None => {
            lex.bump(remainder.len());
            return true;
        }
    };

    while offset < remainder.len() {
        let line_end = remainder[offset..]
            .find('\n')
            .map_or(remainder.len(), |i| offset + i);
        let line = &remainder[offset..line_end];
        let indent = line.len() - line.trim_start().len();
        let closes = line.trim_start().strip_prefix(label.as_str()).is_some_and(|rest| {
            !rest.starts_with(|c: char| c.is_ascii_alphanumeric() || c == '_')
        });
        if closes {
            lex.bump(offset + indent + label.len());
            return true;
        }
        offset = line_end + 1;
    }

    lex.bump(remainder.len());
    true
}

impl fmt::Display for PhpToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhpToken::Name(name) | PhpToken::Variable(name) => write!(f, "{}", name),
            PhpToken::DocComment(_) => write!(f, "/** */"),
            other => write!(f, "{:?}", other),
        }
    }
}

impl PhpToken {
    /// Text of a token usable as a member name (`function list()`).
    pub fn as_name(&self) -> Option<String> {
        let keyword = match self {
            PhpToken::Name(name) => return Some(name.clone()),
            PhpToken::Namespace => "namespace",
            PhpToken::Use => "use",
            PhpToken::As => "as",
            PhpToken::Function => "function",
            PhpToken::Const => "const",
            PhpToken::Class => "class",
            PhpToken::Interface => "interface",
            PhpToken::Trait => "trait",
            PhpToken::Enum => "enum",
            PhpToken::Extends => "extends",
            PhpToken::Implements => "implements",
            PhpToken::New => "new",
            _ => return None,
        };
        Some(keyword.to_string())
    }

    /// `->`, `?->` or `::`: the following keyword is a member name.
    pub fn is_member_access(&self) -> bool {
        matches!(
            self,
            PhpToken::Arrow | PhpToken::NullsafeArrow | PhpToken::DoubleColon
        )
    }
}

/// Location of a source token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    /// 1-based line of the token's first character
    pub line: u32,
}

impl Span {
    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }
}

/// Byte offsets of line starts, for offset to line lookups.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(source.match_indices('\n').map(|(i, _)| i + 1));
        Self { line_starts }
    }

    /// 1-based line containing `offset`.
    pub fn line_of(&self, offset: usize) -> u32 {
        self.line_starts.partition_point(|&start| start <= offset) as u32
    }
}

/// Tokenize PHP source. Unrecognized input is dropped.
pub fn tokenize(source: &str) -> Vec<(PhpToken, Span)> {
    let lines = LineIndex::new(source);
    let mut lexer = PhpToken::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let Ok(token) = result else {
            continue;
        };
        let range = lexer.span();
        tokens.push((
            token,
            Span {
                start: range.start,
                end: range.end,
                line: lines.line_of(range.start),
            },
        ));
    }

    tokens
}
