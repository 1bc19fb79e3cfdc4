//! Single-pass declaration scanner over PHP source tokens.

use super::{ClassKind, ClassLike, FunctionDecl, Member};
use crate::imports::NamespaceIndex;
use crate::lexer::{PhpToken, Span};
use std::path::Path;

/// Declarations found in one file.
pub(super) struct Scanned {
    pub classes: Vec<ClassLike>,
    pub functions: Vec<FunctionDecl>,
}

pub(super) fn scan(tokens: &[(PhpToken, Span)], namespaces: &NamespaceIndex, file: &Path) -> Scanned {
    Scanner {
        tokens,
        namespaces,
        file,
        pos: 0,
        frames: Vec::new(),
        paren_depth: 0,
        pending_doc: None,
        anonymous_at: None,
        classes: Vec::new(),
        functions: Vec::new(),
    }
    .run()
}

/// What an open `{` belongs to.
enum Frame {
    /// Body of `classes[index]`, opened at paren depth `parens`
    ClassBody { index: usize, parens: usize },
    AnonymousClassBody,
    Other,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum HeaderList {
    None,
    Extends,
    Implements,
}

struct Scanner<'a> {
    tokens: &'a [(PhpToken, Span)],
    namespaces: &'a NamespaceIndex,
    file: &'a Path,
    pos: usize,
    frames: Vec<Frame>,
    paren_depth: usize,
    /// Doc comment waiting for the declaration it precedes
    pending_doc: Option<String>,
    /// Paren depth at which a `new class` body is expected
    anonymous_at: Option<usize>,
    classes: Vec<ClassLike>,
    functions: Vec<FunctionDecl>,
}

impl<'a> Scanner<'a> {
    fn run(mut self) -> Scanned {
        while let Some((token, span)) = self.next() {
            match token {
                PhpToken::DocComment(text) => self.pending_doc = Some(text.clone()),
                PhpToken::OpenParen => self.paren_depth += 1,
                PhpToken::CloseParen => self.paren_depth = self.paren_depth.saturating_sub(1),
                PhpToken::Semicolon => self.pending_doc = None,
                PhpToken::OpenBrace => {
                    self.pending_doc = None;
                    let frame = if self.anonymous_at == Some(self.paren_depth) {
                        self.anonymous_at = None;
                        Frame::AnonymousClassBody
                    } else {
                        Frame::Other
                    };
                    self.frames.push(frame);
                }
                PhpToken::CloseBrace => {
                    self.pending_doc = None;
                    if let Some(Frame::ClassBody { index, .. }) = self.frames.pop() {
                        self.classes[index].end_line = span.line;
                    }
                }
                PhpToken::Use if !self.in_class_body() && self.peek() != Some(&PhpToken::OpenParen) => {
                    self.skip_import();
                }
                PhpToken::Class | PhpToken::Interface | PhpToken::Trait | PhpToken::Enum => {
                    self.class_like(token, span);
                }
                PhpToken::Function => self.function(span),
                PhpToken::Const if self.in_class_body() => self.constants(),
                PhpToken::Name(word) if word.eq_ignore_ascii_case("case") && self.in_class_body() => {
                    self.enum_case();
                }
                PhpToken::Variable(name) if self.in_class_body() => {
                    let member = Member {
                        name: name.trim_start_matches('$').to_string(),
                        line: span.line,
                        doc_comment: self.pending_doc.take(),
                    };
                    if let Some(class) = self.current_class() {
                        class.properties.push(member);
                    }
                }
                _ => {}
            }
        }

        Scanned {
            classes: self.classes,
            functions: self.functions,
        }
    }

    fn next(&mut self) -> Option<&'a (PhpToken, Span)> {
        let entry = self.tokens.get(self.pos);
        if entry.is_some() {
            self.pos += 1;
        }
        entry
    }

    fn peek(&self) -> Option<&'a PhpToken> {
        self.tokens.get(self.pos).map(|(token, _)| token)
    }

    fn peek_at(&self, offset: usize) -> Option<&'a PhpToken> {
        self.tokens.get(self.pos + offset).map(|(token, _)| token)
    }

    /// Token before the one just consumed.
    fn previous(&self) -> Option<&'a PhpToken> {
        self.pos
            .checked_sub(2)
            .and_then(|index| self.tokens.get(index))
            .map(|(token, _)| token)
    }

    fn in_class_body(&self) -> bool {
        matches!(
            self.frames.last(),
            Some(Frame::ClassBody { parens, .. }) if *parens == self.paren_depth
        )
    }

    fn current_class(&mut self) -> Option<&mut ClassLike> {
        match self.frames.last() {
            Some(Frame::ClassBody { index, parens }) if *parens == self.paren_depth => {
                self.classes.get_mut(*index)
            }
            _ => None,
        }
    }

    fn inside_class_like(&self) -> bool {
        self.frames
            .iter()
            .any(|frame| matches!(frame, Frame::ClassBody { .. } | Frame::AnonymousClassBody))
    }

    /// Skip a namespace-level `use` statement; its names are not declarations.
    fn skip_import(&mut self) {
        while let Some(token) = self.peek() {
            if *token == PhpToken::Semicolon {
                break;
            }
            self.pos += 1;
        }
    }

    fn class_like(&mut self, keyword: &PhpToken, span: &Span) {
        match self.previous() {
            Some(token) if token.is_member_access() => return,
            Some(PhpToken::New) => {
                self.anonymous_at = Some(self.paren_depth);
                return;
            }
            _ => {}
        }
        let Some(PhpToken::Name(short_name)) = self.peek() else {
            return;
        };
        self.pos += 1;

        let kind = match keyword {
            PhpToken::Interface => ClassKind::Interface,
            PhpToken::Trait => ClassKind::Trait,
            PhpToken::Enum => ClassKind::Enum,
            _ => ClassKind::Class,
        };
        let line = Some(span.line);
        let name = match self.namespaces.namespace_at(line) {
            "" => short_name.clone(),
            namespace => format!("{}\\{}", namespace, short_name),
        };

        let mut class = ClassLike::new(name, kind);
        class.file = self.file.to_path_buf();
        class.line = span.line;
        class.end_line = span.line;
        class.doc_comment = self.pending_doc.take();

        let mut list = HeaderList::None;
        while let Some(token) = self.peek() {
            match token {
                PhpToken::OpenBrace | PhpToken::Semicolon => break,
                PhpToken::Extends => list = HeaderList::Extends,
                PhpToken::Implements => list = HeaderList::Implements,
                PhpToken::Name(name) => {
                    let qualified = self.namespaces.qualify(line, name);
                    match (list, kind) {
                        (HeaderList::Extends, ClassKind::Class) => class.parent = Some(qualified),
                        (HeaderList::Extends | HeaderList::Implements, _) => {
                            class.interfaces.push(qualified)
                        }
                        // Enum backing type
                        (HeaderList::None, _) => {}
                    }
                }
                _ => {}
            }
            self.pos += 1;
        }

        tracing::trace!(name = %class.name, kind = kind.keyword(), line = span.line, "found class-like");
        let index = self.classes.len();
        self.classes.push(class);

        if self.peek() == Some(&PhpToken::OpenBrace) {
            self.pos += 1;
            self.frames.push(Frame::ClassBody {
                index,
                parens: self.paren_depth,
            });
        }
    }

    fn function(&mut self, span: &Span) {
        if self.previous().is_some_and(PhpToken::is_member_access) {
            return;
        }
        let doc_comment = self.pending_doc.take();
        if self.peek() == Some(&PhpToken::Ampersand) {
            self.pos += 1;
        }
        // Closures have no name.
        let Some(name) = self.peek().and_then(PhpToken::as_name) else {
            return;
        };
        self.pos += 1;

        let member = Member {
            name,
            line: span.line,
            doc_comment,
        };
        if let Some(class) = self.current_class() {
            class.methods.push(member);
        } else if !self.inside_class_like() {
            let name = match self.namespaces.namespace_at(Some(span.line)) {
                "" => member.name,
                namespace => format!("{}\\{}", namespace, member.name),
            };
            self.functions.push(FunctionDecl {
                name,
                file: self.file.to_path_buf(),
                line: span.line,
                doc_comment: member.doc_comment,
            });
        }
    }

    /// `const [type] A = ..., B = ...;` in a class body.
    fn constants(&mut self) {
        let mut doc_comment = self.pending_doc.take();
        let mut found = Vec::new();

        while let Some((token, span)) = self.tokens.get(self.pos) {
            if *token == PhpToken::Semicolon {
                break;
            }
            if let (PhpToken::Name(name), Some(PhpToken::Equal)) = (token, self.peek_at(1)) {
                found.push(Member {
                    name: name.clone(),
                    line: span.line,
                    doc_comment: doc_comment.take(),
                });
            }
            self.pos += 1;
        }

        if let Some(class) = self.current_class() {
            class.constants.extend(found);
        }
    }

    /// Enum cases are exposed as class constants.
    fn enum_case(&mut self) {
        let Some((PhpToken::Name(name), span)) = self.tokens.get(self.pos) else {
            return;
        };
        self.pos += 1;
        let member = Member {
            name: name.clone(),
            line: span.line,
            doc_comment: self.pending_doc.take(),
        };
        if let Some(class) = self.current_class() {
            class.constants.push(member);
        }
    }
}
