//! Line-ranged namespace and import table of one PHP file.

use crate::lexer::{tokenize, PhpToken, Span};
use rustc_hash::FxHashMap;
use std::borrow::Cow;
use std::mem;

/// Lower-cased alias -> fully qualified name (without leading `\`).
pub type AliasMap = FxHashMap<String, String>;

/// One namespace region of a file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NamespaceBlock {
    pub start_line: u32,
    pub end_line: u32,
    /// Empty for the global namespace
    pub namespace: String,
    pub aliases: AliasMap,
}

impl NamespaceBlock {
    pub fn contains(&self, line: u32) -> bool {
        self.start_line <= line && line <= self.end_line
    }
}

/// Namespace/alias index of a PHP file.
///
/// Blocks are ordered and do not overlap. The first block starts at line 0;
/// a block opened by a later `namespace` statement starts on the line after
/// it. Every namespace statement starts a fresh alias map.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NamespaceIndex {
    blocks: Vec<NamespaceBlock>,
}

impl NamespaceIndex {
    /// Index without any block: every lookup yields the defaults.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn parse(source: &str) -> Self {
        Self::from_tokens(&tokenize(source))
    }

    pub fn from_tokens(tokens: &[(PhpToken, Span)]) -> Self {
        let tokens: Vec<&(PhpToken, Span)> = tokens
            .iter()
            .filter(|(token, _)| !matches!(token, PhpToken::DocComment(_)))
            .collect();
        ImportsParser::new(tokens).parse()
    }

    pub fn blocks(&self) -> &[NamespaceBlock] {
        &self.blocks
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Block containing `line`, if any.
    pub fn block_at(&self, line: Option<u32>) -> Option<&NamespaceBlock> {
        let line = line?;
        let index = self.blocks.partition_point(|block| block.end_line < line);
        self.blocks.get(index).filter(|block| block.contains(line))
    }

    /// Namespace active at `line`; empty when outside every block.
    pub fn namespace_at(&self, line: Option<u32>) -> &str {
        self.block_at(line).map_or("", |block| block.namespace.as_str())
    }

    /// Imports active at `line`; empty when outside every block.
    pub fn aliases_at(&self, line: Option<u32>) -> Cow<'_, AliasMap> {
        match self.block_at(line) {
            Some(block) => Cow::Borrowed(&block.aliases),
            None => Cow::Owned(AliasMap::default()),
        }
    }

    /// Target of the import registered under `alias` at `line`.
    pub fn alias_target(&self, line: Option<u32>, alias: &str) -> Option<&str> {
        self.block_at(line)?
            .aliases
            .get(&alias.to_lowercase())
            .map(String::as_str)
    }

    /// Qualify a class name the way PHP does at `line`: a leading `\` is
    /// absolute, an imported first segment is replaced by its target, and
    /// anything else is relative to the current namespace.
    pub fn qualify(&self, line: Option<u32>, name: &str) -> String {
        if let Some(absolute) = name.strip_prefix('\\') {
            return absolute.to_string();
        }

        let (top, rest) = match name.split_once('\\') {
            Some((top, rest)) => (top, Some(rest)),
            None => (name, None),
        };
        if let Some(target) = self.alias_target(line, top) {
            return match rest {
                Some(rest) => format!("{}\\{}", target, rest),
                None => target.to_string(),
            };
        }

        match self.namespace_at(line) {
            "" => name.to_string(),
            namespace => format!("{}\\{}", namespace, name),
        }
    }
}

/// Single pass over the significant tokens of a file.
struct ImportsParser<'t> {
    tokens: Vec<&'t (PhpToken, Span)>,
    pos: usize,
}

impl<'t> ImportsParser<'t> {
    fn new(tokens: Vec<&'t (PhpToken, Span)>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<&'t PhpToken> {
        self.tokens.get(self.pos).map(|(token, _)| token)
    }

    fn next(&mut self) -> Option<&'t (PhpToken, Span)> {
        let token = self.tokens.get(self.pos).copied();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn parse(mut self) -> NamespaceIndex {
        let mut blocks = Vec::new();
        let mut namespace: Option<String> = None;
        let mut aliases = AliasMap::default();
        let mut start_line = 0;
        let mut last_line = 0;

        // Brace depth, and the depth at which namespace-level statements live.
        let mut depth = 0usize;
        let mut top_depth = 0usize;
        let mut previous: Option<&PhpToken> = None;

        while let Some((token, span)) = self.next() {
            last_line = span.line;
            let member = previous.is_some_and(PhpToken::is_member_access);

            match token {
                PhpToken::Namespace
                    if !member && matches!(self.peek(), Some(PhpToken::Name(_) | PhpToken::OpenBrace)) =>
                {
                    if let Some(name) = namespace.take() {
                        blocks.push(NamespaceBlock {
                            start_line,
                            end_line: span.line,
                            namespace: name,
                            aliases: mem::take(&mut aliases),
                        });
                        start_line = span.line + 1;
                    }

                    let (name, braced) = self.parse_namespace_name();
                    namespace = Some(name);
                    if braced {
                        depth += 1;
                    }
                    top_depth = depth;
                }
                PhpToken::Use if !member && depth == top_depth => {
                    // `function () use ($x)` captures variables, it imports nothing.
                    if self.peek() != Some(&PhpToken::OpenParen) {
                        namespace.get_or_insert_with(String::new);
                        self.parse_use(&mut aliases);
                    }
                }
                PhpToken::OpenBrace => depth += 1,
                PhpToken::CloseBrace => {
                    depth = depth.saturating_sub(1);
                    top_depth = top_depth.min(depth);
                }
                _ => {}
            }

            previous = Some(token);
        }

        if namespace.is_some() || !aliases.is_empty() {
            blocks.push(NamespaceBlock {
                start_line,
                end_line: last_line,
                namespace: namespace.unwrap_or_default(),
                aliases,
            });
        }

        NamespaceIndex { blocks }
    }

    /// Read the name after `namespace` up to `;` or `{`; returns whether
    /// the namespace is braced.
    fn parse_namespace_name(&mut self) -> (String, bool) {
        let mut name = String::new();
        while let Some((token, _)) = self.next() {
            match token {
                PhpToken::Name(part) => name.push_str(part),
                PhpToken::Backslash => name.push('\\'),
                PhpToken::OpenBrace => return (name, true),
                PhpToken::Semicolon => break,
                _ => {}
            }
        }
        (name, false)
    }

    /// Parse one `use` statement up to its `;`.
    fn parse_use(&mut self, aliases: &mut AliasMap) {
        // `use function` / `use const` import non-class symbols.
        if matches!(self.peek(), Some(PhpToken::Function | PhpToken::Const)) {
            self.skip_statement();
            return;
        }

        let mut clause = UseClause::default();
        let mut group_prefix = String::new();

        while let Some((token, _)) = self.next() {
            match token {
                PhpToken::Name(name) if clause.expect_alias => {
                    clause.alias = Some(name.clone());
                    clause.expect_alias = false;
                }
                PhpToken::Name(name) => clause.path.push_str(name.trim_start_matches('\\')),
                PhpToken::Backslash => clause.path.push('\\'),
                PhpToken::As => clause.expect_alias = true,
                PhpToken::Function | PhpToken::Const => clause.skipped = true,
                PhpToken::OpenBrace => {
                    group_prefix = mem::take(&mut clause.path);
                }
                PhpToken::Comma => clause.commit(&group_prefix, aliases),
                PhpToken::CloseBrace => {
                    clause.commit(&group_prefix, aliases);
                    group_prefix.clear();
                }
                PhpToken::Semicolon => {
                    clause.commit(&group_prefix, aliases);
                    return;
                }
                _ => {}
            }
        }
        clause.commit(&group_prefix, aliases);
    }

    fn skip_statement(&mut self) {
        while let Some((token, _)) = self.next() {
            if *token == PhpToken::Semicolon {
                break;
            }
        }
    }
}

/// One `Path\To\Name [as Alias]` clause being accumulated.
#[derive(Default)]
struct UseClause {
    path: String,
    alias: Option<String>,
    expect_alias: bool,
    skipped: bool,
}

impl UseClause {
    fn commit(&mut self, group_prefix: &str, aliases: &mut AliasMap) {
        let clause = mem::take(self);
        if clause.skipped || clause.path.is_empty() {
            return;
        }

        let target = format!("{}{}", group_prefix, clause.path);
        let target = target.trim_start_matches('\\').trim_end_matches('\\').to_string();
        let alias = clause.alias.unwrap_or_else(|| {
            target.rsplit('\\').next().unwrap_or(&target).to_string()
        });
        aliases.insert(alias.to_lowercase(), target);
    }
}
