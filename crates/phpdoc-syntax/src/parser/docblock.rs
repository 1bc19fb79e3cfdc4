//! Docblock splitting: comment decoration, text lines and tag bodies.

use super::tags::parse_tag_value;
use crate::ast::{PhpDocChild, PhpDocNode, PhpDocTag};

/// Parse a `/** ... */` comment into text lines and tags.
///
/// A tag body runs from its name to the next tag line or blank line, so
/// multi-line shapes and descriptions stay with their tag.
pub fn parse_docblock(comment: &str) -> PhpDocNode {
    let lines = strip_decoration(comment);
    let mut children = Vec::new();

    let mut i = 0;
    while i < lines.len() {
        let Some((name, first)) = split_tag_line(lines[i]) else {
            children.push(PhpDocChild::Text(lines[i].trim().to_string()));
            i += 1;
            continue;
        };

        let mut body = first.to_string();
        i += 1;
        while i < lines.len() && !lines[i].trim().is_empty() && split_tag_line(lines[i]).is_none() {
            body.push('\n');
            body.push_str(lines[i]);
            i += 1;
        }

        let value = parse_tag_value(name, &body);
        children.push(PhpDocChild::Tag(PhpDocTag {
            name: name.to_string(),
            value,
        }));
    }

    PhpDocNode { children }
}

/// Remove `/**`, `*/` and the leading `*` of every line.
fn strip_decoration(comment: &str) -> Vec<&str> {
    let trimmed = comment.trim();
    let inner = trimmed.strip_prefix("/**").unwrap_or(trimmed);
    let inner = inner.strip_suffix("*/").unwrap_or(inner);

    inner
        .lines()
        .map(|line| {
            let line = line.trim_start();
            match line.strip_prefix('*') {
                Some(rest) => rest.strip_prefix(' ').unwrap_or(rest),
                None => line,
            }
        })
        .collect()
}

/// Split `@name body` into its name and the rest of the line.
fn split_tag_line(line: &str) -> Option<(&str, &str)> {
    let line = line.trim_start();
    let after_at = line.strip_prefix('@')?;
    let first = after_at.chars().next()?;
    if !(first.is_ascii_alphabetic() || first == '_' || first == '\\') {
        return None;
    }

    let name_len = after_at
        .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '\\')))
        .unwrap_or(after_at.len());
    Some((&line[..name_len + 1], &after_at[name_len..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_decoration() {
        let lines = strip_decoration("/**\n * Summary\n *\n * @return int\n */");
        assert_eq!(lines, vec!["", "Summary", "", "@return int", ""]);
    }

    #[test]
    fn test_split_tag_line() {
        assert_eq!(split_tag_line("@param int $x"), Some(("@param", " int $x")));
        assert_eq!(split_tag_line("@ORM\\Column(type=\"int\")"), Some(("@ORM\\Column", "(type=\"int\")")));
        assert_eq!(split_tag_line("an email@example.com"), None);
        assert_eq!(split_tag_line("@ not a tag"), None);
    }

    #[test]
    fn test_single_line_docblock() {
        let doc = parse_docblock("/** @var int */");
        assert_eq!(doc.tags().count(), 1);
    }
}
