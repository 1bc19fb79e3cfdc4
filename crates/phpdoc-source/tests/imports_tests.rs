use phpdoc_source::{ImportsCache, NamespaceIndex};
use std::sync::Arc;

fn sorted_aliases(index: &NamespaceIndex, line: u32) -> Vec<(String, String)> {
    let mut entries: Vec<_> = index
        .aliases_at(Some(line))
        .iter()
        .map(|(alias, target)| (alias.clone(), target.clone()))
        .collect();
    entries.sort();
    entries
}

fn pairs(expected: &[(&str, &str)]) -> Vec<(String, String)> {
    expected
        .iter()
        .map(|(alias, target)| (alias.to_string(), target.to_string()))
        .collect()
}

#[test]
fn test_single_import() {
    let index = NamespaceIndex::parse("<?php\n\nuse XX;");
    assert_eq!(sorted_aliases(&index, 0), pairs(&[("xx", "XX")]));
}

#[test]
fn test_aliased_import() {
    let index = NamespaceIndex::parse("<?php\n\nuse XX as YY;");
    assert_eq!(sorted_aliases(&index, 0), pairs(&[("yy", "XX")]));
}

#[test]
fn test_group_import() {
    let index = NamespaceIndex::parse("<?php\n\nuse XX\\{YY, ZZ};");
    assert_eq!(
        sorted_aliases(&index, 0),
        pairs(&[("yy", "XX\\YY"), ("zz", "XX\\ZZ")])
    );
}

#[test]
fn test_nested_group_import_with_alias() {
    let index = NamespaceIndex::parse("<?php\n\nuse XX\\{YY\\ZZ, ZZ as ZZ2};");
    assert_eq!(
        sorted_aliases(&index, 0),
        pairs(&[("zz", "XX\\YY\\ZZ"), ("zz2", "XX\\ZZ")])
    );
}

#[test]
fn test_comma_separated_imports() {
    let index = NamespaceIndex::parse("<?php\n\nuse XX\\YY, YY\\ZZ;");
    assert_eq!(
        sorted_aliases(&index, 0),
        pairs(&[("yy", "XX\\YY"), ("zz", "YY\\ZZ")])
    );
}

#[test]
fn test_namespace_with_import() {
    let index = NamespaceIndex::parse("<?php\n\nnamespace XX;\n\nuse YY;");
    assert_eq!(index.namespace_at(Some(0)), "XX");
    assert_eq!(sorted_aliases(&index, 0), pairs(&[("yy", "YY")]));
}

#[test]
fn test_alias_keys_are_lowercase() {
    let index = NamespaceIndex::parse("<?php\nuse App\\Models\\UserProfile;\n");
    assert_eq!(index.alias_target(Some(2), "USERPROFILE"), Some("App\\Models\\UserProfile"));
}

#[test]
fn test_file_without_namespace_or_imports_is_empty() {
    let index = NamespaceIndex::parse("<?php\n\necho 'hello';\nclass Foo {}\n");
    assert!(index.is_empty());
    assert_eq!(index.namespace_at(Some(3)), "");
    assert!(index.aliases_at(Some(3)).is_empty());
}

#[test]
fn test_missing_line_yields_defaults() {
    let index = NamespaceIndex::parse("<?php\nnamespace App;\nuse Lib\\Foo;\n");
    assert_eq!(index.namespace_at(None), "");
    assert!(index.aliases_at(None).is_empty());
    assert_eq!(index.namespace_at(Some(500)), "");
}

#[test]
fn test_multiple_namespaces_reset_imports() {
    let source = "<?php
namespace A;
use X\\Foo;
class C {}
namespace B;
use Y\\Bar;
function f() {}
";
    let index = NamespaceIndex::parse(source);
    assert_eq!(index.blocks().len(), 2);

    assert_eq!(index.namespace_at(Some(4)), "A");
    assert_eq!(sorted_aliases(&index, 4), pairs(&[("foo", "X\\Foo")]));

    // The declaration line still belongs to the previous block.
    assert_eq!(index.namespace_at(Some(5)), "A");

    assert_eq!(index.namespace_at(Some(6)), "B");
    assert_eq!(sorted_aliases(&index, 7), pairs(&[("bar", "Y\\Bar")]));
}

#[test]
fn test_braced_namespaces() {
    let source = "<?php
namespace A {
    use X\\Foo;
    class C { use SomeTrait; }
}
namespace B {
    use Y\\Bar;
    $f = function () use ($x) {};
}
";
    let index = NamespaceIndex::parse(source);
    let blocks = index.blocks();
    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0].namespace, "A");
    assert_eq!(blocks[1].namespace, "B");
    assert_eq!(blocks[1].start_line, 7);

    assert_eq!(sorted_aliases(&index, 3), pairs(&[("foo", "X\\Foo")]));
    assert_eq!(sorted_aliases(&index, 8), pairs(&[("bar", "Y\\Bar")]));
}

#[test]
fn test_trait_and_closure_use_are_not_imports() {
    let source = "<?php
namespace App;
use Lib\\Base;
class Model {
    use HasFactory;
    public function run() {
        return array_map(function ($x) use ($y) { return $x; }, []);
    }
}
";
    let index = NamespaceIndex::parse(source);
    assert_eq!(sorted_aliases(&index, 5), pairs(&[("base", "Lib\\Base")]));
}

#[test]
fn test_namespace_keyword_in_relative_name_is_not_a_declaration() {
    let source = "<?php\nnamespace App;\n$x = namespace\\helper();\n";
    let index = NamespaceIndex::parse(source);
    assert_eq!(index.blocks().len(), 1);
    assert_eq!(index.namespace_at(Some(3)), "App");
}

#[test]
fn test_cache_reads_file_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Service.php");
    std::fs::write(&path, "<?php\nnamespace App\\Services;\nuse App\\Models\\User;\n").unwrap();

    let cache = ImportsCache::new();
    let first = cache.index_for(&path);
    assert_eq!(first.namespace_at(Some(3)), "App\\Services");

    std::fs::write(&path, "<?php\nnamespace Changed;\n").unwrap();
    let second = cache.index_for(&path);
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(cache.stats().hits, 1);
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_cache_missing_file_is_empty_index() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.php");

    let cache = ImportsCache::new();
    let index = cache.index_for(&path);
    assert!(index.is_empty());
    assert_eq!(index.namespace_at(Some(1)), "");

    cache.index_for(&path);
    assert_eq!(cache.stats().misses, 1);
    assert_eq!(cache.stats().hits, 1);
}

#[test]
fn test_cache_insert_primes_entry() {
    let cache = ImportsCache::new();
    let path = std::path::Path::new("/virtual/Primed.php");
    cache.insert(path, Arc::new(NamespaceIndex::parse("<?php namespace Primed;")));
    assert_eq!(cache.index_for(path).namespace_at(Some(1)), "Primed");
}
