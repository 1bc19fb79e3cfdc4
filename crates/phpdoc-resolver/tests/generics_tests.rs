use phpdoc_resolver::*;

const TYPES: &str = r#"<?php
namespace App;

/**
 * @phpstan-type UserId = positive-int
 * @phpstan-type Row = array{id: UserId, name: string}
 */
class Types {}

/**
 * @phpstan-import-type Row from Types
 * @psalm-import-type UserId from Types as Id
 */
class Repo
{
    /** @return list<Row> */
    public function all() {}

    /** @param Id $id */
    public function find($id) {}
}

/** @phpstan-import-type Missing from Types */
class Broken {}

/** @phpstan-import-type A from CycleB */
class CycleA {}

/** @phpstan-import-type B from CycleA */
class CycleB {}

/** @phpstan-import-type Row from SelfImport */
class SelfImport {}
"#;

const COLLECTION: &str = r#"<?php
namespace App;

/**
 * @template TKey of array-key
 * @template-covariant TValue
 */
class Collection
{
    /**
     * @template TMapped
     * @param callable(TValue): TMapped $callback
     * @return Collection<TKey, TMapped>
     */
    public function map($callback) {}
}
"#;

fn factory() -> DocBlockFactory {
    DocBlockFactory::for_sources([("/app/Types.php", TYPES), ("/app/Collection.php", COLLECTION)])
}

// ============================================================================
// Type Aliases
// ============================================================================

#[test]
fn test_local_aliases_see_earlier_ones() {
    let factory = factory();
    let generics = factory.generics_for(&Declaration::class("App\\Types")).unwrap();

    let Some(TypeNode::TypeAlias(row)) = generics.defined_type("Row") else {
        panic!("expected the Row alias");
    };
    assert_eq!(row.declaring_type, "App\\Types");
    let TypeNode::ArrayShape(shape) = row.ty.as_ref() else {
        panic!("expected an array shape");
    };
    assert_eq!(
        shape.items[0].value,
        TypeNode::type_alias("UserId", TypeNode::identifier("positive-int"), "App\\Types")
    );
}

#[test]
fn test_imported_alias() {
    let factory = factory();
    let block = factory
        .create_from_declaration(&Declaration::method("App\\Repo", "all"))
        .unwrap();
    let TagValue::Return(tag) = block.tag("@return").unwrap() else {
        panic!("expected a return tag");
    };
    let TypeNode::ConcreteGeneric(list) = tag.ty else {
        panic!("expected a concrete generic");
    };
    let TypeNode::TypeAlias(row) = &list.generic.args[0] else {
        panic!("expected the imported alias");
    };
    assert_eq!(row.name, "Row");
    assert_eq!(row.declaring_type, "App\\Types");
    assert!(matches!(*row.ty, TypeNode::ArrayShape(_)));
}

#[test]
fn test_imported_alias_renamed() {
    let factory = factory();
    let block = factory
        .create_from_declaration(&Declaration::method("App\\Repo", "find"))
        .unwrap();
    let TagValue::Param(param) = block.tag("@param").unwrap() else {
        panic!("expected a param tag");
    };
    assert_eq!(
        param.ty,
        TypeNode::type_alias("Id", TypeNode::identifier("positive-int"), "App\\Types")
    );
}

#[test]
fn test_missing_alias_target() {
    let factory = factory();
    let err = factory.generics_for(&Declaration::class("App\\Broken")).unwrap_err();
    assert_eq!(
        err,
        ResolveError::MissingAliasTarget {
            alias: "Missing".to_string(),
            class: "App\\Types".to_string(),
        }
    );
}

#[test]
fn test_unknown_alias_source() {
    let factory = factory();
    let block = factory.create_from_comment("/** @phpstan-import-type Row from Nowhere */");
    assert_eq!(
        block.tags(None).unwrap_err(),
        ResolveError::UnknownAliasSource {
            symbol: "Nowhere".to_string()
        }
    );
}

#[test]
fn test_import_cycle_is_reported() {
    let factory = factory();
    let err = factory.generics_for(&Declaration::class("App\\CycleA")).unwrap_err();
    assert_eq!(
        err,
        ResolveError::CyclicTypeAlias {
            chain: vec![
                "App\\CycleB".to_string(),
                "App\\CycleA".to_string(),
                "App\\CycleB".to_string(),
            ]
        }
    );
}

#[test]
fn test_self_import_is_a_cycle() {
    let factory = factory();
    let err = factory.generics_for(&Declaration::class("App\\SelfImport")).unwrap_err();
    assert!(matches!(err, ResolveError::CyclicTypeAlias { .. }));
}

#[test]
fn test_unprefixed_alias_tags() {
    let source = r#"<?php
namespace App;

/** @type Money = int<0, max> */
class Price {}

/** @import-type Money from Price */
class Invoice
{
    /** @return Money */
    public function total() {}
}
"#;
    let factory = DocBlockFactory::for_sources([("/app/Invoice.php", source)]);
    let block = factory
        .create_from_declaration(&Declaration::method("App\\Invoice", "total"))
        .unwrap();
    let TagValue::Return(tag) = block.tag("@return").unwrap() else {
        panic!("expected a return tag");
    };
    let TypeNode::TypeAlias(money) = tag.ty else {
        panic!("expected the imported alias, got {:?}", tag.ty);
    };
    assert_eq!(money.name, "Money");
    assert_eq!(money.declaring_type, "App\\Price");
}

// ============================================================================
// Templates
// ============================================================================

#[test]
fn test_class_templates_in_order() {
    let factory = factory();
    let generics = factory.generics_for(&Declaration::class("App\\Collection")).unwrap();
    assert_eq!(generics.template_names(), vec!["TKey", "TValue"]);
    assert_eq!(
        generics.template_types()["TKey"],
        TypeNode::template("TKey", Some(TypeNode::identifier("array-key")))
    );
}

#[test]
fn test_method_inherits_class_templates() {
    let factory = factory();
    let generics = factory
        .generics_for(&Declaration::method("App\\Collection", "map"))
        .unwrap();
    assert_eq!(generics.template_names(), vec!["TKey", "TValue", "TMapped"]);

    let block = factory
        .create_from_declaration(&Declaration::method("App\\Collection", "map"))
        .unwrap();
    let TagValue::Return(tag) = block.tag("@return").unwrap() else {
        panic!("expected a return tag");
    };
    let TypeNode::TemplateGeneric(collection) = tag.ty else {
        panic!("expected a template generic");
    };
    assert_eq!(collection.generic.head, "App\\Collection");
    assert_eq!(
        collection.generic.args,
        vec![TypeNode::identifier("array-key"), TypeNode::identifier("TMapped")]
    );
    assert_eq!(collection.template_names, vec!["TKey", "TValue"]);
}

#[test]
fn test_flag_is_scoped_to_one_tag() {
    let factory = factory();
    let block = factory
        .create_from_declaration(&Declaration::method("App\\Collection", "map"))
        .unwrap();

    // The @param tag meets TValue unbound; the @return tag must not inherit
    // that, nor the bindings its own generic made.
    let tags = block.tags(None).unwrap();
    assert_eq!(tags.len(), 3);
    assert!(block.generics_resolver().unwrap().is_concrete());
    assert_eq!(
        block.generics_resolver().unwrap().map("TKey"),
        Some(TypeNode::template("TKey", Some(TypeNode::identifier("array-key"))))
    );
}

// ============================================================================
// Cache
// ============================================================================

#[test]
fn test_class_generics_are_cached() {
    let factory = factory();
    factory
        .generics_for(&Declaration::method("App\\Repo", "all"))
        .unwrap();

    let cache = factory.generics_cache();
    assert!(cache.get("App\\Types").is_some());
    assert!(cache.get("App\\Repo").is_some());
    assert!(cache.get("App\\Repo->all()").is_some());

    let misses = cache.stats().misses;
    factory
        .generics_for(&Declaration::method("App\\Repo", "all"))
        .unwrap();
    assert_eq!(cache.stats().misses, misses);
}

#[test]
fn test_shared_caches() {
    let first = factory();
    first.generics_for(&Declaration::class("App\\Types")).unwrap();

    let program = {
        let mut program = ProgramIndex::new();
        program.add_source("/app/Types.php", TYPES);
        program
    };
    let second = DocBlockFactory::new(std::sync::Arc::new(program)).with_caches(
        first.imports_cache().clone(),
        first.generics_cache().clone(),
    );
    let hits = second.generics_cache().stats().hits;
    second.generics_for(&Declaration::class("App\\Types")).unwrap();
    assert_eq!(second.generics_cache().stats().hits, hits + 1);
}
