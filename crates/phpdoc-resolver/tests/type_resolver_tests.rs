use phpdoc_resolver::*;
use phpdoc_syntax::{parse_type, ConditionalSubject, ConstExpr, ShapeKey};

const BOX: &str = r#"<?php
namespace NS;

use Other\Foo;
use Lib\Collection as Coll;

/**
 * @template TKey of array-key
 * @template TValue
 * @phpstan-type TColors = array{red: int, green: int}
 */
class Box extends Base
{
    /**
     * Summary line.
     *
     * Longer description
     * over two lines.
     *
     * @return array{1: list<Foo>, 2?: Bar[]}
     */
    public function shape() {}

    /** @return TValue */
    public function value() {}

    /** @return list<TValue> */
    public function values() {}

    /** @return Coll<TKey, TValue> */
    public function collection() {}

    /** @return static|parent|self */
    public function relative() {}

    /** @return key-of<TColors> */
    public function colors() {}

    /**
     * @template T of object
     * @param class-string<T> $class
     * @return T
     */
    public function make($class) {}

    /** @var Pair<int, string> */
    public $pair;

    /** @return self::TYPE_* */
    public function constants() {}
}
"#;

const BASE: &str = "<?php\nnamespace NS;\n\nclass Base {}\n";
const BAR: &str = "<?php\nnamespace NS;\n\nclass Bar {}\n";
const PAIR: &str = r#"<?php
namespace NS;

/**
 * @template TFirst
 * @template TSecond
 */
class Pair {}
"#;

fn factory() -> DocBlockFactory {
    DocBlockFactory::for_sources([
        ("/src/NS/Box.php", BOX),
        ("/src/NS/Base.php", BASE),
        ("/src/NS/Bar.php", BAR),
        ("/src/NS/Pair.php", PAIR),
    ])
}

fn return_type(factory: &DocBlockFactory, method: &str) -> TypeNode {
    let block = factory
        .create_from_declaration(&Declaration::method("NS\\Box", method))
        .unwrap();
    match block.tag("@return").unwrap() {
        TagValue::Return(tag) => tag.ty,
        other => panic!("expected a return tag, got {:?}", other),
    }
}

fn resolve_comment(factory: &DocBlockFactory, comment: &str) -> Result<Vec<TagValue>, ResolveError> {
    factory.create_from_comment(comment).tags(None)
}

// ============================================================================
// Name Resolution
// ============================================================================

#[test]
fn test_shape_with_imports_and_namespace() {
    let factory = factory();
    let TypeNode::ArrayShape(shape) = return_type(&factory, "shape") else {
        panic!("expected an array shape");
    };

    assert_eq!(shape.items[0].key, Some(ShapeKey::Integer("1".to_string())));
    let TypeNode::ConcreteGeneric(list) = &shape.items[0].value else {
        panic!("expected a concrete generic, got {:?}", shape.items[0].value);
    };
    assert_eq!(list.generic.head, "list");
    assert_eq!(list.generic.args, vec![TypeNode::identifier("Other\\Foo")]);
    assert_eq!(list.template_names, vec!["TValue"]);

    assert!(shape.items[1].optional);
    assert_eq!(shape.items[1].value, TypeNode::array_of(TypeNode::identifier("NS\\Bar")));
}

#[test]
fn test_relative_types() {
    let factory = factory();
    assert_eq!(
        return_type(&factory, "relative"),
        TypeNode::union(vec![
            TypeNode::identifier("NS\\Box"),
            TypeNode::identifier("NS\\Base"),
            TypeNode::identifier("NS\\Box"),
        ])
    );
}

#[test]
fn test_class_constant_fetch() {
    let factory = factory();
    assert_eq!(
        return_type(&factory, "constants"),
        TypeNode::constant(ConstExpr::Fetch {
            class_name: "NS\\Box".to_string(),
            name: "TYPE_*".to_string(),
        })
    );
}

#[test]
fn test_unknown_name_stays_unqualified() {
    let factory = factory();
    let scope = factory.scope_for(&Declaration::method("NS\\Box", "shape")).unwrap();
    let resolver = factory.type_resolver();

    assert_eq!(resolver.resolve_name(&scope, "Missing").unwrap(), "Missing");
    assert_eq!(resolver.resolve_name(&scope, "Bar").unwrap(), "NS\\Bar");
    assert_eq!(resolver.resolve_name(&scope, "\\Bar").unwrap(), "Bar");
    assert_eq!(resolver.resolve_name(&scope, "Coll\\Item").unwrap(), "Lib\\Collection\\Item");
    assert_eq!(resolver.resolve_name(&scope, "Mixed").unwrap(), "Mixed");
}

#[test]
fn test_namespace_without_existence_check() {
    let config = ResolverConfig {
        require_existing_namespaced_symbols: false,
        ..ResolverConfig::default()
    };
    let factory = factory().with_config(config);
    let scope = factory.scope_for(&Declaration::method("NS\\Box", "shape")).unwrap();

    assert_eq!(
        factory.type_resolver().resolve_name(&scope, "Missing").unwrap(),
        "NS\\Missing"
    );
}

#[test]
fn test_comment_without_scope() {
    let factory = factory();
    let tags = resolve_comment(&factory, "/** @param \\App\\User|Foo $user */").unwrap();
    assert_eq!(
        tags[0].ty(),
        Some(&TypeNode::union(vec![
            TypeNode::identifier("App\\User"),
            TypeNode::identifier("Foo"),
        ]))
    );
}

#[test]
fn test_closure_declaration() {
    let factory = factory();
    let closure = Declaration::Closure {
        file: Some("/src/NS/Box.php".into()),
        line: Some(13),
        scope_class: Some("NS\\Box".to_string()),
        doc_comment: Some("/** @return Foo|static */".to_string()),
    };
    let block = factory.create_from_declaration(&closure).unwrap();
    let TagValue::Return(tag) = block.tag("return").unwrap() else {
        panic!("expected a return tag");
    };
    assert_eq!(
        tag.ty,
        TypeNode::union(vec![TypeNode::identifier("Other\\Foo"), TypeNode::identifier("NS\\Box")])
    );
}

const AMOUNT: &str = r#"<?php
namespace App;

use App\Types\Integer;
use App\Types\Scalar;

/**
 * @template T of Foo
 */
class Amount
{
    /** @return Integer|Scalar|int */
    public function value() {}

    /** @return array{a: callable<T>(T): T, b: T} */
    public function mapper() {}
}

class Foo {}
"#;

fn amount_return_type(method: &str) -> TypeNode {
    let factory = DocBlockFactory::for_sources([("/src/App/Amount.php", AMOUNT)]);
    let block = factory
        .create_from_declaration(&Declaration::method("App\\Amount", method))
        .unwrap();
    match block.tag("@return").unwrap() {
        TagValue::Return(tag) => tag.ty,
        other => panic!("expected a return tag, got {:?}", other),
    }
}

#[test]
fn test_imported_class_named_like_keyword() {
    assert_eq!(
        amount_return_type("value"),
        TypeNode::union(vec![
            TypeNode::identifier("App\\Types\\Integer"),
            TypeNode::identifier("App\\Types\\Scalar"),
            TypeNode::identifier("int"),
        ])
    );
}

// ============================================================================
// Generics
// ============================================================================

#[test]
fn test_unbound_class_template() {
    let factory = factory();
    assert_eq!(return_type(&factory, "value"), TypeNode::identifier("TValue"));

    let TypeNode::TemplateGeneric(list) = return_type(&factory, "values") else {
        panic!("expected a template generic");
    };
    assert_eq!(list.generic.args, vec![TypeNode::identifier("TValue")]);
}

#[test]
fn test_bounded_template_uses_bound() {
    let factory = factory();
    let TypeNode::TemplateGeneric(collection) = return_type(&factory, "collection") else {
        panic!("expected a template generic");
    };
    assert_eq!(collection.generic.head, "Lib\\Collection");
    assert_eq!(
        collection.generic.args,
        vec![TypeNode::identifier("array-key"), TypeNode::identifier("TValue")]
    );
    // Unknown class-likes declare no template names.
    assert!(collection.template_names.is_empty());
}

#[test]
fn test_method_template_with_bound() {
    let factory = factory();
    let block = factory
        .create_from_declaration(&Declaration::method("NS\\Box", "make"))
        .unwrap();

    let TagValue::Param(param) = block.tag("@param").unwrap() else {
        panic!("expected a param tag");
    };
    let TypeNode::ConcreteGeneric(class_string) = param.ty else {
        panic!("expected a concrete generic");
    };
    assert_eq!(class_string.generic.args, vec![TypeNode::identifier("object")]);
    assert_eq!(class_string.template_names, vec!["T"]);

    assert_eq!(return_type(&factory, "make"), TypeNode::identifier("object"));
}

#[test]
fn test_class_like_generic_template_names() {
    let factory = factory();
    let block = factory
        .create_from_declaration(&Declaration::property("NS\\Box", "pair"))
        .unwrap();
    let TagValue::Var(var) = block.tag("@var").unwrap() else {
        panic!("expected a var tag");
    };
    let TypeNode::ConcreteGeneric(pair) = var.ty else {
        panic!("expected a concrete generic");
    };
    assert_eq!(pair.generic.head, "NS\\Pair");
    assert_eq!(pair.template_names, vec!["TFirst", "TSecond"]);
}

#[test]
fn test_local_alias_in_pseudo_generic() {
    let factory = factory();
    let TypeNode::ConcreteGeneric(key_of) = return_type(&factory, "colors") else {
        panic!("expected a concrete generic");
    };
    let TypeNode::TypeAlias(alias) = &key_of.generic.args[0] else {
        panic!("expected a type alias");
    };
    assert_eq!(alias.name, "TColors");
    assert_eq!(alias.declaring_type, "NS\\Box");
    assert!(matches!(*alias.ty, TypeNode::ArrayShape(_)));
}

#[test]
fn test_unbound_template_marks_flag() {
    let factory = factory();
    let block = factory.create_from_comment("/**\n * @template T\n * @return T\n */");
    let mut generics = block.generics_resolver().unwrap().fork();
    assert!(generics.is_concrete());

    let ty = factory
        .type_resolver()
        .resolve(block.scope(), TypeNode::identifier("T"), &mut generics)
        .unwrap();
    assert_eq!(ty, TypeNode::identifier("T"));
    assert!(!generics.is_concrete());

    // Each tag gets its own pass; the block's generics stay untouched.
    assert!(block.generics_resolver().unwrap().is_concrete());
}

#[test]
fn test_positional_binding() {
    let factory = factory();
    let scope = Scope::new("").with_file("/src/NS/Box.php").with_line(13);
    let mut generics = GenericsResolver::new();
    generics.set_template_type("TFirst", TypeNode::template("TFirst", None));

    let ty = factory
        .type_resolver()
        .resolve(&scope, parse_type("Pair<int, string>").unwrap(), &mut generics)
        .unwrap();

    assert!(matches!(ty, TypeNode::ConcreteGeneric(_)));
    assert_eq!(generics.map("TFirst"), Some(TypeNode::identifier("int")));
    assert_eq!(generics.template_names(), vec!["TFirst"]);
}

#[test]
fn test_nested_template_generic() {
    let factory = factory();
    let tags = resolve_comment(&factory, "/**\n * @template T\n * @return \\Payload<\\Payload<T>>\n */").unwrap();
    let TypeNode::TemplateGeneric(outer) = tags[1].ty().cloned().unwrap() else {
        panic!("expected a template generic");
    };
    let TypeNode::TemplateGeneric(inner) = &outer.generic.args[0] else {
        panic!("expected a nested template generic");
    };
    assert_eq!(inner.generic.head, "Payload");
    assert_eq!(inner.generic.args, vec![TypeNode::identifier("T")]);
}

#[test]
fn test_int_range_keeps_bounds() {
    let factory = factory();
    let tags = resolve_comment(&factory, "/** @return int<0, max> */").unwrap();
    let TypeNode::ConcreteGeneric(range) = tags[0].ty().cloned().unwrap() else {
        panic!("expected a concrete generic");
    };
    assert_eq!(range.generic.args[1], TypeNode::identifier("max"));
    assert_eq!(range.template_names, vec!["TMin", "TMax"]);
}

#[test]
fn test_callable_templates_stay_unresolved() {
    let factory = factory();
    let scope = factory.scope_for(&Declaration::method("NS\\Box", "shape")).unwrap();
    let mut generics = GenericsResolver::new();

    let ty = factory
        .type_resolver()
        .resolve(&scope, parse_type("callable<T>(T, Foo): T").unwrap(), &mut generics)
        .unwrap();
    let TypeNode::Callable(callable) = ty else {
        panic!("expected a callable");
    };
    assert_eq!(callable.identifier, "callable");
    assert_eq!(callable.parameters[0].ty, TypeNode::identifier("T"));
    assert_eq!(callable.parameters[1].ty, TypeNode::identifier("Other\\Foo"));
    assert_eq!(*callable.return_type, TypeNode::identifier("T"));
    assert_eq!(callable.templates[0].name, "T");
}

#[test]
fn test_callable_templates_do_not_leak() {
    let TypeNode::ArrayShape(shape) = amount_return_type("mapper") else {
        panic!("expected an array shape");
    };

    let TypeNode::Callable(callable) = &shape.items[0].value else {
        panic!("expected a callable, got {:?}", shape.items[0].value);
    };
    assert_eq!(callable.parameters[0].ty, TypeNode::identifier("T"));
    assert_eq!(*callable.return_type, TypeNode::identifier("T"));

    // Outside the callable, T is the class template again.
    assert_eq!(shape.items[1].value, TypeNode::identifier("App\\Foo"));
}

#[test]
fn test_conditional_keeps_parameter_subject() {
    let factory = factory();
    let scope = factory.scope_for(&Declaration::method("NS\\Box", "shape")).unwrap();
    let mut generics = GenericsResolver::new();

    let ty = factory
        .type_resolver()
        .resolve(&scope, parse_type("($value is null ? Foo : Bar)").unwrap(), &mut generics)
        .unwrap();
    let TypeNode::Conditional(conditional) = ty else {
        panic!("expected a conditional");
    };
    assert_eq!(conditional.subject, ConditionalSubject::Parameter("$value".to_string()));
    assert_eq!(*conditional.if_type, TypeNode::identifier("Other\\Foo"));
    assert_eq!(*conditional.else_type, TypeNode::identifier("NS\\Bar"));
}

#[test]
fn test_resolution_is_idempotent() {
    let factory = factory();
    let scope = factory.scope_for(&Declaration::method("NS\\Box", "shape")).unwrap();
    let resolver = factory.type_resolver();
    let source = parse_type("array{1: list<Foo>, 2?: Bar[]}|Pair<int, self>").unwrap();

    let once = resolver
        .resolve(&scope, source, &mut scope.generics.fork())
        .unwrap();
    let twice = resolver
        .resolve(&scope, once.clone(), &mut scope.generics.fork())
        .unwrap();
    assert_eq!(once, twice);
}

#[test]
fn test_invalid_type_passes_through() {
    let factory = factory();
    let tags = resolve_comment(&factory, "/** @return array<int */").unwrap();
    assert!(matches!(tags[0], TagValue::Invalid { .. }) || matches!(tags[0].ty(), Some(TypeNode::Invalid(_))));
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_relative_type_without_class() {
    let factory = factory();
    let err = resolve_comment(&factory, "/** @return static */").unwrap_err();
    assert_eq!(
        err,
        ResolveError::UnresolvableRelativeType {
            symbol: "static".to_string()
        }
    );
}

#[test]
fn test_parent_without_parent_class() {
    let factory = factory();
    let block = factory.create_from_scope(Scope::new("/** @return parent */").with_declaring_type("NS\\Base"));
    let err = block.tag("@return").unwrap_err();
    assert_eq!(
        err,
        TagError::Resolve(ResolveError::NoParentType {
            class: "NS\\Base".to_string()
        })
    );
    assert_eq!(err.to_string(), "Class/type `NS\\Base` doesn't have a parent");
}

#[test]
fn test_alias_requires_class() {
    let factory = factory();
    let err = resolve_comment(&factory, "/**\n * @phpstan-type Id = int\n * @return Id\n */").unwrap_err();
    assert_eq!(
        err,
        ResolveError::AliasRequiresDeclaringType {
            alias: "Id".to_string()
        }
    );
}

#[test]
fn test_pseudo_generic_arity() {
    let factory = factory();
    let err = resolve_comment(&factory, "/** @return array<int, string, bool> */").unwrap_err();
    assert_eq!(
        err,
        ResolveError::GenericArityMismatch {
            head: "array".to_string(),
            expected: "1 or 2".to_string(),
            actual: 3,
        }
    );
}

#[test]
fn test_unknown_declaration() {
    let factory = factory();
    let err = factory
        .create_from_declaration(&Declaration::class("NS\\Nope"))
        .err()
        .unwrap();
    assert_eq!(
        err,
        ResolveError::UnknownDeclaration {
            declaration: "class `NS\\Nope`".to_string()
        }
    );
}
