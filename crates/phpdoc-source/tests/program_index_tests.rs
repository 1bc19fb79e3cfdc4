use phpdoc_source::{ClassKind, ProgramIndex, SourceError};
use std::path::Path;

const MODELS: &str = r#"<?php
namespace App\Models;

use Lib\Base\Model;
use Lib\Contracts\{Arrayable, Jsonable as Json};

/**
 * @template T
 */
final class User extends Model implements Arrayable, Json
{
    use HasFactory;

    /** @var list<T> */
    public array $items = [];

    /** The status */
    const STATUS = 'active', OTHER = 'x';

    /**
     * @return T
     */
    public function first(): mixed
    {
        $callback = function ($x) use ($items) { return $x; };
        return new class { public $inner; public function hidden() {} };
    }

    public static function &byRef(int $a, $b = self::STATUS) {}

    public function list() {}
}

interface Repository extends \Countable {}

enum Suit: string {
    case Hearts = 'H';
    case Spades = 'S';
}

/** Helper */
function helper() {}
"#;

fn line_of(source: &str, needle: &str) -> u32 {
    let offset = source.find(needle).expect("needle in source");
    source[..offset].matches('\n').count() as u32 + 1
}

fn index() -> ProgramIndex {
    let mut index = ProgramIndex::new();
    index.add_source("/src/Models.php", MODELS);
    index
}

#[test]
fn test_class_header() {
    let index = index();
    let user = index.class_like("App\\Models\\User").expect("user class");

    assert_eq!(user.kind, ClassKind::Class);
    assert_eq!(user.short_name(), "User");
    assert_eq!(user.file, Path::new("/src/Models.php"));
    assert_eq!(user.line, line_of(MODELS, "final class User"));
    assert_eq!(user.parent.as_deref(), Some("Lib\\Base\\Model"));
    assert_eq!(user.interfaces, vec!["Lib\\Contracts\\Arrayable", "Lib\\Contracts\\Jsonable"]);
    assert!(user.doc_comment.as_deref().unwrap().contains("@template T"));
    assert_eq!(user.end_line, line_of(MODELS, "interface Repository") - 2);
}

#[test]
fn test_class_lookup_is_case_insensitive() {
    let index = index();
    assert!(index.class_like("\\app\\models\\USER").is_some());
    assert!(index.class_like("App\\Models\\Missing").is_none());
}

#[test]
fn test_methods() {
    let index = index();
    let user = index.class_like("App\\Models\\User").unwrap();
    let names: Vec<_> = user.methods.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["first", "byRef", "list"]);

    let first = user.method("FIRST").expect("case-insensitive method");
    assert_eq!(first.line, line_of(MODELS, "public function first"));
    assert!(first.doc_comment.as_deref().unwrap().contains("@return T"));
    assert!(user.method("byref").unwrap().doc_comment.is_none());
}

#[test]
fn test_properties_and_constants() {
    let index = index();
    let user = index.class_like("App\\Models\\User").unwrap();

    let names: Vec<_> = user.properties.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["items"]);
    let items = user.property("$items").unwrap();
    assert_eq!(items.doc_comment.as_deref(), Some("/** @var list<T> */"));

    let status = user.constant("STATUS").unwrap();
    assert_eq!(status.doc_comment.as_deref(), Some("/** The status */"));
    assert!(user.constant("OTHER").unwrap().doc_comment.is_none());
}

#[test]
fn test_interface_and_enum() {
    let index = index();

    let repository = index.class_like("App\\Models\\Repository").unwrap();
    assert_eq!(repository.kind, ClassKind::Interface);
    assert_eq!(repository.parent, None);
    assert_eq!(repository.interfaces, vec!["Countable"]);

    let suit = index.class_like("App\\Models\\Suit").unwrap();
    assert_eq!(suit.kind, ClassKind::Enum);
    let cases: Vec<_> = suit.constants.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(cases, vec!["Hearts", "Spades"]);
}

#[test]
fn test_functions_are_namespaced() {
    let index = index();
    let helper = index.function("App\\Models\\helper").expect("helper function");
    assert_eq!(helper.doc_comment.as_deref(), Some("/** Helper */"));
    assert_eq!(helper.line, line_of(MODELS, "function helper"));
    // Closures and anonymous class methods are not top-level functions.
    assert_eq!(index.functions().count(), 1);
    assert_eq!(index.classes().count(), 3);
}

#[test]
fn test_file_namespace_index_is_kept() {
    let index = index();
    let namespaces = index.namespace_index(Path::new("/src/Models.php")).unwrap();
    assert_eq!(namespaces.namespace_at(Some(10)), "App\\Models");
}

#[test]
fn test_add_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Greeter.php");
    std::fs::write(&path, "<?php\nclass Greeter { public function greet() {} }\n").unwrap();

    let mut index = ProgramIndex::new();
    index.add_file(&path).unwrap();
    let greeter = index.class_like("Greeter").unwrap();
    assert_eq!(greeter.file, path);
    assert_eq!(greeter.methods.len(), 1);
}

#[test]
fn test_add_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Nope.php");

    let mut index = ProgramIndex::new();
    let error = index.add_file(&path).unwrap_err();
    assert!(matches!(&error, SourceError::Io { .. }));
    assert_eq!(error.path(), &path);
}
