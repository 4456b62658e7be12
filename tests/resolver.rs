//! Tests for tag resolution against metadata
//!
//! Most tests use the YAML fixture in `tests/fixtures`, which mirrors how a form-building class
//! is annotated. A hand-written provider checks that the resolver only relies on the trait.

use annotag::ast::{ParsedAnnotation, Value};
use annotag::formats::{render, OutputFormat};
use annotag::metadata::{
    ClassDescriptor, ClassMetadata, EnumerateError, MetadataProvider, MetadataTable,
    PropertyEnumerator,
};
use annotag::resolver::{
    AnnotationCache, AnnotationResolver, CacheKey, MemoryCache, PropertySelector, Resolution,
    ResolveError,
};
use rstest::{fixture, rstest};
use std::path::PathBuf;

const PERSON: &str = r"App\Domain\Person";
const ADDRESS: &str = r"App\Domain\Address";

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[fixture]
fn table() -> MetadataTable {
    MetadataTable::load(fixture_path("person.yaml")).unwrap()
}

fn json<T: serde::Serialize>(value: &T) -> String {
    render(value, OutputFormat::Json, false).unwrap()
}

#[rstest]
fn test_untagged_class_is_not_found(table: MetadataTable) {
    let resolver = AnnotationResolver::new(&table);
    assert_eq!(resolver.resolve_class_annotation(PERSON, "flux.grid").unwrap(), None);
    assert_eq!(
        resolver
            .resolve(PERSON, "flux.grid", &PropertySelector::Class)
            .unwrap(),
        Resolution::NotFound
    );
}

#[rstest]
fn test_class_tagged_without_arguments_is_a_flag(table: MetadataTable) {
    let resolver = AnnotationResolver::new(&table);
    assert_eq!(
        resolver.resolve_class_annotation(PERSON, "flux.sheet").unwrap(),
        Some(ParsedAnnotation::Flag)
    );
}

#[rstest]
fn test_class_annotation(table: MetadataTable) {
    let resolver = AnnotationResolver::new(&table);
    let annotation = resolver
        .resolve_class_annotation(PERSON, "flux.form")
        .unwrap()
        .unwrap();
    insta::assert_snapshot!(
        json(&annotation),
        @r#"{"type":"","config":{"id":"person","label":"Person"}}"#
    );
}

#[rstest]
fn test_all_properties_in_property_order(table: MetadataTable) {
    let resolver = AnnotationResolver::new(&table);
    let properties = resolver
        .resolve_all_property_annotations(PERSON, "flux.form.field")
        .unwrap();
    insta::assert_snapshot!(
        json(&properties),
        @r#"{"name":{"type":"input","config":{"size":40}},"age":{"type":"input","config":{"size":3,"age":{"min":0,"max":130}}},"email":[{"type":"input","config":{"type":"email"}},{"type":"validate","config":{"pattern":".+@.+"}}]}"#
    );
}

#[rstest]
fn test_all_properties_without_any_tagged_is_empty(table: MetadataTable) {
    let resolver = AnnotationResolver::new(&table);
    let properties = resolver
        .resolve_all_property_annotations(PERSON, "flux.grid.column")
        .unwrap();
    assert!(properties.is_empty());

    let resolution = resolver
        .resolve(PERSON, "flux.grid.column", &PropertySelector::AllProperties)
        .unwrap();
    assert_eq!(resolution, Resolution::Properties(Default::default()));
    assert_eq!(json(&resolution), "{}");
}

#[rstest]
fn test_all_properties_skips_untagged(table: MetadataTable) {
    let resolver = AnnotationResolver::new(&table);
    let hidden = resolver
        .resolve_all_property_annotations(PERSON, "flux.form.hidden")
        .unwrap();
    assert_eq!(hidden.len(), 1);
    assert_eq!(hidden.get("email"), Some(&ParsedAnnotation::Flag));
}

#[rstest]
#[case::tagged("name", Some("input"))]
#[case::untagged("active", None)]
#[case::unknown("nickname", None)]
fn test_single_property(
    table: MetadataTable,
    #[case] property: &str,
    #[case] expected_type: Option<&str>,
) {
    let resolver = AnnotationResolver::new(&table);
    let annotation = resolver
        .resolve_property_annotation(PERSON, property, "flux.form.field")
        .unwrap();
    assert_eq!(
        annotation.as_ref().and_then(ParsedAnnotation::type_name),
        expected_type
    );
}

#[rstest]
fn test_property_entry_is_unwrapped(table: MetadataTable) {
    let resolver = AnnotationResolver::new(&table);
    let resolution = resolver
        .resolve(PERSON, "flux.form.field", &PropertySelector::property("age"))
        .unwrap();
    insta::assert_snapshot!(json(&resolution), @r#"{"min":0,"max":130}"#);

    let name = resolver
        .resolve(PERSON, "flux.form.field", &PropertySelector::property("name"))
        .unwrap();
    assert_eq!(name.annotation().and_then(|a| a.get("size")), Some(&Value::Integer(40)));
}

#[rstest]
fn test_not_found_renders_null(table: MetadataTable) {
    let resolver = AnnotationResolver::new(&table);
    let resolution = resolver
        .resolve(PERSON, "flux.form.field", &PropertySelector::property("active"))
        .unwrap();
    assert_eq!(json(&resolution), "null");
}

#[rstest]
fn test_malformed_property_value_is_an_error(table: MetadataTable) {
    let resolver = AnnotationResolver::new(&table);
    let error = resolver
        .resolve_all_property_annotations(ADDRESS, "flux.form.field")
        .unwrap_err();
    match &error {
        ResolveError::Parse { target, tag, .. } => {
            assert_eq!(target, r"App\Domain\Address::street");
            assert_eq!(tag, "flux.form.field");
        }
        other => panic!("expected a parse error, got {:?}", other),
    }
    assert!(error.to_string().starts_with("malformed `flux.form.field` annotation"));
}

#[rstest]
fn test_unknown_class_cannot_be_enumerated(table: MetadataTable) {
    let resolver = AnnotationResolver::new(&table);
    let error = resolver
        .resolve_all_property_annotations("Nobody", "flux.form.field")
        .unwrap_err();
    assert!(matches!(
        error,
        ResolveError::InvalidInput(EnumerateError::InvalidInput { ref kind }) if kind == "undefined"
    ));
}

#[test]
fn test_property_order_from_accessors() {
    let descriptor = ClassDescriptor::object(["a", "b"], ["getC", "isD", "getA"]);
    let order = PropertyEnumerator::enumerate(&descriptor).unwrap();
    assert_eq!(order.as_slice(), ["a", "b", "c", "d"]);
}

#[rstest]
fn test_fixture_property_order(table: MetadataTable) {
    let order = PropertyEnumerator::enumerate(&table.describe(PERSON)).unwrap();
    insta::assert_snapshot!(json(&order), @r#"["name","age","email","active"]"#);
}

#[test]
fn test_json_table_matches_yaml_shape() {
    let table = MetadataTable::load(fixture_path("person.json")).unwrap();
    let resolver = AnnotationResolver::new(&table);
    let name = resolver
        .resolve_property_annotation(PERSON, "name", "flux.form.field")
        .unwrap();
    assert_eq!(
        name.as_ref().and_then(|a| a.get("size")),
        Some(&Value::Integer(40))
    );
}

#[test]
fn test_missing_table_file() {
    let error = MetadataTable::load(fixture_path("missing.yaml")).unwrap_err();
    assert!(error.to_string().contains("missing.yaml"));
}

#[test]
fn test_cache_serves_repeated_lookups() {
    let table = MetadataTable::new().with_class(
        "Person",
        ClassMetadata::new()
            .tag("form", Vec::<String>::new())
            .property_tag("name", "field", ["input(name=1)"]),
    );
    let cache = MemoryCache::new();
    let resolver = AnnotationResolver::new(&table).with_cache(&cache);

    let first = resolver
        .resolve("Person", "form", &PropertySelector::Class)
        .unwrap();
    let second = resolver
        .resolve("Person", "form", &PropertySelector::Class)
        .unwrap();
    assert_eq!(first, second);
    assert_eq!(cache.len(), 1);

    // The cache keeps the whole annotation; the entry is unwrapped per call.
    let entry = resolver
        .resolve("Person", "field", &PropertySelector::property("name"))
        .unwrap();
    assert_eq!(entry, Resolution::Entry(Value::Integer(1)));
    let cached = cache
        .get(&CacheKey::new("Person", "field", &PropertySelector::property("name")))
        .unwrap();
    assert_eq!(cached.annotation().and_then(|a| a.type_name()), Some("input"));
}

#[test]
fn test_cached_value_is_returned_without_asking_the_provider() {
    let table = MetadataTable::new();
    let cache = MemoryCache::new();
    let key = CacheKey::new("Ghost", "form", &PropertySelector::Class);
    cache.put(key, Resolution::Annotation(ParsedAnnotation::Flag));

    let resolver = AnnotationResolver::new(&table).with_cache(&cache);
    assert_eq!(
        resolver.resolve_class_annotation("Ghost", "form").unwrap(),
        Some(ParsedAnnotation::Flag)
    );
}

#[test]
fn test_errors_are_not_cached() {
    let table = MetadataTable::new().with_class(
        "Broken",
        ClassMetadata::new().tag("form", ["input(size="]),
    );
    let cache = MemoryCache::new();
    let resolver = AnnotationResolver::new(&table).with_cache(&cache);
    assert!(resolver.resolve_class_annotation("Broken", "form").is_err());
    assert!(cache.is_empty());
}

/// Provider over a fixed list of members, answering tag queries by naming convention
struct ConventionProvider;

impl MetadataProvider for ConventionProvider {
    fn class_is_tagged(&self, _class: &str, tag: &str) -> bool {
        tag == "entity"
    }

    fn class_tag_values(&self, class: &str, _tag: &str) -> Vec<String> {
        vec![format!("entity(table='{}')", class.to_lowercase())]
    }

    fn property_is_tagged(&self, _class: &str, property: &str, _tag: &str) -> bool {
        property.ends_with("_id")
    }

    fn property_tag_values(&self, class: &str, property: &str, tag: &str) -> Option<Vec<String>> {
        self.property_is_tagged(class, property, tag)
            .then(|| vec!["relation".to_string()])
    }

    fn declared_field_names(&self, _class: &str) -> Vec<String> {
        vec!["owner_id".to_string(), "title".to_string()]
    }

    fn method_names(&self, _class: &str) -> Vec<String> {
        vec!["getParent_id".to_string()]
    }

    fn describe(&self, class: &str) -> ClassDescriptor {
        if class.is_empty() {
            return ClassDescriptor::other("string");
        }
        ClassDescriptor::object(self.declared_field_names(class), self.method_names(class))
    }
}

#[test]
fn test_custom_provider() {
    let provider = ConventionProvider;
    let resolver = AnnotationResolver::new(&provider);

    let entity = resolver.resolve_class_annotation("Post", "entity").unwrap();
    assert_eq!(
        entity.as_ref().and_then(|a| a.get("table")),
        Some(&Value::Text("post".to_string()))
    );

    // `parent_id` comes from an accessor only, so it is not a declared property.
    let relations = resolver
        .resolve_all_property_annotations("Post", "relation")
        .unwrap();
    assert_eq!(relations.keys().collect::<Vec<_>>(), vec!["owner_id"]);

    let error = resolver
        .resolve_all_property_annotations("", "relation")
        .unwrap_err();
    assert_eq!(
        error.to_string(),
        "expected an object-like class, string given"
    );
}
