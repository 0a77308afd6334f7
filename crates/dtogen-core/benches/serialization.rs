use criterion::{Criterion, criterion_group, criterion_main};
use dtogen_core::model::{EntityMetadata, PropertyMetadata, SyntaxSpan};
use std::hint::black_box;

fn make_property(name: &str, type_name: &str, line: usize) -> PropertyMetadata {
    let simple = matches!(type_name, "int" | "string" | "DateTime" | "Guid");
    let source_text = format!("public {} {} {{ get; set; }}", type_name, name);
    PropertyMetadata {
        type_name: type_name.to_string(),
        name: name.to_string(),
        is_simple_property: simple,
        is_collection: type_name.starts_with("List<"),
        is_relation: !simple,
        related_entity_name: (!simple).then(|| "Course".to_string()),
        is_inherited: false,
        span: SyntaxSpan {
            start_byte: line * 40,
            end_byte: line * 40 + source_text.len(),
            line_start: line,
            line_end: line,
            source_text,
        },
    }
}

fn build_entity(property_count: usize) -> EntityMetadata {
    let types = ["int", "string", "DateTime", "Guid", "Course", "List<Course>"];
    let mut entity = EntityMetadata::new("Student", "School.Model");
    entity.set_base_class("Person");
    entity.properties = (0..property_count)
        .map(|i| make_property(&format!("Property{}", i), types[i % types.len()], i + 5))
        .collect();
    entity
}

fn bench_serialization_50(c: &mut Criterion) {
    let entity = build_entity(50);

    c.bench_function("serialize_json_50_properties", |b| {
        b.iter(|| serde_json::to_string(black_box(&entity)).unwrap())
    });
}

fn bench_deserialization_50(c: &mut Criterion) {
    let entity = build_entity(50);
    let json = serde_json::to_string(&entity).unwrap();

    c.bench_function("deserialize_json_50_properties", |b| {
        b.iter(|| serde_json::from_str::<EntityMetadata>(black_box(&json)).unwrap())
    });
}

fn bench_relation_filter_500(c: &mut Criterion) {
    let entity = build_entity(500);

    c.bench_function("relation_properties_500", |b| {
        b.iter(|| black_box(&entity).relation_properties().count())
    });
}

criterion_group!(
    benches,
    bench_serialization_50,
    bench_deserialization_50,
    bench_relation_filter_500,
);
criterion_main!(benches);
