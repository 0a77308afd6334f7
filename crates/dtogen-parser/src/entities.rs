//! Extract entity metadata (name, namespace, base class, classified
//! properties) from a C# entity class.

use crate::error::ExtractError;
use crate::inspect::BaseTypeLocator;
use crate::resolver::{RelatedUnitResolver, base_identifier};
use crate::syntax::{self, TypeRef};
use crate::treesitter::SourceUnit;
use dtogen_core::config::InheritanceConfig;
use dtogen_core::model::{EntityMetadata, PropertyMetadata, SyntaxSpan};
use rayon::prelude::*;
use std::collections::HashSet;
use tree_sitter::Node;

/// Literal token whose presence marks a DTO as a WCF data contract.
pub const DATA_CONTRACT_MARKER: &str = "[DataContract]";

/// Parse raw source text and extract its single entity class.
pub fn parse_from_text(code: &str) -> Result<EntityMetadata, ExtractError> {
    let unit = SourceUnit::parse(code)?;
    extract_entity(&unit)
}

/// Extract an entity from a parsed unit, ignoring inheritance.
///
/// The unit must contain exactly one class declaration outside of any other
/// class; nested classes are not counted.
pub fn extract_entity(unit: &SourceUnit) -> Result<EntityMetadata, ExtractError> {
    let root = unit.root();
    let classes = syntax::top_level_classes(&root);
    let [class] = classes.as_slice() else {
        return Err(ExtractError::Shape {
            found: classes.len(),
        });
    };

    let name = syntax::declaration_name(unit, class).unwrap_or_default();
    let namespace = syntax::first_namespace_name(unit).unwrap_or_default();
    let mut metadata = EntityMetadata::new(name, namespace);

    if let Some(base) = syntax::first_base_type(unit, class)
        && !syntax::looks_like_interface(base)
    {
        metadata.set_base_class(base);
    }

    metadata.properties = syntax::class_properties(class)
        .iter()
        .filter(|p| syntax::is_public_read_write(unit, p))
        .filter_map(|p| extract_property(unit, p))
        .collect();

    tracing::debug!(
        entity = %metadata.name,
        namespace = %metadata.namespace,
        base = ?metadata.base_class_name,
        properties = metadata.properties.len(),
        "extracted entity"
    );
    Ok(metadata)
}

fn extract_property(unit: &SourceUnit, node: &Node<'_>) -> Option<PropertyMetadata> {
    let name = syntax::declaration_name(unit, node)?;
    let type_node = node.child_by_field_name("type")?;
    let ty = TypeRef::from_node(&type_node, unit.text());

    let is_simple_property = ty.is_simple_property();
    let is_relation = !is_simple_property;
    let related_entity_name = if is_relation {
        ty.related_entity_name().map(String::from)
    } else {
        None
    };
    tracing::trace!(
        property = name,
        ty = ty.text,
        simple = is_simple_property,
        related = ?related_entity_name,
        "classified property"
    );

    Some(PropertyMetadata {
        type_name: ty.text.to_string(),
        name: name.to_string(),
        is_simple_property,
        is_collection: ty.is_collection(),
        is_relation,
        related_entity_name,
        is_inherited: false,
        span: SyntaxSpan {
            start_byte: node.start_byte(),
            end_byte: node.end_byte(),
            line_start: node.start_position().row + 1,
            line_end: node.end_position().row + 1,
            source_text: unit.node_text(node).to_string(),
        },
    })
}

/// Extract an entity, optionally appending every property inherited along
/// its base-class chain, with the default depth limit.
pub async fn parse_from_unit<R: RelatedUnitResolver>(
    unit: &SourceUnit,
    resolver: &R,
    include_inherited: bool,
) -> Result<EntityMetadata, ExtractError> {
    parse_from_unit_with(unit, resolver, include_inherited, &InheritanceConfig::default()).await
}

/// Extract an entity and merge inherited properties.
///
/// Base classes are fetched one link at a time from `resolver`. A base the
/// resolver cannot find ends the chain without error. A base already seen
/// in the chain is a [`ExtractError::CyclicInheritance`]. Inherited
/// properties keep their own chain order: the direct base's own properties
/// first, then its base's, and so on.
pub async fn parse_from_unit_with<R: RelatedUnitResolver>(
    unit: &SourceUnit,
    resolver: &R,
    include_inherited: bool,
    config: &InheritanceConfig,
) -> Result<EntityMetadata, ExtractError> {
    let mut metadata = extract_entity(unit)?;
    if !include_inherited {
        return Ok(metadata);
    }

    let mut chain = vec![metadata.name.clone()];
    let mut visited: HashSet<String> = HashSet::from([metadata.name.clone()]);
    let mut next = metadata.base_class_name.clone();

    while let Some(base) = next {
        let key = base_identifier(&base).to_string();
        chain.push(base.clone());
        if !visited.insert(key) {
            return Err(ExtractError::CyclicInheritance { chain });
        }

        let Some(base_unit) = resolver.resolve(&base).await? else {
            tracing::debug!(entity = %metadata.name, base = %base, "base class not resolved");
            break;
        };
        if chain.len() - 1 > config.max_depth {
            return Err(ExtractError::InheritanceTooDeep {
                entity: metadata.name.clone(),
                limit: config.max_depth,
            });
        }

        let base_metadata = extract_entity(&base_unit)?;
        // A resolver may hand back the same class under another spelling.
        if base_metadata.name != base_identifier(&base)
            && !visited.insert(base_metadata.name.clone())
        {
            chain.push(base_metadata.name);
            return Err(ExtractError::CyclicInheritance { chain });
        }
        next = base_metadata.base_class_name;
        metadata.append_inherited(base_metadata.properties);
    }

    Ok(metadata)
}

/// Extract many independent units in parallel, preserving input order.
pub fn parse_many(units: &[SourceUnit]) -> Vec<Result<EntityMetadata, ExtractError>> {
    units.par_iter().map(extract_entity).collect()
}

/// Whether an existing generated DTO already derives from `expected_base_dto_name`.
/// An absent file is the first-generation case and answers `false`.
pub fn has_base_dto(existing: Option<&SourceUnit>, expected_base_dto_name: &str) -> bool {
    let Some(unit) = existing else {
        return false;
    };
    BaseTypeLocator::locate(unit).is_some_and(|name| name == expected_base_dto_name)
}

/// Whether an existing generated DTO carries the `[DataContract]` marker.
///
/// This is a plain substring test over the full text, so the token inside a
/// comment or string literal also counts.
pub fn has_marker_attribute(existing: Option<&SourceUnit>) -> bool {
    existing.is_some_and(|unit| unit.text().contains(DATA_CONTRACT_MARKER))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::{InMemoryResolver, NoopResolver};

    const FOO: &str = r"
namespace Ns
{
    public class Foo : Bar
    {
        public int Id { get; set; }
        public List<Child> Items { get; set; }
    }
}
";

    #[test]
    fn test_foo_scenario() {
        let meta = parse_from_text(FOO).unwrap();
        assert_eq!(meta.name, "Foo");
        assert_eq!(meta.namespace, "Ns");
        assert_eq!(meta.base_class_name.as_deref(), Some("Bar"));
        assert_eq!(meta.base_class_dto_name.as_deref(), Some("BarDTO"));
        assert_eq!(meta.properties.len(), 2);

        let id = &meta.properties[0];
        assert_eq!(id.name, "Id");
        assert_eq!(id.type_name, "int");
        assert!(id.is_simple_property && !id.is_collection && !id.is_relation);
        assert!(id.related_entity_name.is_none());

        let items = &meta.properties[1];
        assert_eq!(items.name, "Items");
        assert!(items.is_collection && items.is_relation && !items.is_simple_property);
        assert_eq!(items.related_entity_name.as_deref(), Some("Child"));
        assert!(items.span.source_text.starts_with("public List<Child> Items"));
        assert_eq!(items.span.line_start, 7);
    }

    #[test]
    fn test_span_byte_range_matches_source() {
        let meta = parse_from_text(FOO).unwrap();
        let id = &meta.properties[0];
        assert_eq!(&FOO[id.span.byte_range()], id.span.source_text);
    }

    #[tokio::test]
    async fn test_inherited_with_noop_resolver_equals_plain() {
        let unit = SourceUnit::parse(FOO).unwrap();
        let plain = extract_entity(&unit).unwrap();
        let merged = parse_from_unit(&unit, &NoopResolver, true).await.unwrap();
        assert_eq!(plain, merged);
    }

    #[tokio::test]
    async fn test_depth_limit() {
        let resolver = InMemoryResolver::new()
            .with_source("B", "class B : C { public int Bp { get; set; } }")
            .with_source("C", "class C : D { public int Cp { get; set; } }")
            .with_source("D", "class D { public int Dp { get; set; } }");
        let unit = SourceUnit::parse("class A : B { public int Ap { get; set; } }").unwrap();

        let config = InheritanceConfig { max_depth: 2 };
        let err = parse_from_unit_with(&unit, &resolver, true, &config)
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractError::InheritanceTooDeep { limit: 2, .. }));

        let config = InheritanceConfig { max_depth: 3 };
        let meta = parse_from_unit_with(&unit, &resolver, true, &config)
            .await
            .unwrap();
        assert_eq!(meta.properties.len(), 4);
    }

    #[test]
    fn test_parse_many_preserves_order() {
        let units: Vec<SourceUnit> = ["class A { }", "class B { }", "class X { } class Y { }"]
            .iter()
            .map(|src| SourceUnit::parse(*src).unwrap())
            .collect();
        let results = parse_many(&units);
        assert_eq!(results[0].as_ref().unwrap().name, "A");
        assert_eq!(results[1].as_ref().unwrap().name, "B");
        assert!(matches!(results[2], Err(ExtractError::Shape { found: 2 })));
    }
}
