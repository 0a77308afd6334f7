//! Entity metadata model: the language-agnostic shape of one entity class.

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Fixed suffix appended to an entity name to form its DTO name.
pub const DTO_SUFFIX: &str = "DTO";

/// The DTO type name for an entity or base class name.
pub fn dto_name_for(name: &str) -> String {
    format!("{}{}", name, DTO_SUFFIX)
}

/// One class's extracted shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityMetadata {
    pub name: String,
    /// Enclosing namespace path. Empty when the class is in the global namespace.
    pub namespace: String,
    /// First listed base type, when it is a concrete class rather than an interface.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_class_name: Option<String>,
    /// Always `base_class_name + "DTO"` when a base class is present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_class_dto_name: Option<String>,
    /// Own properties in declaration order, followed by inherited ones.
    pub properties: Vec<PropertyMetadata>,
}

impl EntityMetadata {
    /// Create metadata for a class with no base class and no properties.
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            ..Self::default()
        }
    }

    /// Record the concrete base class, deriving its DTO name.
    pub fn set_base_class(&mut self, base_class_name: impl Into<String>) {
        let base = base_class_name.into();
        self.base_class_dto_name = Some(dto_name_for(&base));
        self.base_class_name = Some(base);
    }

    /// Name of the DTO generated for this entity.
    pub fn dto_name(&self) -> String {
        dto_name_for(&self.name)
    }

    /// Append a base class's properties, marking each as inherited.
    pub fn append_inherited(&mut self, properties: Vec<PropertyMetadata>) {
        self.properties
            .extend(properties.into_iter().map(PropertyMetadata::into_inherited));
    }

    pub fn own_properties(&self) -> impl Iterator<Item = &PropertyMetadata> {
        self.properties.iter().filter(|p| !p.is_inherited)
    }

    pub fn inherited_properties(&self) -> impl Iterator<Item = &PropertyMetadata> {
        self.properties.iter().filter(|p| p.is_inherited)
    }

    pub fn simple_properties(&self) -> impl Iterator<Item = &PropertyMetadata> {
        self.properties.iter().filter(|p| p.is_simple_property)
    }

    pub fn relation_properties(&self) -> impl Iterator<Item = &PropertyMetadata> {
        self.properties.iter().filter(|p| p.is_relation)
    }

    /// Look up a property by name.
    pub fn property(&self, name: &str) -> Option<&PropertyMetadata> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// One property's extracted shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyMetadata {
    /// Declared type exactly as written in source.
    #[serde(rename = "type")]
    pub type_name: String,
    pub name: String,
    pub is_simple_property: bool,
    pub is_collection: bool,
    pub is_relation: bool,
    /// Entity referenced by a relation property, when syntactically determinable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_entity_name: Option<String>,
    #[serde(default)]
    pub is_inherited: bool,
    pub span: SyntaxSpan,
}

impl PropertyMetadata {
    fn into_inherited(mut self) -> Self {
        self.is_inherited = true;
        self
    }
}

/// Location and text of the declaration a property was extracted from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntaxSpan {
    pub start_byte: usize,
    pub end_byte: usize,
    /// 1-based.
    pub line_start: usize,
    /// 1-based, inclusive.
    pub line_end: usize,
    pub source_text: String,
}

impl SyntaxSpan {
    pub fn byte_range(&self) -> Range<usize> {
        self.start_byte..self.end_byte
    }
}
