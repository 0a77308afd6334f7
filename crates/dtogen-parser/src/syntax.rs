//! Shape matching over C# syntax nodes.
//!
//! Everything here is a `match` on tree-sitter node kinds. Property types are
//! lifted into [`TypeRef`] so classification never has to look at raw nodes.

use crate::treesitter::SourceUnit;
use tree_sitter::Node;

/// Generic identifier of the nullable value wrapper, `Nullable<T>`.
pub const NULLABLE_IDENTIFIER: &str = "Nullable";

/// Value types treated as simple (directly serializable) properties, by
/// their CLR name. Each also matches with a `System.` qualifier.
/// Keyword spellings (`int`, `string`, ...) are predefined types and are
/// always simple.
pub static SIMPLE_TYPE_NAMES: &[&str] = &[
    "DateTime", "TimeSpan", "Guid", "Byte", "SByte", "Char", "Decimal", "Double", "Single",
    "Int32", "UInt32", "Int64", "UInt64", "Int16", "UInt16", "String",
];

/// True if `name` is in [`SIMPLE_TYPE_NAMES`], bare or `System.`-qualified.
pub fn is_simple_type_name(name: &str) -> bool {
    let bare = name.strip_prefix("System.").unwrap_or(name);
    SIMPLE_TYPE_NAMES.contains(&bare)
}

/// A type reference as written in source, with its syntactic shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef<'a> {
    pub text: &'a str,
    pub shape: TypeShape<'a>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeShape<'a> {
    /// Keyword type: `int`, `string`, `bool`, `object`, ...
    Predefined,
    /// Bare name: `Customer`, `Guid`.
    Identifier,
    /// Dotted name: `System.DateTime`.
    Qualified,
    /// Generic construction: `List<Order>`, `Nullable<int>`.
    Generic {
        name: &'a str,
        arguments: Vec<TypeRef<'a>>,
    },
    /// `T?`
    Nullable(Box<TypeRef<'a>>),
    /// Arrays, tuples, pointers and anything else.
    Other,
}

impl<'a> TypeRef<'a> {
    /// Lift a type node into a [`TypeRef`].
    pub fn from_node(node: &Node<'_>, source: &'a str) -> Self {
        let text = &source[node.byte_range()];
        let shape = match node.kind() {
            "predefined_type" => TypeShape::Predefined,
            "identifier" => TypeShape::Identifier,
            "qualified_name" | "alias_qualified_name" => TypeShape::Qualified,
            "generic_name" => {
                let name = first_child_of_kind(node, "identifier")
                    .map(|n| &source[n.byte_range()])
                    .unwrap_or_default();
                let arguments = first_child_of_kind(node, "type_argument_list")
                    .map(|list| {
                        named_children(&list)
                            .iter()
                            .map(|arg| TypeRef::from_node(arg, source))
                            .collect()
                    })
                    .unwrap_or_default();
                TypeShape::Generic { name, arguments }
            }
            "nullable_type" => match node
                .child_by_field_name("type")
                .or_else(|| named_children(node).into_iter().next())
            {
                Some(inner) => {
                    TypeShape::Nullable(Box::new(TypeRef::from_node(&inner, source)))
                }
                None => TypeShape::Other,
            },
            _ => TypeShape::Other,
        };
        Self { text, shape }
    }

    /// Simple-set membership of this exact type, without unwrapping.
    pub fn is_simple_type(&self) -> bool {
        matches!(self.shape, TypeShape::Predefined) || is_simple_type_name(self.text)
    }

    /// Simple-set membership after unwrapping `T?` or `Nullable<T>`.
    pub fn is_simple_property(&self) -> bool {
        match &self.shape {
            TypeShape::Nullable(inner) => inner.is_simple_type(),
            TypeShape::Generic { name, arguments } if *name == NULLABLE_IDENTIFIER => {
                arguments.first().is_some_and(TypeRef::is_simple_type)
            }
            _ => self.is_simple_type(),
        }
    }

    /// Any generic construction other than `Nullable<T>`.
    pub fn is_collection(&self) -> bool {
        matches!(&self.shape, TypeShape::Generic { name, .. } if *name != NULLABLE_IDENTIFIER)
    }

    /// The entity a relation-typed property points at.
    ///
    /// A generic construction yields its single identifier-shaped type
    /// argument (keyword arguments are skipped, so `Dictionary<int, Order>`
    /// yields `Order`); zero or several identifier arguments yield `None`.
    /// A bare identifier yields itself. Every other shape yields `None`.
    pub fn related_entity_name(&self) -> Option<&'a str> {
        match &self.shape {
            TypeShape::Generic { arguments, .. } => {
                let mut identifiers = arguments
                    .iter()
                    .filter(|arg| arg.shape == TypeShape::Identifier);
                match (identifiers.next(), identifiers.next()) {
                    (Some(only), None) => Some(only.text),
                    _ => None,
                }
            }
            TypeShape::Identifier => Some(self.text),
            _ => None,
        }
    }
}

/// Named children, with comments (which tree-sitter attaches anywhere) dropped.
pub fn named_children<'t>(node: &Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|c| c.kind() != "comment")
        .collect()
}

pub fn first_child_of_kind<'t>(node: &Node<'t>, kind: &str) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    node.children(&mut cursor).find(|c| c.kind() == kind)
}

fn is_type_declaration(kind: &str) -> bool {
    matches!(
        kind,
        "class_declaration"
            | "struct_declaration"
            | "interface_declaration"
            | "record_declaration"
            | "record_struct_declaration"
            | "enum_declaration"
    )
}

/// Class declarations not nested inside another class, in source order.
///
/// Namespaces (block or file-scoped) and other containers are searched;
/// a class's own body is not.
pub fn top_level_classes<'t>(root: &Node<'t>) -> Vec<Node<'t>> {
    fn visit<'t>(node: &Node<'t>, out: &mut Vec<Node<'t>>) {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "class_declaration" => out.push(child),
                _ => visit(&child, out),
            }
        }
    }

    let mut out = Vec::new();
    visit(root, &mut out);
    out
}

/// First class declaration anywhere in the tree, top-down.
pub fn first_class<'t>(root: &Node<'t>) -> Option<Node<'t>> {
    top_level_classes(root).into_iter().next()
}

/// Name of the first namespace declaration found top-down, block or file-scoped.
pub fn first_namespace_name<'s>(unit: &'s SourceUnit) -> Option<&'s str> {
    fn find<'t>(node: &Node<'t>) -> Option<Node<'t>> {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "namespace_declaration" | "file_scoped_namespace_declaration" => {
                    return Some(child);
                }
                "class_declaration" => {}
                _ => {
                    if let Some(found) = find(&child) {
                        return Some(found);
                    }
                }
            }
        }
        None
    }

    let ns = find(&unit.root())?;
    let name = ns.child_by_field_name("name").or_else(|| {
        named_children(&ns)
            .into_iter()
            .find(|c| matches!(c.kind(), "identifier" | "qualified_name"))
    })?;
    Some(unit.node_text(&name))
}

pub fn declaration_name<'s>(unit: &'s SourceUnit, decl: &Node<'_>) -> Option<&'s str> {
    decl.child_by_field_name("name")
        .or_else(|| first_child_of_kind(decl, "identifier"))
        .map(|n| unit.node_text(&n))
}

/// Text of the first listed base type of a class declaration.
pub fn first_base_type<'s>(unit: &'s SourceUnit, class: &Node<'_>) -> Option<&'s str> {
    let base_list = first_child_of_kind(class, "base_list")?;
    let first = named_children(&base_list).into_iter().next()?;
    // `class Foo : Bar(x)` wraps the type in a primary constructor base.
    let first = match first.kind() {
        "primary_constructor_base_type" => first
            .child_by_field_name("type")
            .or_else(|| named_children(&first).into_iter().next())
            .unwrap_or(first),
        _ => first,
    };
    Some(unit.node_text(&first))
}

/// Interface naming heuristic: `I` followed by another uppercase letter,
/// more than two characters long (`ICustomer`, but not `Item` or `IO`).
pub fn looks_like_interface(type_name: &str) -> bool {
    let mut chars = type_name.chars();
    type_name.chars().count() > 2
        && chars.next() == Some('I')
        && chars.next().is_some_and(char::is_uppercase)
}

/// Property declarations that are direct members of a class body.
/// Members of nested type declarations are skipped; preprocessor blocks
/// inside the body are searched.
pub fn class_properties<'t>(class: &Node<'t>) -> Vec<Node<'t>> {
    fn visit<'t>(node: &Node<'t>, out: &mut Vec<Node<'t>>) {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "property_declaration" => out.push(child),
                kind if is_type_declaration(kind) => {}
                _ => visit(&child, out),
            }
        }
    }

    let mut out = Vec::new();
    if let Some(body) = class
        .child_by_field_name("body")
        .or_else(|| first_child_of_kind(class, "declaration_list"))
    {
        visit(&body, &mut out);
    }
    out
}

/// Every property declaration in the unit, in source order.
pub fn all_properties<'t>(root: &Node<'t>) -> Vec<Node<'t>> {
    fn visit<'t>(node: &Node<'t>, out: &mut Vec<Node<'t>>) {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.kind() == "property_declaration" {
                out.push(child);
            } else {
                visit(&child, out);
            }
        }
    }

    let mut out = Vec::new();
    visit(root, &mut out);
    out
}

pub fn has_modifier(unit: &SourceUnit, decl: &Node<'_>, modifier: &str) -> bool {
    let mut cursor = decl.walk();
    decl.children(&mut cursor)
        .any(|c| c.kind() == "modifier" && unit.node_text(&c).trim() == modifier)
}

/// Accessor keyword (`get`, `set`, `init`, ...) of an accessor declaration.
fn accessor_keyword<'s>(unit: &'s SourceUnit, accessor: &Node<'_>) -> Option<&'s str> {
    if let Some(name) = accessor.child_by_field_name("name") {
        return Some(unit.node_text(&name));
    }
    let mut cursor = accessor.walk();
    accessor
        .children(&mut cursor)
        .find(|c| matches!(c.kind(), "get" | "set" | "init" | "add" | "remove"))
        .map(|c| unit.node_text(&c))
}

/// A public property with an accessor list holding both `get` and `set`.
/// Expression-bodied (`=> x`) properties have no accessor list.
pub fn is_public_read_write(unit: &SourceUnit, property: &Node<'_>) -> bool {
    if !has_modifier(unit, property, "public") {
        return false;
    }
    let Some(accessors) = property
        .child_by_field_name("accessors")
        .or_else(|| first_child_of_kind(property, "accessor_list"))
    else {
        return false;
    };
    let keywords: Vec<&str> = named_children(&accessors)
        .iter()
        .filter(|a| a.kind() == "accessor_declaration")
        .filter_map(|a| accessor_keyword(unit, a))
        .collect();
    keywords.contains(&"get") && keywords.contains(&"set")
}
