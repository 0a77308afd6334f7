//! Tree-sitter integration: C# grammar loading and parsed source units.

use crate::error::ExtractError;
use dtogen_core::config::ParserConfig;
use std::path::{Path, PathBuf};
use tree_sitter::{Node, Tree};

/// Load the C# grammar.
pub fn csharp_language() -> tree_sitter::Language {
    tree_sitter_c_sharp::LANGUAGE.into()
}

/// Parse C# source and return the tree-sitter tree.
///
/// With `reject_syntax_errors` set, a tree containing any error or missing
/// node is reported as [`ExtractError::MalformedSource`] at the position of
/// the first such node.
pub fn parse_csharp(
    path: Option<&Path>,
    source: &str,
    config: &ParserConfig,
) -> Result<Tree, ExtractError> {
    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(&csharp_language())
        .map_err(|e| ExtractError::Language(e.to_string()))?;
    let tree = parser
        .parse(source.as_bytes(), None)
        .ok_or_else(|| ExtractError::MalformedSource {
            path: path.map(Path::to_path_buf),
            line: 1,
            column: 1,
        })?;

    if config.reject_syntax_errors
        && let Some(bad) = first_syntax_error(&tree.root_node())
    {
        let pos = bad.start_position();
        return Err(ExtractError::MalformedSource {
            path: path.map(Path::to_path_buf),
            line: pos.row + 1,
            column: pos.column + 1,
        });
    }
    Ok(tree)
}

/// First error or missing node in source order.
fn first_syntax_error<'t>(node: &Node<'t>) -> Option<Node<'t>> {
    if node.is_error() || node.is_missing() {
        return Some(*node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .find_map(|child| first_syntax_error(&child))
}

/// One parsed compilation unit: the source text, its syntax tree, and the
/// file it came from when there is one.
#[derive(Debug, Clone)]
pub struct SourceUnit {
    path: Option<PathBuf>,
    text: String,
    tree: Tree,
}

impl SourceUnit {
    /// Parse in-memory source with the default parser configuration.
    pub fn parse(text: impl Into<String>) -> Result<Self, ExtractError> {
        Self::parse_with(None, text, &ParserConfig::default())
    }

    /// Parse source text read from `path`.
    pub fn parse_file(
        path: impl Into<PathBuf>,
        text: impl Into<String>,
        config: &ParserConfig,
    ) -> Result<Self, ExtractError> {
        Self::parse_with(Some(path.into()), text, config)
    }

    pub fn parse_with(
        path: Option<PathBuf>,
        text: impl Into<String>,
        config: &ParserConfig,
    ) -> Result<Self, ExtractError> {
        let text = text.into();
        let tree = parse_csharp(path.as_deref(), &text, config)?;
        Ok(Self { path, text, tree })
    }

    /// Read and parse a file from disk.
    pub async fn load(
        path: impl Into<PathBuf>,
        config: &ParserConfig,
    ) -> Result<Self, ExtractError> {
        let path = path.into();
        let text = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| ExtractError::Io {
                path: path.clone(),
                source,
            })?;
        Self::parse_file(path, text, config)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Full source text.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Source text covered by `node`.
    pub fn node_text(&self, node: &Node<'_>) -> &str {
        &self.text[node.byte_range()]
    }
}
