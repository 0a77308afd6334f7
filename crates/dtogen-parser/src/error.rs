//! Errors surfaced by entity extraction and related-unit resolution.

use std::path::{Path, PathBuf};

/// Errors that abort extraction for a unit. Recoverable conditions
/// (an undeterminable related entity, a base class the resolver cannot find)
/// never produce an error.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("failed to load C# grammar: {0}")]
    Language(String),
    #[error(
        "malformed source{}: syntax error at line {line}, column {column}",
        display_path(.path.as_deref())
    )]
    MalformedSource {
        path: Option<PathBuf>,
        line: usize,
        column: usize,
    },
    #[error("source code to parse must contain exactly one class declaration (found {found})")]
    Shape { found: usize },
    #[error("cyclic inheritance detected: {}", .chain.join(" -> "))]
    CyclicInheritance { chain: Vec<String> },
    #[error("inheritance chain of `{entity}` exceeds the maximum depth of {limit}")]
    InheritanceTooDeep { entity: String, limit: usize },
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn display_path(path: Option<&Path>) -> String {
    path.map(|p| format!(" in {}", p.display()))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = ExtractError::Shape { found: 2 };
        assert!(err.to_string().contains("exactly one class declaration"));

        let err = ExtractError::CyclicInheritance {
            chain: vec!["A".into(), "B".into(), "A".into()],
        };
        assert_eq!(err.to_string(), "cyclic inheritance detected: A -> B -> A");

        let err = ExtractError::MalformedSource {
            path: Some(PathBuf::from("Models/Foo.cs")),
            line: 3,
            column: 7,
        };
        assert_eq!(
            err.to_string(),
            "malformed source in Models/Foo.cs: syntax error at line 3, column 7"
        );

        let err = ExtractError::MalformedSource {
            path: None,
            line: 1,
            column: 1,
        };
        assert_eq!(err.to_string(), "malformed source: syntax error at line 1, column 1");
    }
}
