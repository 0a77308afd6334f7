//! Related-unit resolution: mapping a base type name to the source unit
//! that declares it.

use crate::error::ExtractError;
use crate::treesitter::SourceUnit;
use dtogen_core::config::{DtogenConfig, ParserConfig, ResolverConfig};
use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};

/// Supplies the source unit declaring a named type.
///
/// `Ok(None)` means the type is not available (external library, generated
/// elsewhere) and ends an inheritance chain normally. The extractor calls
/// `resolve` at most once per type and never retries; dropping the returned
/// future cancels the lookup.
pub trait RelatedUnitResolver: Sync {
    fn resolve(
        &self,
        type_name: &str,
    ) -> impl Future<Output = Result<Option<SourceUnit>, ExtractError>> + Send;
}

/// The identifier a type reference is declared under: namespace qualifiers
/// and generic arguments are dropped (`Models.EntityBase<int>` → `EntityBase`).
pub fn base_identifier(type_name: &str) -> &str {
    let without_args = type_name.split('<').next().unwrap_or(type_name).trim();
    without_args
        .rsplit('.')
        .next()
        .unwrap_or(without_args)
        .trim()
}

/// Resolves nothing. Inheritance merges stop at the first base class.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopResolver;

impl RelatedUnitResolver for NoopResolver {
    async fn resolve(&self, _type_name: &str) -> Result<Option<SourceUnit>, ExtractError> {
        Ok(None)
    }
}

/// Resolves types from source text held in memory, keyed by type identifier.
#[derive(Debug, Clone, Default)]
pub struct InMemoryResolver {
    sources: HashMap<String, String>,
    parser: ParserConfig,
}

impl InMemoryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, type_name: &str, source: impl Into<String>) -> Self {
        self.insert(type_name, source);
        self
    }

    pub fn insert(&mut self, type_name: &str, source: impl Into<String>) {
        self.sources
            .insert(base_identifier(type_name).to_string(), source.into());
    }
}

impl RelatedUnitResolver for InMemoryResolver {
    async fn resolve(&self, type_name: &str) -> Result<Option<SourceUnit>, ExtractError> {
        self.sources
            .get(base_identifier(type_name))
            .map(|source| SourceUnit::parse_with(None, source.as_str(), &self.parser))
            .transpose()
    }
}

/// Resolves `<TypeName>.cs` files under a project directory.
///
/// The walk honours `.gitignore` and `.dtogenignore`, skips hidden entries
/// and the configured build-output directories. When several files share
/// the name, the first in path order wins.
#[derive(Debug, Clone)]
pub struct DirectoryResolver {
    root: PathBuf,
    resolver: ResolverConfig,
    parser: ParserConfig,
}

impl DirectoryResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::from_config(root, &DtogenConfig::default())
    }

    pub fn from_config(root: impl Into<PathBuf>, config: &DtogenConfig) -> Self {
        Self {
            root: root.into(),
            resolver: config.resolver.clone(),
            parser: config.parser.clone(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All files declaring `identifier` by naming convention, sorted by path.
    pub fn find_candidates(&self, identifier: &str) -> Vec<PathBuf> {
        find_candidates(&self.root, identifier, &self.resolver)
    }
}

fn find_candidates(root: &Path, identifier: &str, config: &ResolverConfig) -> Vec<PathBuf> {
    let skip_dirs = config.skip_dirs.clone();
    let walker = ignore::WalkBuilder::new(root)
        .hidden(true)
        .git_ignore(true)
        .add_custom_ignore_filename(".dtogenignore")
        .filter_entry(move |entry| {
            let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
            !(is_dir
                && entry.depth() > 0
                && entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| skip_dirs.iter().any(|s| s == name)))
        })
        .build();

    let mut matches: Vec<PathBuf> = walker
        .flatten()
        .map(|entry| entry.into_path())
        .filter(|path| path.is_file())
        .filter(|path| {
            let stem_matches = path.file_stem().and_then(|s| s.to_str()) == Some(identifier);
            let ext_matches = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|ext| config.extensions.contains(&ext.to_lowercase()));
            stem_matches && ext_matches
        })
        .collect();
    matches.sort();
    matches
}

impl RelatedUnitResolver for DirectoryResolver {
    async fn resolve(&self, type_name: &str) -> Result<Option<SourceUnit>, ExtractError> {
        let identifier = base_identifier(type_name).to_string();
        if identifier.is_empty() {
            return Ok(None);
        }

        let root = self.root.clone();
        let config = self.resolver.clone();
        let lookup = identifier.clone();
        let candidates =
            tokio::task::spawn_blocking(move || find_candidates(&root, &lookup, &config))
                .await
                .map_err(|e| ExtractError::Io {
                    path: self.root.clone(),
                    source: std::io::Error::other(e),
                })?;

        let Some(path) = candidates.first() else {
            tracing::debug!(type_name, root = %self.root.display(), "no source file for type");
            return Ok(None);
        };
        if candidates.len() > 1 {
            tracing::warn!(
                type_name,
                chosen = %path.display(),
                candidates = candidates.len(),
                "several files match type name, using the first"
            );
        }

        SourceUnit::load(path.clone(), &self.parser).await.map(Some)
    }
}
