//! Configuration for entity parsing and related-unit resolution.
//!
//! Load order: `.dtogen/config.toml` → environment variables → defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level dtogen configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DtogenConfig {
    pub parser: ParserConfig,
    pub inheritance: InheritanceConfig,
    pub resolver: ResolverConfig,
}

/// Source parsing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Treat any syntax error reported by tree-sitter as malformed source.
    /// When false, error-recovered trees are extracted best-effort.
    pub reject_syntax_errors: bool,
}

/// Inheritance chase configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InheritanceConfig {
    /// Maximum number of base classes followed for one entity.
    pub max_depth: usize,
}

/// Directory resolver configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// File extensions searched for `<TypeName>.<ext>`, without the dot.
    pub extensions: Vec<String>,
    /// Directory names never descended into (build output).
    pub skip_dirs: Vec<String>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            reject_syntax_errors: true,
        }
    }
}

impl Default for InheritanceConfig {
    fn default() -> Self {
        Self { max_depth: 32 }
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["cs".to_string()],
            skip_dirs: vec!["bin".to_string(), "obj".to_string()],
        }
    }
}

/// Helper to parse an env var and apply it to a config field.
fn env_override<T: std::str::FromStr>(var: &str, target: &mut T) {
    if let Ok(v) = std::env::var(var)
        && let Ok(n) = v.parse()
    {
        *target = n;
    }
}

impl DtogenConfig {
    /// Load config from `.dtogen/config.toml` in the project root, with env var overrides.
    /// Falls back to defaults if no config file exists.
    pub fn load(project_root: &Path) -> Result<Self> {
        let config_path = project_root.join(".dtogen").join("config.toml");

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("failed to read {}", config_path.display()))?;
            toml::from_str(&content)
                .with_context(|| format!("invalid config in {}", config_path.display()))?
        } else {
            Self::default()
        };

        // "cs", ".cs" and "CS" all mean the same extension.
        config.resolver.extensions = std::mem::take(&mut config.resolver.extensions)
            .into_iter()
            .map(|ext| ext.trim_start_matches('.').to_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect();

        env_override(
            "DTOGEN_REJECT_SYNTAX_ERRORS",
            &mut config.parser.reject_syntax_errors,
        );
        env_override(
            "DTOGEN_MAX_INHERITANCE_DEPTH",
            &mut config.inheritance.max_depth,
        );

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.inheritance.max_depth == 0 {
            anyhow::bail!("inheritance.max_depth must be at least 1");
        }
        if self.resolver.extensions.is_empty() {
            anyhow::bail!("resolver.extensions must name at least one file extension");
        }
        Ok(())
    }
}
