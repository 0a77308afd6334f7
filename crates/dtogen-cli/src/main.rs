//! CLI binary for dtogen: extract entity metadata from C# classes and inspect
//! previously generated DTO files.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dtogen_core::config::DtogenConfig;
use dtogen_parser::SourceUnit;
use dtogen_parser::entities::parse_from_unit_with;
use dtogen_parser::inspect::inspect_existing;
use dtogen_parser::resolver::{DirectoryResolver, NoopResolver};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "dtogen", about = "C# entity metadata extractor for DTO generation")]
struct Cli {
    /// Project root directory (defaults to current directory)
    #[arg(short, long, global = true)]
    project: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract metadata from a C# entity class and print it as JSON
    Entity {
        /// C# source file holding exactly one class
        file: PathBuf,

        /// Append properties inherited from base classes found in the project
        #[arg(long)]
        inherited: bool,
    },

    /// Inspect a previously generated DTO file and print a report as JSON
    Inspect {
        /// Generated DTO file (a missing file prints the empty report)
        file: PathBuf,

        /// Base DTO name the file is expected to derive from
        #[arg(long)]
        base_dto: Option<String>,
    },
}

fn get_project_root(cli: &Cli) -> Result<PathBuf> {
    match &cli.project {
        Some(p) => Ok(p.clone()),
        None => std::env::current_dir().context("failed to get current directory"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let project_root = get_project_root(&cli)?;
    let config = DtogenConfig::load(&project_root)
        .with_context(|| format!("failed to load config for {}", project_root.display()))?;

    let json = match cli.command {
        Commands::Entity { file, inherited } => {
            cmd_entity(&project_root, &config, &file, inherited).await?
        }
        Commands::Inspect { file, base_dto } => {
            cmd_inspect(&config, &file, base_dto.as_deref()).await?
        }
    };
    println!("{}", json);
    Ok(())
}

async fn cmd_entity(
    project_root: &Path,
    config: &DtogenConfig,
    file: &Path,
    inherited: bool,
) -> Result<String> {
    let unit = SourceUnit::load(file, &config.parser)
        .await
        .with_context(|| format!("failed to parse {}", file.display()))?;

    let metadata = if inherited {
        let resolver = DirectoryResolver::from_config(project_root, config);
        parse_from_unit_with(&unit, &resolver, true, &config.inheritance).await
    } else {
        parse_from_unit_with(&unit, &NoopResolver, false, &config.inheritance).await
    }
    .with_context(|| format!("failed to extract entity from {}", file.display()))?;

    tracing::info!(
        entity = %metadata.name,
        properties = metadata.properties.len(),
        inherited = metadata.inherited_properties().count(),
        "entity extracted"
    );
    serde_json::to_string_pretty(&metadata).context("failed to serialize entity metadata")
}

async fn cmd_inspect(
    config: &DtogenConfig,
    file: &Path,
    base_dto: Option<&str>,
) -> Result<String> {
    let existing = if tokio::fs::try_exists(file)
        .await
        .with_context(|| format!("failed to access {}", file.display()))?
    {
        Some(
            SourceUnit::load(file, &config.parser)
                .await
                .with_context(|| format!("failed to parse {}", file.display()))?,
        )
    } else {
        tracing::info!(file = %file.display(), "no existing DTO, reporting baseline");
        None
    };

    let report = inspect_existing(existing.as_ref(), base_dto);
    serde_json::to_string_pretty(&report).context("failed to serialize inspection report")
}
