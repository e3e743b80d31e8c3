//! Cubist CLI - inspect snapshot schemas and synthesize MDX
//!
//! Usage:
//!   cubist schema <snapshot.json>
//!   cubist members <snapshot.json> --dimension <d> --hierarchy <h> --level <l>
//!   cubist synth <snapshot.json> --request <request.json>
//!
//! The snapshot file carries the flat member rowset an external loader
//! exported: `{ "catalog": "...", "members": [ ... ] }`.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Deserialize;

use cubist::catalog::MemberCatalog;
use cubist::config::Settings;
use cubist::estimate::CardinalityEstimator;
use cubist::mdx::{ancestor_properties, MdxSynthesizer, QueryRequest};
use cubist::model::{FilterSelection, MeasureSelection, Member, RowDimensionSelection};
use cubist::resolve::{MemberFilterResolver, ResolutionError};
use cubist::schema::{HierarchyCatalogBuilder, MarkerClassifier};

#[derive(Parser)]
#[command(name = "cubist")]
#[command(about = "Cubist - OLAP schema resolution and MDX synthesis")]
#[command(version)]
struct Cli {
    /// Path to a TOML settings file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the resolved hierarchy/level structure of a snapshot
    Schema {
        /// Path to the snapshot JSON file
        snapshot: PathBuf,
    },

    /// List the ordered members of one level
    Members {
        /// Path to the snapshot JSON file
        snapshot: PathBuf,

        #[arg(short, long)]
        dimension: String,

        #[arg(long)]
        hierarchy: String,

        #[arg(short, long)]
        level: String,
    },

    /// Synthesize an MDX statement from a query request file
    Synth {
        /// Path to the snapshot JSON file
        snapshot: PathBuf,

        /// Path to the query request JSON file
        #[arg(short, long)]
        request: PathBuf,
    },
}

/// On-disk snapshot layout produced by the external loader.
#[derive(Deserialize)]
struct SnapshotFile {
    catalog: String,
    members: Vec<Member>,
}

/// On-disk query request: levels are referenced by name and resolved here.
#[derive(Deserialize)]
struct RequestFile {
    cube: Option<String>,
    measures: Vec<MeasureSelection>,
    variables: Vec<MeasureSelection>,
    #[serde(default)]
    rows: Vec<RowAxisSpec>,
    #[serde(default)]
    filters: Vec<FilterSelection>,
}

#[derive(Deserialize)]
struct RowAxisSpec {
    dimension: String,
    hierarchy: String,
    level: String,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = match Settings::load_or_default(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let result = match cli.command {
        Commands::Schema { snapshot } => cmd_schema(&snapshot, &settings),
        Commands::Members {
            snapshot,
            dimension,
            hierarchy,
            level,
        } => cmd_members(&snapshot, &settings, &dimension, &hierarchy, &level),
        Commands::Synth { snapshot, request } => cmd_synth(&snapshot, &request, &settings),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn load_snapshot(path: &PathBuf) -> Result<MemberCatalog, Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(path)?;
    let file: SnapshotFile = serde_json::from_str(&raw)?;
    Ok(MemberCatalog::new(&file.catalog, file.members))
}

fn cmd_schema(
    snapshot: &PathBuf,
    settings: &Settings,
) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = load_snapshot(snapshot)?;
    let classifier = MarkerClassifier::from_settings(&settings.classifier);
    let hierarchies =
        HierarchyCatalogBuilder::new(settings.level_sample_size).build(&catalog, &classifier);

    let mut keys: Vec<_> = hierarchies.keys().collect();
    keys.sort();

    println!("Catalog: {} ({:?})", catalog.catalog_id, catalog.variant());
    for key in keys {
        let hierarchy = &hierarchies[key];
        println!("{key}");
        for level in &hierarchy.levels {
            println!("    {}. {} ({:?})", level.depth, level.name, level.source);
        }
    }
    Ok(())
}

fn cmd_members(
    snapshot: &PathBuf,
    settings: &Settings,
    dimension: &str,
    hierarchy: &str,
    level: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = load_snapshot(snapshot)?;
    let classifier = MarkerClassifier::from_settings(&settings.classifier);
    let hierarchies =
        HierarchyCatalogBuilder::new(settings.level_sample_size).build(&catalog, &classifier);

    let key = cubist::model::HierarchyKey::new(dimension, hierarchy);
    let resolved = hierarchies
        .get(&key)
        .ok_or_else(|| ResolutionError::UnknownHierarchy {
            catalog: catalog.catalog_id.clone(),
            dimension: dimension.to_string(),
            hierarchy: hierarchy.to_string(),
        })?;
    let level = resolved
        .level_by_name(level)
        .ok_or_else(|| ResolutionError::UnknownLevel {
            hierarchy: hierarchy.to_string(),
            level: level.to_string(),
        })?;

    for member in MemberFilterResolver::new(&catalog).members_at_level(dimension, hierarchy, level)
    {
        println!("{}\t{}", member.caption, member.unique_name);
    }
    Ok(())
}

fn cmd_synth(
    snapshot: &PathBuf,
    request_path: &PathBuf,
    settings: &Settings,
) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = load_snapshot(snapshot)?;
    let raw = std::fs::read_to_string(request_path)?;
    let file: RequestFile = serde_json::from_str(&raw)?;

    let classifier = MarkerClassifier::from_settings(&settings.classifier);
    let hierarchies =
        HierarchyCatalogBuilder::new(settings.level_sample_size).build(&catalog, &classifier);

    let mut row_dimensions = Vec::with_capacity(file.rows.len());
    for spec in &file.rows {
        let key = cubist::model::HierarchyKey::new(&spec.dimension, &spec.hierarchy);
        let resolved = hierarchies
            .get(&key)
            .ok_or_else(|| ResolutionError::UnknownHierarchy {
                catalog: catalog.catalog_id.clone(),
                dimension: spec.dimension.clone(),
                hierarchy: spec.hierarchy.clone(),
            })?;
        let level = resolved
            .level_by_name(&spec.level)
            .ok_or_else(|| ResolutionError::UnknownLevel {
                hierarchy: spec.hierarchy.clone(),
                level: spec.level.clone(),
            })?
            .clone();

        let mut selection =
            RowDimensionSelection::new(&spec.dimension, &spec.hierarchy, level.clone());
        selection.single_level = resolved.levels.len() <= 1 && !level.explicit();
        selection.dimension_properties = ancestor_properties(resolved, &level);
        row_dimensions.push(selection);
    }

    let estimate = CardinalityEstimator::new(&catalog, settings.cardinality_threshold)
        .estimate(&row_dimensions);
    if let Some(warning) = &estimate.warning {
        eprintln!("warning: {warning}");
    }

    let request = QueryRequest {
        cube: file.cube.unwrap_or_else(|| catalog.catalog_id.clone()),
        measures: file.measures,
        variables: file.variables,
        row_dimensions,
        filters: file.filters,
    };
    let mdx = MdxSynthesizer::new().synthesize(&request)?;
    println!("{mdx}");
    Ok(())
}
