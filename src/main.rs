//! Keel
//!
//! Prints the validation schemas derived for an entity of a model, in id,
//! full and ignore-includes modes.

mod demo;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use keel_generator::{DEFAULT_MAX_DEPTH, Options, SchemaGenerator};
use keel_ir::{DatabaseType, Model, Validator, load_model, save_model};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Derive validation schemas from persistence metadata
#[derive(Debug, Parser)]
#[command(name = "keel", version, about)]
struct Args {
    /// Model snapshot to read instead of the built-in demo model
    #[arg(short, long, env = "KEEL_MODEL")]
    model: Option<PathBuf>,

    /// Database whose driver facts apply, overriding the model's
    #[arg(short, long)]
    database: Option<DatabaseType>,

    /// Entity to describe
    #[arg(short, long, default_value = "Product")]
    entity: String,

    /// Only print the identity schema
    #[arg(long)]
    id_mode: bool,

    /// Only print the schema with every relation reduced to identity
    #[arg(long)]
    ignore_includes: bool,

    /// Accept a bare key value for single-key entities in identity schemas
    #[arg(long)]
    mixed_ids: bool,

    /// Relation nesting limit
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Write the loaded model to this file
    #[arg(long)]
    save_model: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut model = match &args.model {
        Some(path) => load_model(path)
            .with_context(|| format!("Failed to load model from {}", path.display()))?,
        None => Model {
            catalog: demo::catalog().context("Failed to build demo catalog")?,
            registry: demo::registry().context("Failed to build demo annotations")?,
        },
    };
    if let Some(database) = args.database {
        model.catalog.database = database;
    }
    tracing::info!(
        entities = model.catalog.len(),
        annotations = model.registry.len(),
        database = %model.catalog.database,
        "Model loaded"
    );

    let report = Validator::with_default_rules().validate(&model.catalog, &model.registry);
    if report.has_errors() {
        for error in report.errors() {
            tracing::error!("{}", error);
        }
        bail!("Model has {} consistency error(s)", report.errors().count());
    }

    if let Some(path) = &args.save_model {
        save_model(&model.catalog, &model.registry, path)
            .with_context(|| format!("Failed to save model to {}", path.display()))?;
        tracing::info!(path = %path.display(), "Model saved");
    }

    let generator = SchemaGenerator::new(&model.catalog, &model.registry);
    let base = Options::new()
        .use_mixed_ids(args.mixed_ids)
        .max_depth(args.max_depth);

    let modes = if args.id_mode {
        vec![("ID", base.id_mode(true))]
    } else if args.ignore_includes {
        vec![("IGNORE INCLUDES", base.ignore_includes(true))]
    } else {
        vec![
            ("ID", base.id_mode(true)),
            ("FULL", base),
            ("IGNORE INCLUDES", base.ignore_includes(true)),
        ]
    };

    for (label, options) in modes {
        let schema = generator
            .compose_by_name(&args.entity, options)
            .with_context(|| format!("Failed to compose schema for '{}'", args.entity))?;
        println!("{}: {}", label, serde_json::to_string(&schema.describe())?);
    }

    Ok(())
}
