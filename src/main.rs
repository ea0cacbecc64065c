//! Connectome Access smoke check
//!
//! Resolves the artifact paths of one dataset and loads its metadata and
//! simple edge list through the cache. Settings come from the environment
//! (see `AccessConfig::load`); the dataset from `CONNECTOME_DATASET`.

use anyhow::{Context, Result};
use connectome_access::data::FileKind;
use connectome_access::report::{format_count, preview, ReportConfig};
use connectome_access::{AccessConfig, DataAccess};

const DEFAULT_DATASET: &str = "banc_746";

fn init_tracing() {
    let filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "connectome_access=info,connectome_smoke=info".to_string());
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn main() -> Result<()> {
    init_tracing();

    let dataset = std::env::var("CONNECTOME_DATASET").unwrap_or_else(|_| DEFAULT_DATASET.to_string());
    let config = AccessConfig::load().context("invalid CONNECTOME_* environment")?;
    tracing::info!(root = %config.data_root, cache = %config.cache_dir.display(), "configuration loaded");

    let access = DataAccess::connect(config).context("failed to set up storage access")?;
    for kind in FileKind::ALL {
        let path = match kind {
            FileKind::Skeletons => access.skeleton_dir(&dataset, None),
            _ => access.path_for(&dataset, kind),
        };
        println!("{:>16}: {path}", kind.as_str());
    }

    let report = ReportConfig {
        preview_rows: 5,
        ..ReportConfig::default()
    };

    let meta = access
        .load_meta(&dataset)
        .with_context(|| format!("failed to load metadata for {dataset}"))?;
    println!("\nNeurons: {}", format_count(meta.height()));
    println!("{}", preview(&meta, &report)?);

    let edges = access
        .load_simple_edgelist(&dataset)
        .with_context(|| format!("failed to load simple edgelist for {dataset}"))?;
    println!("\nConnections: {}", format_count(edges.height()));
    println!("{}", preview(&edges, &report)?);

    println!("\nSmoke check passed for {dataset}");
    Ok(())
}
