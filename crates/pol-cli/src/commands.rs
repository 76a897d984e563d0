use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, info_span};

use pol_ingest::resolve_path;
use pol_map::{load_column_mapping, normalize_label};
use pol_store::{DatabaseConfig, Store};
use pol_transform::{PipelineConfig, TableSummary, collect, join};

use crate::cli::{CollectArgs, ColumnsArgs, JoinArgs, NormalizeArgs, RunArgs, pipeline_config};
use crate::summary::{mapping_table, print_summary};

fn open_store() -> Result<Store> {
    let config = DatabaseConfig::from_env().context("load database configuration")?;
    Store::open(&config).context("open database")
}

fn run_collect_stage(store: &mut Store, config: &PipelineConfig) -> Result<Vec<TableSummary>> {
    let started = Instant::now();
    let written = collect(store, config).context("collect sources")?;
    info!(
        tables = written.len(),
        duration_ms = started.elapsed().as_millis(),
        "collect stage finished"
    );
    Ok(written)
}

fn run_join_stage(store: &mut Store, config: &PipelineConfig) -> Result<TableSummary> {
    let started = Instant::now();
    let summary = join(store, config)
        .with_context(|| format!("build {}", config.final_table))?;
    if let Some(path) = &config.export_path {
        println!("Exported: {}", path.display());
    }
    info!(
        table = %summary.table,
        rows = summary.rows,
        duration_ms = started.elapsed().as_millis(),
        "join stage finished"
    );
    Ok(summary)
}

pub fn run_collect(args: &CollectArgs) -> Result<Vec<TableSummary>> {
    let span = info_span!("command", name = "collect");
    let _guard = span.enter();
    let config = pipeline_config(Some(args), None);
    let mut store = open_store()?;
    let written = run_collect_stage(&mut store, &config)?;
    print_summary(&written);
    Ok(written)
}

pub fn run_join(args: &JoinArgs) -> Result<TableSummary> {
    let span = info_span!("command", name = "join");
    let _guard = span.enter();
    let config = pipeline_config(None, Some(args));
    let mut store = open_store()?;
    let summary = run_join_stage(&mut store, &config)?;
    print_summary(std::slice::from_ref(&summary));
    Ok(summary)
}

pub fn run_all(args: &RunArgs) -> Result<Vec<TableSummary>> {
    let span = info_span!("command", name = "run");
    let _guard = span.enter();
    let config = pipeline_config(Some(&args.collect), Some(&args.join));
    let mut store = open_store()?;
    let mut written = run_collect_stage(&mut store, &config)?;
    written.push(run_join_stage(&mut store, &config)?);
    print_summary(&written);
    Ok(written)
}

/// Normalized form of each label, in input order.
pub fn normalize_labels(args: &NormalizeArgs) -> Vec<String> {
    args.labels.iter().map(|label| normalize_label(label)).collect()
}

pub fn run_normalize(args: &NormalizeArgs) {
    for label in normalize_labels(args) {
        println!("{label}");
    }
}

pub fn run_columns(args: &ColumnsArgs) -> Result<()> {
    let path = resolve_path(&args.data_dir, &args.mapping_file);
    let mapping = load_column_mapping(&path)
        .with_context(|| format!("load mapping file {}", path.display()))?;
    println!("{}", mapping_table(&mapping));
    Ok(())
}
