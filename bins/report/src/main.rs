//! Fieldshare report
//!
//! Reads a JSON ledger snapshot and prints one statement per farmer and field.

use std::io::Write;

use anyhow::Context;
use serde::Deserialize;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use fieldshare_core::period::PeriodFilter;
use fieldshare_core::share::{ShareSplitCalculator, SplitCache, SplitOptions};
use fieldshare_core::statement::{InMemoryLedger, StatementService};
use fieldshare_shared::AppConfig;
use fieldshare_shared::config::LoggingConfig;

/// Snapshot file layout: a ledger plus the period to report on.
#[derive(Debug, Deserialize)]
struct ReportInput {
    #[serde(flatten)]
    ledger: InMemoryLedger,
    #[serde(default)]
    period: PeriodFilter,
}

fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter));
    let registry = tracing_subscriber::registry().with(filter);

    // stdout carries the report
    if logging.json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry.with(fmt::layer().with_writer(std::io::stderr)).init();
    }
}

fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    init_tracing(&config.logging);

    let input_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config.report.input_path.clone());
    let raw = std::fs::read_to_string(&input_path)
        .with_context(|| format!("Failed to read ledger snapshot {input_path}"))?;
    let input: ReportInput = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid ledger snapshot {input_path}"))?;

    let options = SplitOptions::from_config(&config.split)?;
    let splitter = SplitCache::from_config(ShareSplitCalculator::new(options), &config.cache);
    info!(
        input = %input_path,
        decimal_places = config.split.decimal_places,
        frozen = config.split.freeze_recorded_shares,
        "Building statements"
    );

    let ledger = &input.ledger;
    let service = StatementService::new(ledger, ledger, splitter);

    let statements = ledger
        .parties()
        .into_iter()
        .map(|(field_id, farmer_id)| service.build_statement(field_id, farmer_id, &input.period))
        .collect::<Result<Vec<_>, _>>()?;

    info!(
        statements = statements.len(),
        cache_hits = service.splitter().hits(),
        cache_misses = service.splitter().misses(),
        "Statements built"
    );

    let mut out = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, &statements)?;
    writeln!(out)?;

    Ok(())
}
