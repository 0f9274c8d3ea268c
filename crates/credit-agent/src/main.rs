//! credit-agent: creditworthiness snapshot for one company from the terminal.
//!
//! Resolves the query to a ticker, scores the latest annual statements,
//! prints the snapshot, asks for an analyst memo and writes a PDF report.
//!
//! Usage:
//!   cargo run -p credit-agent -- AAPL
//!   cargo run -p credit-agent -- "Apple Inc" --out reports
//!   cargo run -p credit-agent -- REF --no-memo --bundle statements.json

mod args;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use credit_core::{
    AppConfig, InMemoryStatementSource, Narrative, NarrativeGenerator, ResolvedSymbol, StatementSource,
    SymbolResolver,
};
use credit_scoring::CreditScoringEngine;
use fmp_client::{FmpClient, FmpConfig};
use memo_client::{MemoClient, MemoConfig};

use args::{parse_args, CliArgs, USAGE};

/// Statement source and resolver for this run: the local bundle when given,
/// otherwise FMP.
fn build_provider(
    cli: &CliArgs,
    config: &AppConfig,
) -> Result<(Arc<dyn StatementSource>, Arc<dyn SymbolResolver>)> {
    if let Some(path) = &cli.bundle {
        let symbol = ResolvedSymbol::from_query(&cli.query).symbol;
        let memory = Arc::new(InMemoryStatementSource::from_json_file(&symbol, path)?);
        tracing::info!("Scoring local bundle {} as {}", path.display(), symbol);
        let source: Arc<dyn StatementSource> = memory.clone();
        let resolver: Arc<dyn SymbolResolver> = memory;
        return Ok((source, resolver));
    }

    let fmp_config =
        FmpConfig::from_app_config(config).context("FMP_API_KEY must be set (or pass --bundle FILE.json)")?;
    let fmp = Arc::new(FmpClient::new(fmp_config)?);
    let source: Arc<dyn StatementSource> = fmp.clone();
    let resolver: Arc<dyn SymbolResolver> = fmp;
    Ok((source, resolver))
}

fn build_narrator(cli: &CliArgs, config: &AppConfig) -> Result<Option<MemoClient>> {
    if !cli.memo {
        return Ok(None);
    }
    match MemoConfig::from_app_config(config) {
        Some(memo_config) => Ok(Some(MemoClient::new(memo_config)?)),
        None => Ok(None),
    }
}

/// Runs the full snapshot and returns the path of the written PDF.
async fn run(cli: &CliArgs, config: &AppConfig) -> Result<PathBuf> {
    let (source, resolver) = build_provider(cli, config)?;
    let resolved = resolver.resolve(&cli.query).await;
    tracing::info!(symbol = %resolved.symbol, name = %resolved.name, "Resolved query");

    let metrics = CreditScoringEngine::new()
        .analyze(source.as_ref(), &resolved.symbol, Some(&resolved.name))
        .await
        .with_context(|| format!("Error resolving or fetching data for '{}'", cli.query))?;

    println!("{}", report_render::render_console(&metrics, source.source_name()));

    let narrator = build_narrator(cli, config)?;
    let narrative = if cli.memo {
        memo_client::narrate(narrator.as_ref().map(|m| m as &dyn NarrativeGenerator), &metrics).await
    } else {
        Narrative::Note("Memo generation skipped (--no-memo).".to_string())
    };

    match &narrative {
        Narrative::Memo(text) => {
            println!("\n{}\n CREDIT MEMO\n{}\n", "=".repeat(70), "=".repeat(70));
            println!("{}", text);
        }
        Narrative::Note(text) => println!("\nNote: {}", text),
    }

    std::fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("Cannot create {}", cli.out_dir.display()))?;
    let path = cli.out_dir.join(report_render::report_filename(metrics.ticker()));
    let pdf = report_render::render_pdf(&metrics, narrative.memo(), source.source_name())?;
    std::fs::write(&path, pdf).with_context(|| format!("Cannot write {}", path.display()))?;

    Ok(path)
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "credit_agent=info,fmp_client=warn,memo_client=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let argv: Vec<String> = std::env::args().skip(1).collect();
    let cli = match parse_args(&argv) {
        Ok(Some(cli)) => cli,
        Ok(None) => {
            eprintln!("{}", USAGE);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("{}\n\n{}", e, USAGE);
            std::process::exit(1);
        }
    };

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    match run(&cli, &config).await {
        Ok(path) => println!("\nPDF report written to {}", path.display()),
        Err(e) => {
            eprintln!("{:#}", e);
            std::process::exit(1);
        }
    }
}
