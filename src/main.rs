// ==========================================
// Vendas Ingest - CLI entry point
// ==========================================
// Usage:
//   vendas-ingest <db_path> <ledger.csv> [--scoped]
//
// Ingests one semicolon-delimited sales-ledger export into the
// SQLite record store and prints the run summary as JSON.
// --scoped selects the filename-scoped variant (store derived
// from the file name, no implicit operator creation).
// ==========================================

use anyhow::{bail, Context, Result};
use std::fs::File;
use std::path::Path;
use vendas_ingest::{logging, IngestConfig, LedgerIngestor, SqliteRecordStore};

fn main() -> Result<()> {
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{} v{}", vendas_ingest::APP_NAME, vendas_ingest::VERSION);
    tracing::info!("==================================================");

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        eprintln!("usage: {} <db_path> <ledger.csv> [--scoped]", args[0]);
        bail!("missing arguments");
    }

    let db_path = &args[1];
    let ledger_path = &args[2];
    let scoped = args.iter().any(|a| a == "--scoped");

    let filename = Path::new(ledger_path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(ledger_path)
        .to_string();

    tracing::info!(db = %db_path, file = %filename, scoped, "opening record store");
    let records = SqliteRecordStore::new(db_path)
        .with_context(|| format!("failed to open record store at {}", db_path))?;

    let config = IngestConfig::default();
    let ingestor = LedgerIngestor::new(&records, &config);

    let input =
        File::open(ledger_path).with_context(|| format!("failed to open {}", ledger_path))?;

    let report = if scoped {
        ingestor.ingest_scoped(input, &filename)?
    } else {
        ingestor.ingest_mapped(input, &filename)?
    };

    println!("{}", serde_json::to_string_pretty(&report.summary())?);
    Ok(())
}
