//! Demo bootstrap entry point.
//!
//! # Responsibility
//! - Open the configured store and seed it once if it was never written.
//! - Print deterministic `key=value` lines for quick local checks.

use seeddb_core::db::open_db;
use seeddb_core::{
    init_logging, DocumentStore, ErrorSink, LogErrorSink, SeedConfig, SeedError, SeedGuard,
    SeedOutcome, SqliteDocumentStore,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    let config = match SeedConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("config_error={err}");
            return ExitCode::FAILURE;
        }
    };

    if let Some(log_dir) = config.log_dir.as_deref() {
        if let Err(err) = init_logging(config.log_level, log_dir) {
            eprintln!("logging_error={err}");
        }
    }

    let conn = match open_db(&config.db_path) {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("db_open_error={err}");
            return ExitCode::FAILURE;
        }
    };
    let store = match SqliteDocumentStore::try_new(&conn, config.db_name.as_str()) {
        Ok(store) => store,
        Err(err) => {
            eprintln!("store_error={err}");
            return ExitCode::FAILURE;
        }
    };

    let guard = SeedGuard::new(&store);
    let mut sink = |err: &SeedError| {
        LogErrorSink.report(err);
        eprintln!("seed_error={err}");
    };
    let status = match guard.run_reported(&mut sink) {
        Some(SeedOutcome::Seeded { .. }) => "seeded",
        Some(SeedOutcome::AlreadySeeded { .. }) => "already_seeded",
        None => "failed",
    };

    println!("seed={status}");
    println!("db_path={}", config.db_path.display());
    if let Ok(info) = store.info() {
        println!("db_name={}", info.db_name);
        println!("update_seq={}", info.update_seq);
        println!("doc_count={}", info.doc_count);
    }
    ExitCode::SUCCESS
}
