//! Catalog service process entry point.
//!
//! # Responsibility
//! - Own the store connection lifecycle: open (connect) on start, drop
//!   (disconnect) on exit.
//! - Serve newline-delimited JSON requests from stdin, one response per line.
//!
//! `catalog_service --version` prints the version and exits.

use catalog_core::db::open_db;
use catalog_core::{
    core_version, init_logging, CatalogConfig, ProductService, SqliteProductRepository,
};
use catalog_rpc::CatalogHandler;
use log::{error, info};
use std::error::Error;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;

fn main() -> ExitCode {
    if std::env::args().skip(1).any(|arg| arg == "--version") {
        println!("catalog_service version={}", core_version());
        return ExitCode::SUCCESS;
    }

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=service_stop module=cli status=error error={err}");
            eprintln!("catalog_service: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let config = CatalogConfig::from_env()?;
    let log_dir = config.log_dir.to_string_lossy().into_owned();
    init_logging(config.log_level, &log_dir)?;

    let conn = open_db(&config.db_path)?;
    info!(
        "event=store_connect module=cli status=ok db_path={}",
        config.db_path.display()
    );

    let repo = SqliteProductRepository::try_new(&conn)?;
    let handler = CatalogHandler::new(ProductService::new(repo), config.default_page_limit);

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    let mut served: u64 = 0;
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        writeln!(stdout, "{}", handler.handle_line(&line))?;
        stdout.flush()?;
        served += 1;
    }

    drop(handler);
    conn.close().map_err(|(_, err)| err)?;
    info!("event=store_disconnect module=cli status=ok requests_served={served}");
    Ok(())
}
