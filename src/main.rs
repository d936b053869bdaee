//! Sheetrow - read and edit CSV sheets as header-keyed records

mod cli;
mod config;
mod error;
mod output;

use anyhow::Context;
use cli::{Command, Invocation, Parsed};
use config::Config;
use error::CliError;
use sheetrow_core::store::{CsvSheet, CsvWorkbook};
use sheetrow_core::{Book, Workbook};
use std::env;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();

    let invocation = match cli::parse_args(&args) {
        Ok(Parsed::Help) => {
            cli::print_usage();
            return;
        }
        Ok(Parsed::Run(invocation)) => invocation,
        Err(e) => {
            eprintln!("Error: {}", e);
            cli::print_usage();
            std::process::exit(1);
        }
    };

    init_logging(invocation.verbose);

    let (config, warnings) = config::load_config(invocation.config_file.as_ref());
    for warning in warnings {
        eprintln!("Warning: {}", warning);
    }

    if let Err(e) = run(invocation, config) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn open_workbook(invocation: &Invocation, config: &Config) -> anyhow::Result<CsvWorkbook> {
    let dir = invocation
        .workbook
        .as_ref()
        .or(config.workbook.as_ref())
        .ok_or(CliError::MissingWorkbook)?;
    debug!(dir = %dir.display(), "opening workbook");
    CsvWorkbook::open(dir, config.sheet_floor())
        .with_context(|| format!("Failed to open workbook {}", dir.display()))
}

fn open_book(
    workbook: &CsvWorkbook,
    invocation: &Invocation,
    config: &Config,
) -> anyhow::Result<Book<CsvSheet>> {
    let title = invocation
        .sheet
        .as_ref()
        .or(config.sheet.as_ref())
        .ok_or(CliError::MissingSheet)?;
    Ok(Book::open(workbook, title)?)
}

fn run(invocation: Invocation, config: Config) -> anyhow::Result<()> {
    let workbook = open_workbook(&invocation, &config)?;

    if invocation.command == Command::Sheets {
        for title in workbook.sheet_titles()? {
            println!("{}", title);
        }
        return Ok(());
    }

    let mut book = open_book(&workbook, &invocation, &config)?;

    match invocation.command {
        Command::Sheets => {}
        Command::Header => {
            let header = book.fetch_header()?;
            print!("{}", output::render_header(&header));
        }
        Command::Fetch => {
            let table = book.fetch()?;
            let records = table.find(&invocation.criteria);
            let format = invocation.format.or(config.format).unwrap_or_default();
            let rendered = output::render_records(format, &table.header, &records);
            match &invocation.output {
                Some(path) => {
                    std::fs::write(path, rendered)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    println!("Exported {} records to {}", records.len(), path.display());
                }
                None => print!("{}", rendered),
            }
        }
        Command::Update => {
            let summary = book.update_row(&invocation.criteria, &invocation.values)?;
            println!(
                "Updated {} rows ({} cells)",
                summary.updated_row_count, summary.updated_cell_count
            );
        }
        Command::Insert => {
            book.insert_row(&invocation.values)?;
            println!("Inserted 1 row");
        }
        Command::Delete => {
            let summary = book.delete_rows(&invocation.criteria)?;
            println!("Deleted {} rows", summary.deleted_row_count);
        }
    }
    Ok(())
}
