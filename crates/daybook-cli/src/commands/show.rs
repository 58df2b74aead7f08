//! Print the persisted record for a branch and date.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Args;
use console::style;

use daybook_core::StoreGateway;
use daybook_store::SqliteStore;

/// Arguments for the show command.
#[derive(Args)]
pub struct ShowArgs {
    /// Branch code, e.g. REITZ
    branch: String,

    /// Report date (YYYY-MM-DD)
    date: NaiveDate,

    /// SQLite store path
    #[arg(short, long, default_value = "daybook.sqlite")]
    db: PathBuf,
}

pub fn run(args: ShowArgs) -> anyhow::Result<()> {
    let store = SqliteStore::open(&args.db)?;

    match store.fetch(&args.branch, args.date)? {
        Some(record) => {
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        None => {
            println!(
                "{} No record for {} on {}",
                style("ℹ").blue(),
                args.branch,
                args.date
            );
        }
    }

    Ok(())
}
