//! Batch ingestion of rendered report text files.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::NaiveDate;
use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use daybook_core::models::document::{RawReport, SourceHint};
use daybook_core::pipeline::{run_batch, SkipReason};
use daybook_core::DepartmentCatalog;
use daybook_store::SqliteStore;

/// Arguments for the ingest command.
#[derive(Args)]
pub struct IngestArgs {
    /// Input directory or glob pattern of rendered report text files
    #[arg(required = true)]
    input: String,

    /// SQLite store path
    #[arg(short, long, default_value = "daybook.sqlite")]
    db: PathBuf,

    /// Department catalog CSV (code,name) for gross-profit row labels
    #[arg(long)]
    departments: Option<PathBuf>,

    /// Also write a per-record summary CSV
    #[arg(long)]
    summary: Option<PathBuf>,
}

pub fn run(args: IngestArgs) -> anyhow::Result<()> {
    let start = Instant::now();

    let pattern = if Path::new(&args.input).is_dir() {
        format!("{}/**/*.txt", args.input.trim_end_matches('/'))
    } else {
        args.input.clone()
    };

    let files: Vec<PathBuf> = glob(&pattern)?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", pattern);
    }

    println!(
        "{} Found {} documents to ingest",
        style("ℹ").blue(),
        files.len()
    );

    let catalog = match &args.departments {
        Some(path) => Some(DepartmentCatalog::from_csv_path(path)?),
        None => None,
    };

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap()
            .progress_chars("=>-"),
    );

    let mut reports = Vec::with_capacity(files.len());
    for path in &files {
        let text = fs::read_to_string(path)?;
        reports.push(RawReport::new(text, hint_for(path)));
        pb.inc(1);
    }
    pb.finish_with_message("loaded");

    let store = SqliteStore::open(&args.db)?;
    let outcome = run_batch(&reports, &store, catalog.as_ref());

    println!();
    for record in &outcome.upserted {
        println!(
            "{} {} {} turnover {} | {} transactions | {} scripts",
            style("✓").green(),
            record.branch,
            record.date,
            record
                .turnover
                .map(|v| v.to_string())
                .unwrap_or_else(|| "-".to_string()),
            record
                .transactions_total
                .map(|v| v.to_string())
                .unwrap_or_else(|| "-".to_string()),
            record
                .script_total
                .map(|v| v.to_string())
                .unwrap_or_else(|| "-".to_string()),
        );
    }

    if !outcome.skipped.is_empty() {
        println!();
        println!("{}", style("Skipped documents:").yellow());
        for skipped in &outcome.skipped {
            let reason = match &skipped.reason {
                SkipReason::Unclassified => "no report kind matched".to_string(),
                SkipReason::NoDate => "no report date resolved".to_string(),
                SkipReason::Superseded { by } => format!("superseded by {}", by),
            };
            println!("  - {}: {}", skipped.filename, reason);
        }
    }

    if !outcome.failed.is_empty() {
        println!();
        println!("{}", style("Failed groups:").red());
        for failure in &outcome.failed {
            println!("  - {} {}: {}", failure.branch, failure.date, failure.error);
        }
    }

    if let Some(summary_path) = &args.summary {
        write_summary(summary_path, &outcome.upserted)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    println!();
    println!(
        "{} Ingested {} documents in {:?}: {} records upserted, {} skipped, {} groups failed",
        style("✓").green(),
        files.len(),
        start.elapsed(),
        style(outcome.upserted.len()).green(),
        style(outcome.skipped.len()).yellow(),
        style(outcome.failed.len()).red(),
    );

    if outcome.failed.is_empty() {
        Ok(())
    } else {
        anyhow::bail!("{} group(s) failed; rerun the batch to retry", outcome.failed.len())
    }
}

/// Derive the source hint from the file's own name and its date-named
/// ancestor directory, when the caller keeps the date/branch layout.
fn hint_for(path: &Path) -> SourceHint {
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unnamed.txt")
        .to_string();

    let mut hint = SourceHint::new(filename);

    for ancestor in path.ancestors().skip(1).take(2) {
        let Some(name) = ancestor.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if let Ok(date) = name.parse::<NaiveDate>() {
            debug!(path = %path.display(), %date, "folder date hint");
            hint = hint.with_folder_date(date);
            break;
        }
    }

    hint
}

fn write_summary(
    path: &Path,
    records: &[daybook_core::DailyMetrics],
) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "branch",
        "date",
        "turnover",
        "gp_value",
        "gp_percent",
        "transactions_total",
        "avg_basket_value",
        "avg_basket_size",
        "script_total",
        "avg_script_value",
        "disp_turnover",
    ])?;

    for record in records {
        wtr.write_record([
            record.branch.clone(),
            record.date.to_string(),
            column(record.turnover),
            column(record.gp_value),
            column(record.gp_percent),
            record
                .transactions_total
                .map(|v| v.to_string())
                .unwrap_or_default(),
            column(record.avg_basket_value),
            column(record.avg_basket_size),
            record
                .script_total
                .map(|v| v.to_string())
                .unwrap_or_default(),
            column(record.avg_script_value),
            column(record.disp_turnover),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

fn column(value: Option<rust_decimal::Decimal>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use daybook_core::StoreGateway;

    #[test]
    fn test_hint_for_reads_date_from_ancestors() {
        let hint = hint_for(Path::new("inbox/2025-08-05/REITZ/trading_summary_1430_a.txt"));
        assert_eq!(hint.filename, "trading_summary_1430_a.txt");
        assert_eq!(hint.folder_date, NaiveDate::from_ymd_opt(2025, 8, 5));
    }

    #[test]
    fn test_hint_for_without_date_folder() {
        let hint = hint_for(Path::new("inbox/reports/trading_summary_1430_a.txt"));
        assert_eq!(hint.folder_date, None);
    }

    #[test]
    fn test_ingest_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let branch_dir = dir.path().join("2025-08-05").join("REITZ");
        fs::create_dir_all(&branch_dir).unwrap();
        fs::write(
            branch_dir.join("turnover_summary_0900_a.txt"),
            "REITZ TURNOVER SUMMARY\nGP % 30.00\nBASKET VALUE\n** TOTAL TURNOVER 1,000.00 150.00- 850.00\nFROM: 2025/08/05 TO: 2025/08/05",
        )
        .unwrap();

        let db = dir.path().join("daybook.sqlite");
        run(IngestArgs {
            input: dir.path().to_string_lossy().into_owned(),
            db: db.clone(),
            departments: None,
            summary: None,
        })
        .unwrap();

        let store = SqliteStore::open(&db).unwrap();
        let record = store
            .fetch("REITZ", NaiveDate::from_ymd_opt(2025, 8, 5).unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(record.turnover.unwrap().to_string(), "850.00");
    }
}
