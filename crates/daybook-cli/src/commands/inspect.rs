//! Classify and extract a single document without touching the store.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use serde_json::json;

use daybook_core::extract::extract;
use daybook_core::models::document::{Document, RawReport, SourceHint};
use daybook_core::DepartmentCatalog;

/// Arguments for the inspect command.
#[derive(Args)]
pub struct InspectArgs {
    /// Rendered report text file
    input: PathBuf,

    /// Department catalog CSV (code,name) for gross-profit row labels
    #[arg(long)]
    departments: Option<PathBuf>,
}

pub fn run(args: InspectArgs) -> anyhow::Result<()> {
    let text = fs::read_to_string(&args.input)?;
    let filename = args
        .input
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unnamed.txt");

    let catalog = match &args.departments {
        Some(path) => Some(DepartmentCatalog::from_csv_path(path)?),
        None => None,
    };

    let raw = RawReport::new(text, SourceHint::new(filename));
    let doc = Document::from_raw(&raw);
    let fields = extract(&doc.text, doc.kind, catalog.as_ref());

    let output = json!({
        "filename": doc.filename,
        "kind": doc.kind,
        "branch": doc.branch,
        "report_date": doc.report_date,
        "generated": doc.generated.map(|t| t.format("%H:%M").to_string()),
        "fields": fields,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
