//! The batch pipeline: classify, dedup, extract, aggregate, reconcile,
//! persist.
//!
//! One run processes a batch of newly arrived documents to completion;
//! the triggering scheduler guarantees runs never overlap. Within a run,
//! each (branch, date) group is resolved and persisted independently, so a
//! store failure is scoped to its own group. Rerunning the same batch is
//! idempotent: the max-based policy can only reproduce or improve the
//! persisted state.

pub mod aggregate;
pub mod dedup;
pub mod derived;
pub mod reconcile;

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::departments::DepartmentCatalog;
use crate::extract::extract;
use crate::models::document::{Document, RawReport, ReportKind};
use crate::models::fields::ExtractedFields;
use crate::models::metrics::DailyMetrics;
use crate::store::{StoreError, StoreGateway};

pub use aggregate::{candidate, merge, CategorySlots};
pub use dedup::collapse_intraday;
pub use reconcile::{reconcile, ChoiceReason, FieldDecision};

/// Why a document was dropped from a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// No keyword set matched the text.
    Unclassified,
    /// Neither text, filename, nor hint yielded a report date.
    NoDate,
    /// A later intraday re-export of the same report replaced it.
    Superseded { by: String },
}

/// A document dropped from a batch, kept for the run report.
#[derive(Debug, Clone)]
pub struct SkippedReport {
    pub filename: String,
    pub reason: SkipReason,
}

/// A (branch, date) group whose store interaction failed.
#[derive(Debug)]
pub struct GroupFailure {
    pub branch: String,
    pub date: NaiveDate,
    pub error: StoreError,
}

/// Result of one batch run.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Final reconciled records, one per (branch, date) touched.
    pub upserted: Vec<DailyMetrics>,
    /// Documents dropped before aggregation, with reasons.
    pub skipped: Vec<SkippedReport>,
    /// Groups whose store interaction failed; their previous persisted
    /// state is untouched.
    pub failed: Vec<GroupFailure>,
}

/// Run one batch of raw reports against the store.
pub fn run_batch<S: StoreGateway>(
    reports: &[RawReport],
    store: &S,
    catalog: Option<&DepartmentCatalog>,
) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();

    // Classification and identity resolution, per document.
    let mut documents = Vec::new();
    for raw in reports {
        let doc = Document::from_raw(raw);

        if doc.kind == ReportKind::Unknown {
            warn!(filename = %doc.filename, "document did not match any report kind, skipping");
            outcome.skipped.push(SkippedReport {
                filename: doc.filename,
                reason: SkipReason::Unclassified,
            });
            continue;
        }

        if doc.report_date.is_none() {
            warn!(
                filename = %doc.filename,
                kind = doc.kind.as_str(),
                "no report date could be resolved, skipping"
            );
            outcome.skipped.push(SkippedReport {
                filename: doc.filename,
                reason: SkipReason::NoDate,
            });
            continue;
        }

        documents.push(doc);
    }

    // Same-day duplicate collapsing per (date, branch, kind).
    let (survivors, superseded) = collapse_intraday(documents);
    for (doc, winner) in superseded {
        outcome.skipped.push(SkippedReport {
            filename: doc.filename,
            reason: SkipReason::Superseded { by: winner },
        });
    }

    // Extraction, then grouping by (branch, date). Grouping is the
    // parallelism boundary: each group is single-writer.
    let mut groups: BTreeMap<(String, NaiveDate), Vec<ExtractedFields>> = BTreeMap::new();
    for doc in survivors {
        let Some(date) = doc.report_date else { continue };
        if let Some(fields) = extract(&doc.text, doc.kind, catalog) {
            groups.entry((doc.branch.clone(), date)).or_default().push(fields);
        }
    }

    // Aggregate, reconcile, and persist each group independently.
    for ((branch, date), outputs) in groups {
        let slots = merge(outputs);
        let candidate_record = candidate(&branch, date, &slots);

        let existing = match store.fetch(&branch, date) {
            Ok(existing) => existing,
            Err(error) => {
                warn!(%branch, %date, %error, "fetch failed, leaving group untouched");
                outcome.failed.push(GroupFailure { branch, date, error });
                continue;
            }
        };

        let (final_record, decisions) = reconcile(existing.as_ref(), &candidate_record);
        info!(
            %branch,
            %date,
            decisions = decisions.len(),
            turnover = ?final_record.turnover,
            "group reconciled"
        );

        if let Err(error) = store.upsert(&final_record) {
            warn!(%branch, %date, %error, "upsert failed, previous state is preserved");
            outcome.failed.push(GroupFailure { branch, date, error });
            continue;
        }

        // Rollups are best-effort: recompute failure never fails the group.
        if let Err(error) = store.recompute_rollups(&branch, date) {
            warn!(%branch, %date, %error, "rollup recompute failed");
        }

        outcome.upserted.push(final_record);
    }

    info!(
        upserted = outcome.upserted.len(),
        skipped = outcome.skipped.len(),
        failed = outcome.failed.len(),
        "batch complete"
    );
    outcome
}
