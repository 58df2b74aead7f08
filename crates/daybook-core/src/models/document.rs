//! Document models: raw inputs, classified documents, and report kinds.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::classify::classify;
use crate::identity::{generation_time, resolve_branch, resolve_date};

/// The closed set of report categories a branch can send.
///
/// Declaration order matters: it is the tie-break order used by the
/// classifier when two kinds reach the same keyword score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    /// Daily turnover totals with the payment-method breakdown.
    TurnoverSummary,
    /// Per-product sales listing with gross profit per line.
    GrossProfitReport,
    /// Stock movement and trading-account summary.
    TradingSummary,
    /// Dispensary script statistics and revenue.
    DispensarySummary,
    /// Invoicing audit trail with per-docket-type counts.
    TransactionSummary,
    /// No keyword set matched.
    Unknown,
}

impl ReportKind {
    /// All classifiable kinds, in classifier tie-break order.
    pub const CLASSIFIED: [ReportKind; 5] = [
        ReportKind::TurnoverSummary,
        ReportKind::GrossProfitReport,
        ReportKind::TradingSummary,
        ReportKind::DispensarySummary,
        ReportKind::TransactionSummary,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::TurnoverSummary => "turnover_summary",
            ReportKind::GrossProfitReport => "gross_profit_report",
            ReportKind::TradingSummary => "trading_summary",
            ReportKind::DispensarySummary => "dispensary_summary",
            ReportKind::TransactionSummary => "transaction_summary",
            ReportKind::Unknown => "unknown",
        }
    }
}

/// Explicit metadata handed in alongside the rendered text.
///
/// Callers that keep documents in date-named folders pass the folder date
/// here; the core never inspects filesystem layout itself.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceHint {
    /// Original filename of the source document.
    pub filename: String,

    /// Date of the containing folder, when the caller organizes documents
    /// that way. Lowest-priority date fallback.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_date: Option<NaiveDate>,
}

impl SourceHint {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            folder_date: None,
        }
    }

    pub fn with_folder_date(mut self, date: NaiveDate) -> Self {
        self.folder_date = Some(date);
        self
    }
}

/// One pending input document: rendered page text plus its hint.
#[derive(Debug, Clone)]
pub struct RawReport {
    /// Machine-extracted page text, pages concatenated.
    pub text: String,

    /// Source metadata.
    pub hint: SourceHint,
}

impl RawReport {
    pub fn new(text: impl Into<String>, hint: SourceHint) -> Self {
        Self {
            text: text.into(),
            hint,
        }
    }
}

/// A classified document, ready for deduplication and extraction.
///
/// Immutable once built; consumed by the pipeline and discarded.
#[derive(Debug, Clone)]
pub struct Document {
    /// Normalized (upper-cased) text all matching runs against.
    pub text: String,

    /// Classified report category.
    pub kind: ReportKind,

    /// Resolved branch code, or [`crate::identity::UNKNOWN_BRANCH`].
    pub branch: String,

    /// Resolved report date; `None` makes the document non-ingestible.
    pub report_date: Option<NaiveDate>,

    /// Intraday generation marker from the filename. Used only to order
    /// same-day duplicates, never for business semantics.
    pub generated: Option<NaiveTime>,

    /// Digest of the normalized text; deterministic dedup tie-break.
    pub content_digest: [u8; 32],

    /// Original filename, kept for logging and skip reports.
    pub filename: String,
}

impl Document {
    /// Classify and resolve a raw report into a document.
    pub fn from_raw(raw: &RawReport) -> Self {
        let text = normalize(&raw.text);
        let kind = classify(&text);
        let branch = resolve_branch(&text);
        let report_date = resolve_date(&text, &raw.hint);
        let generated = generation_time(&raw.hint.filename);
        let content_digest = Sha256::digest(text.as_bytes()).into();

        Self {
            text,
            kind,
            branch,
            report_date,
            generated,
            content_digest,
            filename: raw.hint.filename.clone(),
        }
    }
}

/// Upper-case rendered text for matching.
pub fn normalize(text: &str) -> String {
    text.to_uppercase()
}

/// Join page texts and upper-case the result.
pub fn normalize_pages<I, S>(pages: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let joined = pages
        .into_iter()
        .map(|p| p.as_ref().to_owned())
        .collect::<Vec<_>>()
        .join("\n");
    normalize(&joined)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_pages() {
        let text = normalize_pages(["Opening Stock 1.00", "Closing Stock 2.00"]);
        assert_eq!(text, "OPENING STOCK 1.00\nCLOSING STOCK 2.00");
    }

    #[test]
    fn test_document_from_raw() {
        let hint = SourceHint::new("trading_summary_1430_report.txt");
        let raw = RawReport::new(
            "Reitz Apteek\nOpening Stock and Closing Stock, Purchases, Adjustments\nFROM: 2025/08/05 TO: 2025/08/05",
            hint,
        );
        let doc = Document::from_raw(&raw);

        assert_eq!(doc.kind, ReportKind::TradingSummary);
        assert_eq!(doc.branch, "REITZ");
        assert_eq!(doc.report_date, NaiveDate::from_ymd_opt(2025, 8, 5));
        assert_eq!(doc.generated, NaiveTime::from_hms_opt(14, 30, 0));
    }

    #[test]
    fn test_digest_is_stable() {
        let hint = SourceHint::new("a.txt");
        let raw = RawReport::new("TOTAL TURNOVER", hint);
        let a = Document::from_raw(&raw);
        let b = Document::from_raw(&raw);
        assert_eq!(a.content_digest, b.content_digest);
    }
}
