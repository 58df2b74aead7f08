//! Report-type classification by keyword scoring.

use crate::models::document::ReportKind;

/// Keyword sets per report kind, in tie-break order.
///
/// Three to four literal phrases per category; the vocabulary of the POS
/// report layouts is stable enough that substring counting is sufficient.
const KEYWORD_SETS: [(ReportKind, &[&str]); 5] = [
    (
        ReportKind::TurnoverSummary,
        &["TOTAL TURNOVER", "GP %", "BASKET VALUE", "TRANSACTIONS"],
    ),
    (
        ReportKind::GrossProfitReport,
        &["GROSS PROFIT", "STOCK CODE", "SALES QTY", "DEPT"],
    ),
    (
        ReportKind::TradingSummary,
        &["OPENING STOCK", "CLOSING STOCK", "PURCHASES", "ADJUSTMENTS"],
    ),
    (
        ReportKind::DispensarySummary,
        &[
            "SCRIPT STATISTICS",
            "CLAIMABLE SCRIPTS",
            "PRIVATE SCRIPTS",
            "DOCTOR SCRIPT",
        ],
    ),
    (ReportKind::TransactionSummary, &["INVOICING AUDIT TRAIL"]),
];

/// Classify normalized report text into one of the five kinds.
///
/// The kind with the highest keyword-match count wins; the first kind in
/// declaration order wins ties. All-zero scores return [`ReportKind::Unknown`].
/// Pure and total: repeated calls on the same text always return the same
/// kind.
pub fn classify(text: &str) -> ReportKind {
    let mut best = ReportKind::Unknown;
    let mut best_score = 0usize;

    for (kind, keywords) in KEYWORD_SETS {
        let score = keywords.iter().filter(|kw| text.contains(*kw)).count();
        if score > best_score {
            best = kind;
            best_score = score;
        }
    }

    best
}
