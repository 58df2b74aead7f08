//! Cross-run reconciliation against persisted state.
//!
//! Every maximized field is resolved independently: a missing-or-zero
//! existing value defers to the candidate, a null candidate is "no new
//! information", and otherwise the larger value wins, so persisted values
//! only ever grow. The derived bundle (percentages, averages, adjustments)
//! is NOT taken field-wise: it moves wholesale with whichever side won the
//! turnover anchor, keeping averages consistent with the value set they
//! were computed from.

use rust_decimal::Decimal;
use tracing::debug;

use crate::models::metrics::DailyMetrics;

/// Why a field's value was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceReason {
    /// No (or zero) existing value; candidate taken.
    NoExisting,
    /// Candidate strictly larger than existing.
    CandidateLarger,
    /// Existing at least as large; kept.
    ExistingKept,
    /// Candidate had nothing to offer; existing kept as-is.
    NoCandidate,
    /// Bundle field following the candidate's turnover win.
    BundleCandidate,
    /// Bundle field following the existing side's turnover win.
    BundleExisting,
}

impl ChoiceReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChoiceReason::NoExisting => "no_existing",
            ChoiceReason::CandidateLarger => "candidate_larger",
            ChoiceReason::ExistingKept => "existing_kept",
            ChoiceReason::NoCandidate => "no_candidate",
            ChoiceReason::BundleCandidate => "bundle_candidate",
            ChoiceReason::BundleExisting => "bundle_existing",
        }
    }
}

/// Per-field audit value for one reconciliation run. Logged, never persisted.
#[derive(Debug, Clone)]
pub struct FieldDecision {
    pub field: &'static str,
    pub existing: Option<Decimal>,
    pub candidate: Option<Decimal>,
    pub chosen: Option<Decimal>,
    pub reason: ChoiceReason,
}

/// Reconcile a candidate record against the persisted record for the same
/// (branch, date). An absent persisted record behaves as all-null.
pub fn reconcile(
    existing: Option<&DailyMetrics>,
    candidate: &DailyMetrics,
) -> (DailyMetrics, Vec<FieldDecision>) {
    let empty = DailyMetrics::new(candidate.branch.clone(), candidate.date);
    let existing = existing.unwrap_or(&empty);

    let mut decisions = Vec::new();
    let mut record = DailyMetrics::new(candidate.branch.clone(), candidate.date);

    record.turnover = pick(&mut decisions, "turnover", existing.turnover, candidate.turnover);
    record.gp_value = pick(&mut decisions, "gp_value", existing.gp_value, candidate.gp_value);
    record.cost_of_sales = pick(
        &mut decisions,
        "cost_of_sales",
        existing.cost_of_sales,
        candidate.cost_of_sales,
    );
    record.purchases = pick(
        &mut decisions,
        "purchases",
        existing.purchases,
        candidate.purchases,
    );
    record.disp_turnover = pick(
        &mut decisions,
        "disp_turnover",
        existing.disp_turnover,
        candidate.disp_turnover,
    );
    record.stock_opening = pick(
        &mut decisions,
        "stock_opening",
        existing.stock_opening,
        candidate.stock_opening,
    );
    record.stock_closing = pick(
        &mut decisions,
        "stock_closing",
        existing.stock_closing,
        candidate.stock_closing,
    );
    record.sales_cash = pick(
        &mut decisions,
        "sales_cash",
        existing.sales_cash,
        candidate.sales_cash,
    );
    record.sales_account = pick(
        &mut decisions,
        "sales_account",
        existing.sales_account,
        candidate.sales_account,
    );
    record.sales_cod = pick(&mut decisions, "sales_cod", existing.sales_cod, candidate.sales_cod);
    record.type_r_sales = pick(
        &mut decisions,
        "type_r_sales",
        existing.type_r_sales,
        candidate.type_r_sales,
    );

    record.transactions_total = pick_count(
        &mut decisions,
        "transactions_total",
        existing.transactions_total,
        candidate.transactions_total,
    );
    record.script_total = pick_count(
        &mut decisions,
        "script_total",
        existing.script_total,
        candidate.script_total,
    );

    // The derived bundle follows the turnover winner. Equal turnover means
    // the candidate is the fresher computation of the same values.
    let candidate_won = record.turnover == candidate.turnover;
    let (bundle_side, bundle_reason) = if candidate_won {
        (candidate, ChoiceReason::BundleCandidate)
    } else {
        (existing, ChoiceReason::BundleExisting)
    };

    record.gp_percent = bundle(
        &mut decisions,
        "gp_percent",
        existing.gp_percent,
        candidate.gp_percent,
        bundle_side.gp_percent,
        bundle_reason,
    );
    record.avg_basket_value = bundle(
        &mut decisions,
        "avg_basket_value",
        existing.avg_basket_value,
        candidate.avg_basket_value,
        bundle_side.avg_basket_value,
        bundle_reason,
    );
    record.avg_basket_size = bundle(
        &mut decisions,
        "avg_basket_size",
        existing.avg_basket_size,
        candidate.avg_basket_size,
        bundle_side.avg_basket_size,
        bundle_reason,
    );
    record.avg_script_value = bundle(
        &mut decisions,
        "avg_script_value",
        existing.avg_script_value,
        candidate.avg_script_value,
        bundle_side.avg_script_value,
        bundle_reason,
    );
    record.adjustments = bundle(
        &mut decisions,
        "adjustments",
        existing.adjustments,
        candidate.adjustments,
        bundle_side.adjustments,
        bundle_reason,
    );

    (record, decisions)
}

fn choose(existing: Option<Decimal>, candidate: Option<Decimal>) -> (Option<Decimal>, ChoiceReason) {
    match (existing, candidate) {
        (existing, None) => (existing, ChoiceReason::NoCandidate),
        (None, Some(c)) => (Some(c), ChoiceReason::NoExisting),
        (Some(e), Some(c)) if e.is_zero() => (Some(c), ChoiceReason::NoExisting),
        (Some(e), Some(c)) if c > e => (Some(c), ChoiceReason::CandidateLarger),
        (Some(e), Some(_)) => (Some(e), ChoiceReason::ExistingKept),
    }
}

fn pick(
    decisions: &mut Vec<FieldDecision>,
    field: &'static str,
    existing: Option<Decimal>,
    candidate: Option<Decimal>,
) -> Option<Decimal> {
    let (chosen, reason) = choose(existing, candidate);
    push_decision(decisions, field, existing, candidate, chosen, reason);
    chosen
}

fn pick_count(
    decisions: &mut Vec<FieldDecision>,
    field: &'static str,
    existing: Option<i64>,
    candidate: Option<i64>,
) -> Option<i64> {
    let (chosen, reason) = choose(existing.map(Decimal::from), candidate.map(Decimal::from));
    push_decision(
        decisions,
        field,
        existing.map(Decimal::from),
        candidate.map(Decimal::from),
        chosen,
        reason,
    );
    // The chosen value is one of the two inputs, so the conversion back is
    // lossless.
    match reason {
        ChoiceReason::NoExisting | ChoiceReason::CandidateLarger => candidate,
        _ => existing,
    }
}

fn bundle(
    decisions: &mut Vec<FieldDecision>,
    field: &'static str,
    existing: Option<Decimal>,
    candidate: Option<Decimal>,
    chosen: Option<Decimal>,
    reason: ChoiceReason,
) -> Option<Decimal> {
    push_decision(decisions, field, existing, candidate, chosen, reason);
    chosen
}

fn push_decision(
    decisions: &mut Vec<FieldDecision>,
    field: &'static str,
    existing: Option<Decimal>,
    candidate: Option<Decimal>,
    chosen: Option<Decimal>,
    reason: ChoiceReason,
) {
    debug!(
        field,
        existing = ?existing,
        candidate = ?candidate,
        chosen = ?chosen,
        reason = reason.as_str(),
        "field reconciled"
    );
    decisions.push(FieldDecision {
        field,
        existing,
        candidate,
        chosen,
        reason,
    });
}
