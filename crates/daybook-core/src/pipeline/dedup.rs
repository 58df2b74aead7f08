//! Same-day duplicate collapsing.
//!
//! Branches resend corrected reports later the same day; within each
//! (date, branch, kind) group only the document with the latest intraday
//! marker survives. Equal markers are broken by content digest so the
//! outcome never depends on input order.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::debug;

use crate::models::document::{Document, ReportKind};

type GroupKey = (NaiveDate, String, ReportKind);

/// Collapse each (date, branch, kind) group to its latest stamped document.
///
/// Documents without a marker bypass collapsing entirely; the aggregator's
/// anchor-metric rule resolves them later. Returns the survivors and the
/// superseded documents paired with the filename that replaced them.
pub fn collapse_intraday(docs: Vec<Document>) -> (Vec<Document>, Vec<(Document, String)>) {
    let mut groups: BTreeMap<GroupKey, Vec<Document>> = BTreeMap::new();
    let mut survivors = Vec::new();

    for doc in docs {
        match doc.report_date {
            Some(date) => {
                let key = (date, doc.branch.clone(), doc.kind);
                groups.entry(key).or_default().push(doc);
            }
            // Undated documents are skipped upstream; pass through untouched.
            None => survivors.push(doc),
        }
    }

    let mut superseded = Vec::new();

    for (key, group) in groups {
        let (stamped, unstamped): (Vec<_>, Vec<_>) =
            group.into_iter().partition(|d| d.generated.is_some());

        survivors.extend(unstamped);

        if stamped.is_empty() {
            continue;
        }

        let winner_idx = stamped
            .iter()
            .enumerate()
            .max_by_key(|(_, d)| (d.generated, d.content_digest))
            .map(|(i, _)| i)
            .expect("non-empty group");

        let mut winner_name = String::new();
        let mut losers = Vec::new();
        for (i, doc) in stamped.into_iter().enumerate() {
            if i == winner_idx {
                winner_name = doc.filename.clone();
                survivors.push(doc);
            } else {
                losers.push(doc);
            }
        }

        for doc in losers {
            debug!(
                filename = %doc.filename,
                superseded_by = %winner_name,
                date = %key.0,
                branch = %key.1,
                kind = doc.kind.as_str(),
                "intraday duplicate discarded"
            );
            superseded.push((doc, winner_name.clone()));
        }
    }

    (survivors, superseded)
}
