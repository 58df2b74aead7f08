//! Branch and report-date resolution from noisy text and filenames.

use chrono::{NaiveDate, NaiveTime};
use tracing::debug;

use crate::models::document::SourceHint;
use crate::patterns::{
    BRANCH_LABEL, DATE_DMY, DATE_DMY_MONTH_NAME, DATE_MONTH_NAME_DMY, DATE_RANGE_PATTERNS,
    DATE_YMD, FILENAME_DATE, TIME_MARKER,
};

/// Sentinel branch code when no branch could be resolved.
pub const UNKNOWN_BRANCH: &str = "UNKNOWN";

/// The closed set of branch codes reports are known to come from.
const KNOWN_BRANCHES: [&str; 2] = ["REITZ", "TLC WINTERTON"];

/// Resolve the branch code from normalized report text.
///
/// Known branch names are tried first as exact substrings, then the
/// spelling variants the Winterton branch's POS emits, then generic
/// `PHARMACY:`-style labels. Falls back to [`UNKNOWN_BRANCH`].
pub fn resolve_branch(text: &str) -> String {
    for branch in KNOWN_BRANCHES {
        if text.contains(branch) {
            return branch.to_string();
        }
    }

    // The Winterton POS truncates its own name on some layouts.
    if (text.contains("TLC") && text.contains("WINTERTON"))
        || text.contains("WINTERTON")
        || text.contains("WINTERTO")
    {
        return "TLC WINTERTON".to_string();
    }

    if let Some(caps) = BRANCH_LABEL.captures(text) {
        let name = caps[1].trim();
        if name.len() > 2 {
            return name.to_string();
        }
    }

    UNKNOWN_BRANCH.to_string()
}

/// Resolve the report date, in priority order:
///
/// 1. a "from-to" range pattern, taking the end date of the last match;
/// 2. a single-date pattern, taking the last match in the document (the
///    report date is printed near the end, after any print timestamps);
/// 3. an 8-digit date fragment in the filename;
/// 4. the hint's folder date;
/// 5. `None` - the caller must skip the document.
pub fn resolve_date(text: &str, hint: &SourceHint) -> Option<NaiveDate> {
    if let Some(date) = range_end_date(text) {
        return Some(date);
    }

    if let Some(date) = last_single_date(text) {
        return Some(date);
    }

    if let Some(caps) = FILENAME_DATE.captures(&hint.filename.to_uppercase()) {
        let raw = &caps[1];
        let year: i32 = raw[..4].parse().ok()?;
        let month: u32 = raw[4..6].parse().ok()?;
        let day: u32 = raw[6..8].parse().ok()?;
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            debug!(filename = %hint.filename, %date, "report date taken from filename");
            return Some(date);
        }
    }

    if let Some(date) = hint.folder_date {
        debug!(filename = %hint.filename, %date, "report date taken from folder hint");
        return Some(date);
    }

    None
}

/// Extract the intraday generation marker from a filename.
///
/// The marker is a boundary-delimited 4-digit HHMM group; it orders same-day
/// duplicates and carries no business meaning.
pub fn generation_time(filename: &str) -> Option<NaiveTime> {
    for caps in TIME_MARKER.captures_iter(filename) {
        let raw = &caps[1];
        let hour: u32 = raw[..2].parse().ok()?;
        let minute: u32 = raw[2..].parse().ok()?;
        if let Some(time) = NaiveTime::from_hms_opt(hour, minute, 0) {
            return Some(time);
        }
    }
    None
}

fn range_end_date(text: &str) -> Option<NaiveDate> {
    for pattern in DATE_RANGE_PATTERNS.iter() {
        if let Some(last) = pattern.captures_iter(text).last() {
            if let Some(date) = ymd(&last[4], &last[5], &last[6]) {
                return Some(date);
            }
        }
    }
    None
}

fn last_single_date(text: &str) -> Option<NaiveDate> {
    if let Some(caps) = DATE_YMD.captures_iter(text).last() {
        if let Some(date) = ymd(&caps[1], &caps[2], &caps[3]) {
            return Some(date);
        }
    }

    if let Some(caps) = DATE_DMY.captures_iter(text).last() {
        if let Some(date) = dmy(&caps[1], &caps[2], &caps[3]) {
            return Some(date);
        }
    }

    if let Some(caps) = DATE_DMY_MONTH_NAME.captures_iter(text).last() {
        let month = month_number(&caps[2])?;
        if let Some(date) = build_date(&caps[3], month, &caps[1]) {
            return Some(date);
        }
    }

    if let Some(caps) = DATE_MONTH_NAME_DMY.captures_iter(text).last() {
        let month = month_number(&caps[1])?;
        if let Some(date) = build_date(&caps[3], month, &caps[2]) {
            return Some(date);
        }
    }

    None
}

fn ymd(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

fn dmy(day: &str, month: &str, year: &str) -> Option<NaiveDate> {
    let year: i32 = year.parse().ok()?;
    let year = if year < 100 { 2000 + year } else { year };
    NaiveDate::from_ymd_opt(year, month.parse().ok()?, day.parse().ok()?)
}

fn build_date(year: &str, month: u32, day: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year.parse().ok()?, month, day.parse().ok()?)
}

fn month_number(name: &str) -> Option<u32> {
    match name {
        "JAN" => Some(1),
        "FEB" => Some(2),
        "MAR" => Some(3),
        "APR" => Some(4),
        "MAY" => Some(5),
        "JUN" => Some(6),
        "JUL" => Some(7),
        "AUG" => Some(8),
        "SEP" => Some(9),
        "OCT" => Some(10),
        "NOV" => Some(11),
        "DEC" => Some(12),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hint(filename: &str) -> SourceHint {
        SourceHint::new(filename)
    }

    #[test]
    fn test_resolve_known_branch() {
        assert_eq!(resolve_branch("REITZ APTEEK DAILY REPORT"), "REITZ");
        assert_eq!(resolve_branch("TLC WINTERTON PHARMACY"), "TLC WINTERTON");
    }

    #[test]
    fn test_resolve_branch_spelling_variants() {
        assert_eq!(resolve_branch("WINTERTO PHARM"), "TLC WINTERTON");
        assert_eq!(resolve_branch("STORE WINTERTON"), "TLC WINTERTON");
    }

    #[test]
    fn test_resolve_branch_generic_label() {
        assert_eq!(resolve_branch("PHARMACY: HILLSIDE CORNER"), "HILLSIDE CORNER");
    }

    #[test]
    fn test_resolve_branch_unknown() {
        assert_eq!(resolve_branch("no names in here"), UNKNOWN_BRANCH);
    }

    #[test]
    fn test_range_end_date_wins() {
        let text = "PRINTED 2025/08/06\nFROM: 2025/08/01 TO: 2025/08/05";
        assert_eq!(
            resolve_date(text, &hint("x.txt")),
            NaiveDate::from_ymd_opt(2025, 8, 5)
        );
    }

    #[test]
    fn test_last_range_match_wins() {
        let text = "FROM: 2025/07/01 TO: 2025/07/31\nsome body\nFROM: 2025/08/01 TO: 2025/08/05";
        assert_eq!(
            resolve_date(text, &hint("x.txt")),
            NaiveDate::from_ymd_opt(2025, 8, 5)
        );
    }

    #[test]
    fn test_last_single_date_wins() {
        let text = "PRINTED ON 2025/08/01\nREPORT DATE 2025/08/05";
        assert_eq!(
            resolve_date(text, &hint("x.txt")),
            NaiveDate::from_ymd_opt(2025, 8, 5)
        );
    }

    #[test]
    fn test_filename_date_fallback() {
        assert_eq!(
            resolve_date("no dates in body", &hint("report_20250805_1430_a.txt")),
            NaiveDate::from_ymd_opt(2025, 8, 5)
        );
    }

    #[test]
    fn test_folder_date_fallback() {
        let hint = SourceHint::new("report.txt")
            .with_folder_date(NaiveDate::from_ymd_opt(2025, 8, 5).unwrap());
        assert_eq!(
            resolve_date("no dates in body", &hint),
            NaiveDate::from_ymd_opt(2025, 8, 5)
        );
    }

    #[test]
    fn test_unresolvable_date_is_none() {
        assert_eq!(resolve_date("no dates at all", &hint("report.txt")), None);
    }

    #[test]
    fn test_generation_time() {
        assert_eq!(
            generation_time("trading_summary_1430_report.txt"),
            NaiveTime::from_hms_opt(14, 30, 0)
        );
        // The 8-digit date fragment is not a marker.
        assert_eq!(generation_time("report_20250805.txt"), None);
        assert_eq!(generation_time("report.txt"), None);
    }

    #[test]
    fn test_generation_time_rejects_invalid_hhmm() {
        assert_eq!(generation_time("report_9930_x.txt"), None);
    }
}
