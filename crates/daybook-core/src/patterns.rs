//! Common regex patterns for report identity and field extraction.
//!
//! All patterns match against normalized (upper-cased) text.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Report-period ranges. The END date of the LAST match is the report
    // date: footers repeat the period and are more reliable than headers.
    pub static ref DATE_RANGE_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"FROM:\s*(\d{4})/(\d{1,2})/(\d{1,2})\s+TO:\s*(\d{4})/(\d{1,2})/(\d{1,2})").unwrap(),
        Regex::new(r"(\d{4})/(\d{1,2})/(\d{1,2})\s*-\s*(\d{4})/(\d{1,2})/(\d{1,2})").unwrap(),
        Regex::new(r"RANGE.*FROM:\s*(\d{4})/(\d{1,2})/(\d{1,2})\s+TO:\s*(\d{4})/(\d{1,2})/(\d{1,2})").unwrap(),
        Regex::new(r"PERIOD.*FROM:\s*(\d{4})/(\d{1,2})/(\d{1,2})\s+TO:\s*(\d{4})/(\d{1,2})/(\d{1,2})").unwrap(),
        Regex::new(r"DATE FROM\s*:\s*(\d{4})/(\d{1,2})/(\d{1,2})\s+DATE TO\s*:\s*(\d{4})/(\d{1,2})/(\d{1,2})").unwrap(),
    ];

    // Loose single dates, tried only after every range pattern failed.
    pub static ref DATE_YMD: Regex =
        Regex::new(r"\b(\d{4})[/-](\d{1,2})[/-](\d{1,2})\b").unwrap();

    pub static ref DATE_DMY: Regex =
        Regex::new(r"\b(\d{1,2})[/-](\d{1,2})[/-](\d{2,4})\b").unwrap();

    pub static ref DATE_DMY_MONTH_NAME: Regex =
        Regex::new(r"\b(\d{1,2})\s+(JAN|FEB|MAR|APR|MAY|JUN|JUL|AUG|SEP|OCT|NOV|DEC)\s+(\d{4})\b").unwrap();

    pub static ref DATE_MONTH_NAME_DMY: Regex =
        Regex::new(r"\b(JAN|FEB|MAR|APR|MAY|JUN|JUL|AUG|SEP|OCT|NOV|DEC)\s+(\d{1,2})\s+(\d{4})\b").unwrap();

    // 8-digit date fragment embedded in a filename.
    pub static ref FILENAME_DATE: Regex = Regex::new(r"(20\d{6})").unwrap();

    // Boundary-delimited 4-digit intraday marker in a filename (HHMM).
    pub static ref TIME_MARKER: Regex =
        Regex::new(r"(?:^|[_\-])(\d{4})(?:[_\-.])").unwrap();

    // Generic branch labels, tried after the known-branch scan.
    pub static ref BRANCH_LABEL: Regex =
        Regex::new(r"(?:PHARMACY|STORE|BRANCH|LOCATION)[:\s]+([A-Z ]+)").unwrap();

    // Trading summary fields. Two-pattern fallback lists per field.
    pub static ref TRADING_TURNOVER: Vec<Regex> = vec![
        Regex::new(r"(?s)SALES.*?RETAIL.*?(\d{1,3}(?:,\d{3})*\.\d{2}-?)").unwrap(),
        Regex::new(r"(?s)SALES.*?STKTRN.*?(\d{1,3}(?:,\d{3})*\.\d{2}-?)").unwrap(),
    ];

    pub static ref TRADING_STOCK_OPENING: Vec<Regex> = vec![
        Regex::new(r"(?s)OPENING STOCK.*?(\d{1,3}(?:,\d{3})*\.\d{2}-?)").unwrap(),
        Regex::new(r"(?s)OPENING STOCK.*?START DATE.*?(\d{1,3}(?:,\d{3})*\.\d{2}-?)").unwrap(),
    ];

    pub static ref TRADING_PURCHASES: Vec<Regex> = vec![
        Regex::new(r"(?s)PURCHASES.*?(\d{1,3}(?:,\d{3})*\.\d{2}-?)").unwrap(),
        Regex::new(r"(?s)\+\s*PURCHASES.*?(\d{1,3}(?:,\d{3})*\.\d{2}-?)").unwrap(),
    ];

    pub static ref TRADING_ADJUSTMENTS: Vec<Regex> = vec![
        Regex::new(r"(?s)ADJUSTMENTS.*?(\d{1,3}(?:,\d{3})*\.\d{2}-?)").unwrap(),
        Regex::new(r"(?s)\+\s*ADJUSTMENTS.*?(\d{1,3}(?:,\d{3})*\.\d{2}-?)").unwrap(),
    ];

    pub static ref TRADING_STOCK_CLOSING: Vec<Regex> = vec![
        Regex::new(r"(?s)CLOSING STOCK.*?(\d{1,3}(?:,\d{3})*\.\d{2}-?)").unwrap(),
        Regex::new(r"(?s)CLOSING STOCK.*?END DATE.*?(\d{1,3}(?:,\d{3})*\.\d{2}-?)").unwrap(),
    ];

    pub static ref TRADING_COST_OF_SALES: Vec<Regex> = vec![
        Regex::new(r"(?s)COST OF SALES.*?(\d{1,3}(?:,\d{3})*\.\d{2}-?)").unwrap(),
        Regex::new(r"(?s)COST OF GOODS SOLD.*?(\d{1,3}(?:,\d{3})*\.\d{2}-?)").unwrap(),
    ];

    pub static ref TRADING_GP_VALUE: Vec<Regex> = vec![
        Regex::new(r"(?s)GROSS PROFIT FROM TRADING.*?(\d{1,3}(?:,\d{3})*\.\d{2}-?)").unwrap(),
        Regex::new(r"(?s)= GROSS PROFIT FROM TRADING.*?(\d{1,3}(?:,\d{3})*\.\d{2}-?)").unwrap(),
    ];

    pub static ref TRADING_GP_PERCENT: Vec<Regex> = vec![
        Regex::new(r"(?s)GROSS PROFIT AS A PERCENTAGE.*?=\s*(\d+\.\d{2})").unwrap(),
        Regex::new(r"(?s)PERCENTAGE OF RETAIL SALES.*?=\s*(\d+\.\d{2})").unwrap(),
    ];

    // Turnover summary totals lines carry three numeric groups per line:
    // gross, discount, nett-excl. The THIRD group is the value; a trailing
    // minus negates only the group it is attached to.
    pub static ref TURNOVER_TOTAL: Regex = totals_line(r"TOTAL TURNOVER");
    pub static ref TURNOVER_CASH: Regex = totals_line(r"CASH TOTALS");
    pub static ref TURNOVER_ACCOUNT: Regex = totals_line(r"STANDARD ACCOUNTS");
    pub static ref TURNOVER_COD: Regex = totals_line(r"C\.O\.D\.\s*ACCOUNTS");
    pub static ref TURNOVER_TYPE_R: Regex = totals_line(r"TYPE R SALES");

    // Fallback when the totals line is missing but the summary block repeats
    // the nett-exclusive figure.
    pub static ref TURNOVER_NETT_FALLBACK: Regex =
        Regex::new(r"(?s)TURNOVER SUMMARY.*?(\d{1,3}(?:,\d{3})*\.\d{2})\s+NETT\s+\(EXCLUSIVE\)").unwrap();

    // Dispensary summary.
    pub static ref SCRIPT_TOTAL_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(?s)NUMBER OF DOCUMENTS - DISPENSED.*?(\d+)\s*$").unwrap(),
        Regex::new(r"(?s)NUMBER OF DOCUMENTS - DISPENSED.*?TOTAL\s+(\d+)").unwrap(),
    ];

    pub static ref REVENUE_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"TOTAL REVENUE\s+([\d,]+\.?\d*)").unwrap(),
        Regex::new(r"(?s)TOTAL REVENUE.*?GROSS INCOME\s+([\d,]+\.?\d*)").unwrap(),
        Regex::new(r"(?s)TOTAL REVENUE.*?NETT INCOME\s+([\d,]+\.?\d*)").unwrap(),
    ];

    // Gross profit report data rows. Fixed-width columns: department code,
    // stock code, description, on-hand qty, sales qty, sales value, sales
    // cost, gross profit, [turnover %], gp %.
    pub static ref GP_ROW_FULL: Regex = Regex::new(
        r"^([A-Z0-9]{6})\s+([A-Z0-9\-]{4,})\s+(.*?)\s+(-?\d+\.\d{3})\s+(-?\d+\.\d{3})\s+(-?\d+\.\d{2})\s+(-?\d+\.\d{2})\s+(-?\d+\.\d{2})\s+(-?\d+\.\d{2,3})\s+(-?\d+\.\d{2,3})$"
    ).unwrap();

    pub static ref GP_ROW_SHORT: Regex = Regex::new(
        r"^([A-Z0-9]{6})\s+([A-Z0-9\-]{4,})\s+(.*?)\s+(-?\d+\.\d{3})\s+(-?\d+\.\d{3})\s+(-?\d+\.\d{2})\s+(-?\d+\.\d{2})\s+(-?\d+\.\d{2})\s+(-?\d+\.\d{2,3})$"
    ).unwrap();
}

fn totals_line(label: &str) -> Regex {
    let amount = r"(\d{1,3}(?:,\d{3})*\.\d{2}-?)";
    Regex::new(&format!(
        r"\*\*\s*{label}\s+{amount}\s+{amount}\s+{amount}"
    ))
    .unwrap()
}
