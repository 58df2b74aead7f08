//! SQLite-backed [`StoreGateway`] for daily metrics.
//!
//! One row per (branch_code, report_date); the UNIQUE key on that pair is
//! the idempotency key for every upsert. Decimals are stored as TEXT so
//! values round-trip without float drift; counts are INTEGER. Monthly
//! rollups are recomputed from the daily rows after each upsert and their
//! failure never fails ingestion.

use std::path::Path;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use rusqlite::{params, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;
use tracing::debug;

use daybook_core::models::metrics::DailyMetrics;
use daybook_core::store::{StoreError, StoreGateway};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS daily_summary (
    id                 INTEGER PRIMARY KEY,
    branch_code        TEXT NOT NULL,
    report_date        TEXT NOT NULL,
    turnover           TEXT,
    gp_value           TEXT,
    gp_percent         TEXT,
    cost_of_sales      TEXT,
    purchases          TEXT,
    stock_opening      TEXT,
    stock_closing      TEXT,
    adjustments        TEXT,
    transactions_total INTEGER,
    avg_basket_value   TEXT,
    avg_basket_size    TEXT,
    script_total       INTEGER,
    avg_script_value   TEXT,
    disp_turnover      TEXT,
    sales_cash         TEXT,
    sales_account      TEXT,
    sales_cod          TEXT,
    type_r_sales       TEXT,
    updated_at         TEXT NOT NULL DEFAULT (datetime('now')),
    UNIQUE (branch_code, report_date)
);

CREATE TABLE IF NOT EXISTS monthly_rollup (
    id                 INTEGER PRIMARY KEY,
    branch_code        TEXT NOT NULL,
    month              TEXT NOT NULL,
    turnover           TEXT,
    gp_value           TEXT,
    transactions_total INTEGER,
    script_total       INTEGER,
    days_reported      INTEGER NOT NULL,
    UNIQUE (branch_code, month)
);
";

const UPSERT: &str = "
INSERT INTO daily_summary (
    branch_code, report_date, turnover, gp_value, gp_percent, cost_of_sales,
    purchases, stock_opening, stock_closing, adjustments, transactions_total,
    avg_basket_value, avg_basket_size, script_total, avg_script_value,
    disp_turnover, sales_cash, sales_account, sales_cod, type_r_sales,
    updated_at
) VALUES (
    ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16,
    ?17, ?18, ?19, ?20, datetime('now')
) ON CONFLICT (branch_code, report_date) DO UPDATE SET
    turnover           = excluded.turnover,
    gp_value           = excluded.gp_value,
    gp_percent         = excluded.gp_percent,
    cost_of_sales      = excluded.cost_of_sales,
    purchases          = excluded.purchases,
    stock_opening      = excluded.stock_opening,
    stock_closing      = excluded.stock_closing,
    adjustments        = excluded.adjustments,
    transactions_total = excluded.transactions_total,
    avg_basket_value   = excluded.avg_basket_value,
    avg_basket_size    = excluded.avg_basket_size,
    script_total       = excluded.script_total,
    avg_script_value   = excluded.avg_script_value,
    disp_turnover      = excluded.disp_turnover,
    sales_cash         = excluded.sales_cash,
    sales_account      = excluded.sales_account,
    sales_cod          = excluded.sales_cod,
    type_r_sales       = excluded.type_r_sales,
    updated_at         = excluded.updated_at
";

const FETCH: &str = "
SELECT branch_code, report_date, turnover, gp_value, gp_percent,
       cost_of_sales, purchases, stock_opening, stock_closing, adjustments,
       transactions_total, avg_basket_value, avg_basket_size, script_total,
       avg_script_value, disp_turnover, sales_cash, sales_account, sales_cod,
       type_r_sales
FROM daily_summary
WHERE branch_code = ?1 AND report_date = ?2
";

const ROLLUP: &str = "
INSERT INTO monthly_rollup (
    branch_code, month, turnover, gp_value, transactions_total, script_total,
    days_reported
)
SELECT branch_code,
       substr(report_date, 1, 7),
       CAST(total(CAST(turnover AS REAL)) AS TEXT),
       CAST(total(CAST(gp_value AS REAL)) AS TEXT),
       total(transactions_total),
       total(script_total),
       count(*)
FROM daily_summary
WHERE branch_code = ?1 AND substr(report_date, 1, 7) = ?2
GROUP BY branch_code
ON CONFLICT (branch_code, month) DO UPDATE SET
    turnover           = excluded.turnover,
    gp_value           = excluded.gp_value,
    transactions_total = excluded.transactions_total,
    script_total       = excluded.script_total,
    days_reported      = excluded.days_reported
";

/// SQLite store gateway.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (creating if needed) a store at the given path.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        Self::with_connection(conn)
    }

    /// Open an in-memory store, for tests and dry runs.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)
            .map_err(|e| StoreError::Query(e.to_string()))?;
        Ok(Self { conn })
    }
}

impl StoreGateway for SqliteStore {
    fn fetch(&self, branch: &str, date: NaiveDate) -> Result<Option<DailyMetrics>, StoreError> {
        self.conn
            .query_row(FETCH, params![branch, date.to_string()], row_to_record)
            .optional()
            .map_err(|e| StoreError::Query(e.to_string()))?
            .transpose()
    }

    fn upsert(&self, record: &DailyMetrics) -> Result<(), StoreError> {
        self.conn
            .execute(
                UPSERT,
                params![
                    record.branch,
                    record.date.to_string(),
                    text(record.turnover),
                    text(record.gp_value),
                    text(record.gp_percent),
                    text(record.cost_of_sales),
                    text(record.purchases),
                    text(record.stock_opening),
                    text(record.stock_closing),
                    text(record.adjustments),
                    record.transactions_total,
                    text(record.avg_basket_value),
                    text(record.avg_basket_size),
                    record.script_total,
                    text(record.avg_script_value),
                    text(record.disp_turnover),
                    text(record.sales_cash),
                    text(record.sales_account),
                    text(record.sales_cod),
                    text(record.type_r_sales),
                ],
            )
            .map_err(|e| StoreError::Query(e.to_string()))?;

        debug!(branch = %record.branch, date = %record.date, "daily summary upserted");
        Ok(())
    }

    fn recompute_rollups(&self, branch: &str, date: NaiveDate) -> Result<(), StoreError> {
        let month = format!("{:04}-{:02}", date.year(), date.month());
        self.conn
            .execute(ROLLUP, params![branch, month])
            .map_err(|e| StoreError::Query(e.to_string()))?;

        debug!(%branch, %month, "monthly rollup recomputed");
        Ok(())
    }
}

fn text(value: Option<Decimal>) -> Option<String> {
    value.map(|d| d.to_string())
}

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<Result<DailyMetrics, StoreError>> {
    let branch: String = row.get(0)?;
    let date_raw: String = row.get(1)?;

    let Ok(date) = NaiveDate::from_str(&date_raw) else {
        return Ok(Err(StoreError::Decode {
            column: "report_date",
            value: date_raw,
        }));
    };

    let mut record = DailyMetrics::new(branch, date);

    macro_rules! decimal_column {
        ($field:ident, $idx:expr, $name:literal) => {
            let raw: Option<String> = row.get($idx)?;
            record.$field = match raw {
                Some(raw) => match Decimal::from_str(&raw) {
                    Ok(value) => Some(value),
                    Err(_) => {
                        return Ok(Err(StoreError::Decode {
                            column: $name,
                            value: raw,
                        }))
                    }
                },
                None => None,
            };
        };
    }

    decimal_column!(turnover, 2, "turnover");
    decimal_column!(gp_value, 3, "gp_value");
    decimal_column!(gp_percent, 4, "gp_percent");
    decimal_column!(cost_of_sales, 5, "cost_of_sales");
    decimal_column!(purchases, 6, "purchases");
    decimal_column!(stock_opening, 7, "stock_opening");
    decimal_column!(stock_closing, 8, "stock_closing");
    decimal_column!(adjustments, 9, "adjustments");
    record.transactions_total = row.get(10)?;
    decimal_column!(avg_basket_value, 11, "avg_basket_value");
    decimal_column!(avg_basket_size, 12, "avg_basket_size");
    record.script_total = row.get(13)?;
    decimal_column!(avg_script_value, 14, "avg_script_value");
    decimal_column!(disp_turnover, 15, "disp_turnover");
    decimal_column!(sales_cash, 16, "sales_cash");
    decimal_column!(sales_account, 17, "sales_account");
    decimal_column!(sales_cod, 18, "sales_cod");
    decimal_column!(type_r_sales, 19, "type_r_sales");

    Ok(Ok(record))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Option<Decimal> {
        Decimal::from_str(s).ok()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, d).unwrap()
    }

    fn sample(date: NaiveDate) -> DailyMetrics {
        let mut record = DailyMetrics::new("REITZ", date);
        record.turnover = dec("13517.38");
        record.gp_value = dec("4203.10");
        record.gp_percent = dec("31.09");
        record.transactions_total = Some(120);
        record.script_total = Some(200);
        record.adjustments = dec("-320.00");
        record.avg_basket_value = dec("112.64");
        record
    }

    #[test]
    fn test_fetch_missing_is_none() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert!(store.fetch("REITZ", day(5)).unwrap().is_none());
    }

    #[test]
    fn test_upsert_then_fetch_roundtrip() {
        let store = SqliteStore::open_in_memory().unwrap();
        let record = sample(day(5));

        store.upsert(&record).unwrap();
        let fetched = store.fetch("REITZ", day(5)).unwrap().unwrap();

        assert_eq!(fetched, record);
    }

    #[test]
    fn test_upsert_is_idempotent_on_key() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut record = sample(day(5));

        store.upsert(&record).unwrap();
        record.turnover = dec("14000.00");
        store.upsert(&record).unwrap();

        let fetched = store.fetch("REITZ", day(5)).unwrap().unwrap();
        assert_eq!(fetched.turnover, dec("14000.00"));

        let rows: i64 = store
            .conn
            .query_row("SELECT count(*) FROM daily_summary", [], |r| r.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn test_rollup_aggregates_the_month() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.upsert(&sample(day(4))).unwrap();
        store.upsert(&sample(day(5))).unwrap();
        store.recompute_rollups("REITZ", day(5)).unwrap();

        let (turnover, transactions, days): (String, i64, i64) = store
            .conn
            .query_row(
                "SELECT turnover, transactions_total, days_reported
                 FROM monthly_rollup WHERE branch_code = 'REITZ' AND month = '2025-08'",
                [],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
            )
            .unwrap();

        assert!((turnover.parse::<f64>().unwrap() - 27034.76).abs() < 0.01);
        assert_eq!(transactions, 240);
        assert_eq!(days, 2);
    }

    #[test]
    fn test_open_creates_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("daybook.sqlite");

        let store = SqliteStore::open(&path).unwrap();
        store.upsert(&sample(day(5))).unwrap();
        drop(store);

        let reopened = SqliteStore::open(&path).unwrap();
        assert!(reopened.fetch("REITZ", day(5)).unwrap().is_some());
    }
}
