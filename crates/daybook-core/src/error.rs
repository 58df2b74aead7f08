//! Error types for the daybook-core library.

use thiserror::Error;

use crate::store::StoreError;

/// Main error type for the daybook library.
///
/// Classification, identity resolution, and field extraction are total
/// functions and never produce an error; only store I/O and catalog loading
/// can fail.
#[derive(Error, Debug)]
pub enum DaybookError {
    /// Store gateway error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Department catalog could not be loaded.
    #[error("department catalog error: {0}")]
    Catalog(#[from] csv::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for the daybook library.
pub type Result<T> = std::result::Result<T, DaybookError>;
