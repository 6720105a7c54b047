use thiserror::Error;

/// Errors returned by the clustering and consensus pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// Input slice is empty.
    #[error("empty input")]
    EmptyInput,

    /// Invalid parameter value.
    #[error("invalid parameter {name}: {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Human-readable explanation.
        message: &'static str,
    },

    /// Requested cluster count is incompatible with the dataset.
    #[error("invalid cluster count: requested {requested}, but dataset has {n_items} items")]
    InvalidClusterCount {
        /// Requested number of clusters.
        requested: usize,
        /// Number of items in the dataset.
        n_items: usize,
    },

    /// Points in a dataset have inconsistent dimensionality.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Expected dimensionality.
        expected: usize,
        /// Found dimensionality.
        found: usize,
    },

    /// Label vectors fed to the consensus builder disagree on length.
    #[error("inconsistent label vectors: expected length {expected}, found {found}")]
    InconsistentLabels {
        /// Length of the first label vector.
        expected: usize,
        /// Length of the offending label vector.
        found: usize,
    },

    /// An attribute cell could not be parsed as a number.
    #[error("non-numeric value {value:?} in column {column:?} (data row {row})")]
    NonNumericValue {
        /// Column header (or 1-based position when unnamed).
        column: String,
        /// 1-based data row index.
        row: usize,
        /// Offending cell content.
        value: String,
    },

    /// Two rows share the same observation identifier.
    #[error("duplicate observation identifier {id:?} (data row {row})")]
    DuplicateIdentifier {
        /// The repeated identifier.
        id: String,
        /// 1-based data row of the second occurrence.
        row: usize,
    },

    /// I/O error while reading a dataset or writing an export.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parse or serialization error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;
