use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building a table, looking up a scale or sampling a delay.
#[derive(Debug, Error)]
pub enum FindError {
    #[error(transparent)]
    Data(#[from] DataError),
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl FindError {
    pub fn is_data(&self) -> bool {
        matches!(self, FindError::Data(_))
    }

    pub fn is_domain(&self) -> bool {
        matches!(self, FindError::Domain(_))
    }
}

/// The table source is missing, malformed or too small to interpolate.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("read table source {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("read table source: {0}")]
    Io(#[from] std::io::Error),
    #[error("table source has no header line")]
    MissingHeader,
    #[error("column `{0}` not found in header")]
    MissingColumn(String),
    #[error("line {line}: invalid {column} value `{value}`")]
    InvalidCell {
        line: usize,
        column: String,
        value: String,
    },
    #[error("line {line}: row has no `{column}` cell")]
    ShortRow { line: usize, column: String },
    #[error("duplicate elapsed time {0} in table source")]
    DuplicateKey(i64),
    #[error("need at least 2 samples to interpolate, found {0}")]
    TooFewSamples(usize),
    #[error("grid is empty: largest elapsed time {largest} leaves nothing after trimming")]
    EmptyGrid { largest: i64 },
    #[error("largest elapsed time {largest} spans more than {max} grid points")]
    GridTooLarge { largest: i64, max: usize },
    #[error("line {line}: unbalanced quotes in `{cell}`")]
    UnbalancedQuote { line: usize, cell: String },
    #[error("grid point {grid_point} precedes the first sample at {first}")]
    Uncovered { grid_point: i64, first: i64 },
    #[error("table has {actual} entries, expected {expected}")]
    LengthMismatch { expected: usize, actual: usize },
}

/// An argument lies outside the domain where the computation is defined.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("scale {0} is outside the open interval (0, 1)")]
    ScaleOutOfRange(f64),
    #[error("uniform draw {0} is outside [0, 1)")]
    UniformOutOfRange(f64),
    #[error("scale table is empty")]
    EmptyTable,
    #[error("index {index} out of bounds for table of {len} entries")]
    IndexOutOfBounds { index: usize, len: usize },
}
