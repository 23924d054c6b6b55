use thiserror::Error;

/// Why a single CSV row could not become a `SalesRecord`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseErrorKind {
    #[error("expected 8 fields, found {0}")]
    FieldCount(usize),
    #[error("field `{field}` is not a valid number: {value:?}")]
    InvalidNumber { field: &'static str, value: String },
    #[error("date {0:?} is not in DD-MM-YYYY format")]
    InvalidDate(String),
    #[error("unknown day of week {0:?}")]
    InvalidDayOfWeek(String),
    #[error("field `{field}` is outside ±{limit}: {value}")]
    AmountOutOfRange {
        field: &'static str,
        value: i64,
        limit: i64,
    },
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("line {line}: {kind}")]
pub struct ParseError {
    pub line: u64,
    pub kind: ParseErrorKind,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {key} has invalid value {value:?}")]
    InvalidValue { key: &'static str, value: String },
    #[error("budget bounds are inverted: min {min} > max {max}")]
    InvalidBudgetBounds { min: f64, max: f64 },
}

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("no data loaded")]
    NoData,
}

pub type Result<T> = std::result::Result<T, DashboardError>;
