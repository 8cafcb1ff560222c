//! Unified error model for the report pipeline.
//! Row sources, the column extractor and the formatting engine all return
//! `XplanError`; the binary maps any of them to a non-zero exit.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum XplanError {
    /// Row source unreachable or credentials rejected.
    #[error("connection failed: {0}")]
    Connection(String),
    /// One of the two row-source queries failed to execute.
    #[error("query failed: {0}")]
    Query(String),
    #[error("column '{column}' missing from {result_set} result set")]
    MissingColumn { column: String, result_set: String },
    #[error("invalid value '{value}' in column {column}")]
    InvalidValue { column: String, value: String },
    /// Zero plan rows for the requested statement/child.
    #[error("no plan found for SQL_ID {sql_id}, child number {child_number}")]
    EmptyResult { sql_id: String, child_number: u32 },
    /// Internal invariant violation detected while assembling the report.
    #[error("formatting inconsistency: {0}")]
    Formatting(String),
    #[error("snapshot: {0}")]
    Snapshot(String),
    #[error("config: {0}")]
    Config(String),
}

impl XplanError {
    pub fn code_str(&self) -> &'static str {
        match self {
            XplanError::Connection(_) => "connection_error",
            XplanError::Query(_) => "query_error",
            XplanError::MissingColumn { .. } => "missing_column",
            XplanError::InvalidValue { .. } => "invalid_value",
            XplanError::EmptyResult { .. } => "empty_result",
            XplanError::Formatting(_) => "formatting_inconsistency",
            XplanError::Snapshot(_) => "snapshot_error",
            XplanError::Config(_) => "config_error",
        }
    }

    pub fn missing_column<S: Into<String>>(column: S, result_set: S) -> Self {
        XplanError::MissingColumn { column: column.into(), result_set: result_set.into() }
    }
    pub fn invalid_value<S: Into<String>>(column: S, value: S) -> Self {
        XplanError::InvalidValue { column: column.into(), value: value.into() }
    }
    pub fn formatting<S: Into<String>>(msg: S) -> Self { XplanError::Formatting(msg.into()) }
    pub fn snapshot<S: Into<String>>(msg: S) -> Self { XplanError::Snapshot(msg.into()) }
    pub fn config<S: Into<String>>(msg: S) -> Self { XplanError::Config(msg.into()) }
}

pub type XplanResult<T> = Result<T, XplanError>;

impl From<tokio_postgres::Error> for XplanError {
    fn from(err: tokio_postgres::Error) -> Self {
        // Errors without a server-side cause (closed socket, handshake) are connection problems
        if err.as_db_error().is_some() {
            XplanError::Query(err.to_string())
        } else {
            XplanError::Connection(err.to_string())
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
