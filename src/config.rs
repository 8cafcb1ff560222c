//! Row-source configuration: query templates and data-source selection.
//! Everything here is plain data handed to the source constructors.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{XplanError, XplanResult};

pub const ENV_DSN: &str = "XPLAN_DSN";
pub const ENV_QUERIES: &str = "XPLAN_QUERIES";

pub const DEFAULT_PLAN_SQL: &str = "SELECT
    id,
    operation,
    depth,
    options,
    object_name,
    cardinality,
    bytes,
    cost,
    cpu_cost,
    io_cost,
    access_predicates,
    filter_predicates,
    time,
    plan_hash_value,
    partition_start,
    partition_stop
FROM v$sql_plan
WHERE sql_id = :sql_id AND child_number = :child_number
ORDER BY id, parent_id";

pub const DEFAULT_TEXT_SQL: &str = "SELECT sql_text FROM v$sqltext WHERE sql_id = :sql_id ORDER BY piece";

/// The two queries a row source runs. `:sql_id` and `:child_number` are bound per report.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct QueryTemplates {
    pub plan_sql: String,
    pub text_sql: String,
}

impl Default for QueryTemplates {
    fn default() -> Self {
        Self { plan_sql: DEFAULT_PLAN_SQL.to_string(), text_sql: DEFAULT_TEXT_SQL.to_string() }
    }
}

impl QueryTemplates {
    pub fn from_json_str(s: &str) -> XplanResult<Self> {
        serde_json::from_str(s).map_err(|e| XplanError::config(format!("invalid query templates: {}", e)))
    }

    pub fn load(path: &Path) -> XplanResult<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| XplanError::config(format!("cannot read '{}': {}", path.display(), e)))?;
        debug!(target: "xplan::config", "loaded query templates from '{}'", path.display());
        Self::from_json_str(&text)
    }

    /// Explicit path wins, then `XPLAN_QUERIES`, then the built-in queries.
    pub fn resolve(path: Option<&Path>) -> XplanResult<Self> {
        match path.map(Path::to_path_buf).or_else(|| std::env::var_os(ENV_QUERIES).map(PathBuf::from)) {
            Some(p) => Self::load(&p),
            None => Ok(Self::default()),
        }
    }

    pub fn bind_plan(&self, sql_id: &str, child_number: u32) -> String {
        bind(&self.plan_sql, sql_id, child_number)
    }

    pub fn bind_text(&self, sql_id: &str, child_number: u32) -> String {
        bind(&self.text_sql, sql_id, child_number)
    }
}

/// Substitute the named placeholders with SQL literals in one pass over the
/// template; bound values are never rescanned.
pub fn bind(template: &str, sql_id: &str, child_number: u32) -> String {
    let mut out = String::with_capacity(template.len() + sql_id.len());
    let mut rest = template;
    while let Some(pos) = rest.find(':') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos + 1..];
        if let Some(after) = tail.strip_prefix("sql_id") {
            out.push_str(&quote_literal(sql_id));
            rest = after;
        } else if let Some(after) = tail.strip_prefix("child_number") {
            out.push_str(&child_number.to_string());
            rest = after;
        } else {
            out.push(':');
            rest = tail;
        }
    }
    out.push_str(rest);
    out
}

pub fn quote_literal(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// Which row source a DSN selects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    Postgres(String),
    Snapshot(PathBuf),
}

impl SourceKind {
    pub fn from_dsn(dsn: &str) -> XplanResult<Self> {
        let lower = dsn.to_ascii_lowercase();
        if lower.starts_with("postgres://") || lower.starts_with("postgresql://") {
            return Ok(SourceKind::Postgres(dsn.to_string()));
        }
        if let Some(rest) = dsn.strip_prefix("file:") {
            return Ok(SourceKind::Snapshot(PathBuf::from(rest)));
        }
        if lower.ends_with(".json") {
            return Ok(SourceKind::Snapshot(PathBuf::from(dsn)));
        }
        Err(XplanError::config(format!(
            "unsupported dsn '{}': expected postgres://, postgresql://, file:<path> or a .json snapshot",
            dsn
        )))
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
