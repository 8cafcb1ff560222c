//! Row source backed by a captured JSON document.
//!
//! ```json
//! {
//!   "sql_id": "7h35uxf5uhmm1",
//!   "child_number": 0,
//!   "plan": { "columns": ["ID", "OPERATION", ...], "rows": [[0, "SELECT STATEMENT", ...]] },
//!   "sql_text": { "columns": ["SQL_TEXT"], "rows": [["select * from emp"]] }
//! }
//! ```
//!
//! Each section may also be wrapped as `{"results": {"columns", "rows"}}`, or be a
//! plain array of row objects. `sql_id`/`child_number` are optional; when present
//! a request for a different cursor finds no rows.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::error::{XplanError, XplanResult};
use crate::plan::{Cell, ResultSet, SQL_TEXT_COLUMN};

use super::RowSource;

#[derive(Debug, Clone)]
pub struct SnapshotSource {
    origin: PathBuf,
    sql_id: Option<String>,
    child_number: Option<u32>,
    plan: ResultSet,
    sql_text: ResultSet,
}

impl SnapshotSource {
    pub fn open(path: &Path) -> XplanResult<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| XplanError::snapshot(format!("cannot read '{}': {}", path.display(), e)))?;
        let mut src = Self::from_json_str(&text)?;
        src.origin = path.to_path_buf();
        debug!(target: "xplan::source", "snapshot '{}': plan_rows={} text_pieces={}", path.display(), src.plan.len(), src.sql_text.len());
        Ok(src)
    }

    pub fn from_json_str(text: &str) -> XplanResult<Self> {
        let val: Value = serde_json::from_str(text).map_err(|e| XplanError::snapshot(format!("invalid json: {}", e)))?;
        Self::from_value(&val)
    }

    pub fn from_value(val: &Value) -> XplanResult<Self> {
        let sql_id = val.get("sql_id").and_then(Value::as_str).map(str::to_string);
        let child_number = match val.get("child_number") {
            None | Some(Value::Null) => None,
            Some(v) => Some(
                v.as_u64()
                    .and_then(|n| u32::try_from(n).ok())
                    .ok_or_else(|| XplanError::snapshot(format!("invalid child_number: {}", v)))?,
            ),
        };
        let plan_v = val.get("plan").ok_or_else(|| XplanError::snapshot("missing 'plan' section"))?;
        let plan = parse_section("plan", plan_v)?;
        let sql_text = match val.get("sql_text") {
            Some(v) => parse_section("sql_text", v)?,
            None => ResultSet::new("sql_text", vec![SQL_TEXT_COLUMN.to_string()], Vec::new()),
        };
        Ok(Self { origin: PathBuf::new(), sql_id, child_number, plan, sql_text })
    }

    fn matches(&self, sql_id: &str, child_number: Option<u32>) -> bool {
        self.sql_id.as_deref().map_or(true, |s| s == sql_id)
            && match (self.child_number, child_number) {
                (Some(mine), Some(asked)) => mine == asked,
                _ => true,
            }
    }
}

impl RowSource for SnapshotSource {
    fn describe(&self) -> String { format!("snapshot:{}", self.origin.display()) }

    async fn fetch_plan(&self, sql_id: &str, child_number: u32) -> XplanResult<ResultSet> {
        if self.matches(sql_id, Some(child_number)) {
            Ok(self.plan.clone())
        } else {
            debug!(target: "xplan::source", "snapshot holds a different cursor than {}/{}", sql_id, child_number);
            Ok(ResultSet::new("plan", self.plan.columns().to_vec(), Vec::new()))
        }
    }

    async fn fetch_sql_text(&self, sql_id: &str, _child_number: u32) -> XplanResult<ResultSet> {
        if self.matches(sql_id, None) {
            Ok(self.sql_text.clone())
        } else {
            Ok(ResultSet::new("sql_text", self.sql_text.columns().to_vec(), Vec::new()))
        }
    }
}

fn parse_section(name: &str, v: &Value) -> XplanResult<ResultSet> {
    let body = v.get("results").unwrap_or(v);
    match body {
        Value::Array(rows) => from_object_rows(name, rows),
        Value::Object(_) => {
            let cols_v = body
                .get("columns")
                .ok_or_else(|| XplanError::snapshot(format!("'{}' section has no columns", name)))?;
            let columns = normalize_columns(cols_v)
                .ok_or_else(|| XplanError::snapshot(format!("'{}' columns must be an array", name)))?;
            let rows_v = body.get("rows").cloned().unwrap_or(Value::Array(Vec::new()));
            let rows = normalize_rows(name, &columns, &rows_v)?;
            Ok(ResultSet::new(name, columns, rows))
        }
        _ => Err(XplanError::snapshot(format!("'{}' section must be an object or array", name))),
    }
}

// Column entries are names, or objects carrying a "name".
fn normalize_columns(v: &Value) -> Option<Vec<String>> {
    let arr = v.as_array()?;
    let mut out = Vec::with_capacity(arr.len());
    for c in arr {
        match c {
            Value::String(s) => out.push(s.clone()),
            Value::Object(map) => out.push(map.get("name").and_then(Value::as_str)?.to_string()),
            _ => return None,
        }
    }
    Some(out)
}

fn normalize_rows(name: &str, columns: &[String], v: &Value) -> XplanResult<Vec<Vec<Cell>>> {
    let arr = v
        .as_array()
        .ok_or_else(|| XplanError::snapshot(format!("'{}' rows must be an array", name)))?;
    let mut out = Vec::with_capacity(arr.len());
    for (i, row) in arr.iter().enumerate() {
        match row {
            Value::Array(cells) => {
                if cells.len() > columns.len() {
                    return Err(XplanError::snapshot(format!(
                        "'{}' row {} has {} values for {} columns",
                        name,
                        i,
                        cells.len(),
                        columns.len()
                    )));
                }
                out.push(cells.iter().map(Cell::from_json).collect());
            }
            Value::Object(obj) => {
                // Keyed rows: look each column up by name, case-insensitively
                out.push(
                    columns
                        .iter()
                        .map(|c| {
                            obj.iter()
                                .find(|(k, _)| k.eq_ignore_ascii_case(c))
                                .map(|(_, v)| Cell::from_json(v))
                                .unwrap_or(Cell::Null)
                        })
                        .collect(),
                );
            }
            scalar => {
                if columns.len() != 1 {
                    return Err(XplanError::snapshot(format!("'{}' row {} is a scalar", name, i)));
                }
                out.push(vec![Cell::from_json(scalar)]);
            }
        }
    }
    Ok(out)
}

// Array of row objects: columns are the union of keys in first-seen order.
fn from_object_rows(name: &str, rows: &[Value]) -> XplanResult<ResultSet> {
    let mut columns: Vec<String> = Vec::new();
    for row in rows {
        let obj = row
            .as_object()
            .ok_or_else(|| XplanError::snapshot(format!("'{}' array rows must be objects", name)))?;
        for k in obj.keys() {
            if !columns.iter().any(|c| c.eq_ignore_ascii_case(k)) {
                columns.push(k.clone());
            }
        }
    }
    let rows = normalize_rows(name, &columns, &Value::Array(rows.to_vec()))?;
    Ok(ResultSet::new(name, columns, rows))
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
