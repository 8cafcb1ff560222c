//!
//! xplan plan data model
//! ---------------------
//! Result sets arrive from a row source as name-keyed columns of loosely typed
//! cells. This module turns them into the strongly typed `PlanTable` and
//! `StatementText` snapshots the report engine consumes.
//!
//! Missing values are explicit `Option`s; an empty string coming back from the
//! database is treated the same as NULL, matching how the plan views store
//! absent predicates and object names.

use std::fmt::{Display, Formatter};

use serde_json::Value;

use crate::error::{XplanError, XplanResult};

/// Column names of the plan result set, in the order the default query selects them.
pub const PLAN_COLUMNS: [&str; 16] = [
    "ID",
    "OPERATION",
    "DEPTH",
    "OPTIONS",
    "OBJECT_NAME",
    "CARDINALITY",
    "BYTES",
    "COST",
    "CPU_COST",
    "IO_COST",
    "ACCESS_PREDICATES",
    "FILTER_PREDICATES",
    "TIME",
    "PLAN_HASH_VALUE",
    "PARTITION_START",
    "PARTITION_STOP",
];

pub const SQL_TEXT_COLUMN: &str = "SQL_TEXT";

static NULL_CELL: Cell = Cell::Null;

/// A single value as delivered by a row source.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
}

impl Cell {
    pub fn from_json(v: &Value) -> Cell {
        match v {
            Value::Null => Cell::Null,
            Value::Bool(b) => Cell::Text(b.to_string()),
            Value::Number(n) => match (n.as_i64(), n.as_u64()) {
                (Some(i), _) => Cell::Int(i),
                // above i64::MAX: keep the digits exact
                (None, Some(u)) => Cell::Text(u.to_string()),
                _ => n.as_f64().map(Cell::Float).unwrap_or_else(|| Cell::Text(n.to_string())),
            },
            Value::String(s) => Cell::Text(s.clone()),
            other => Cell::Text(other.to_string()),
        }
    }

    /// Text-protocol value: everything is a string or NULL.
    pub fn from_text(v: Option<&str>) -> Cell {
        match v {
            Some(s) => Cell::Text(s.to_string()),
            None => Cell::Null,
        }
    }

    pub fn is_missing(&self) -> bool {
        match self {
            Cell::Null => true,
            Cell::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    pub fn as_text(&self) -> Option<String> {
        if self.is_missing() { None } else { Some(self.to_string()) }
    }

    /// Integers are read exactly; only fractional or float cells go through `f64`.
    pub fn as_u64(&self, column: &str) -> XplanResult<Option<u64>> {
        match self {
            Cell::Int(i) => {
                return u64::try_from(*i)
                    .map(Some)
                    .map_err(|_| XplanError::invalid_value(column.to_string(), i.to_string()));
            }
            Cell::Text(s) => {
                if let Ok(n) = s.trim().parse::<u64>() {
                    return Ok(Some(n));
                }
            }
            _ => {}
        }
        match self.as_f64(column)? {
            None => Ok(None),
            Some(f) if f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 => Ok(Some(f as u64)),
            Some(_) => Err(XplanError::invalid_value(column.to_string(), self.to_string())),
        }
    }

    pub fn as_f64(&self, column: &str) -> XplanResult<Option<f64>> {
        match self {
            Cell::Null => Ok(None),
            Cell::Int(i) => Ok(Some(*i as f64)),
            Cell::Float(f) => Ok(Some(*f)),
            Cell::Text(s) if s.trim().is_empty() => Ok(None),
            Cell::Text(s) => s
                .trim()
                .parse::<f64>()
                .map(Some)
                .map_err(|_| XplanError::invalid_value(column.to_string(), s.clone())),
        }
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Cell::Null => Ok(()),
            Cell::Int(i) => write!(f, "{}", i),
            Cell::Float(x) => f.write_str(&format_number(*x)),
            Cell::Text(s) => f.write_str(s),
        }
    }
}

/// Integral values print without a fractional part.
pub fn format_number(x: f64) -> String {
    if x.fract() == 0.0 && x.abs() < 1e15 {
        format!("{}", x as i64)
    } else {
        format!("{}", x)
    }
}

/// A result set keyed by column name. Column names are stored upper-cased.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    name: String,
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl ResultSet {
    pub fn new(name: impl Into<String>, columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let columns = columns.into_iter().map(|c| c.trim().to_ascii_uppercase()).collect();
        Self { name: name.into(), columns, rows }
    }

    pub fn name(&self) -> &str { &self.name }
    pub fn columns(&self) -> &[String] { &self.columns }
    pub fn len(&self) -> usize { self.rows.len() }
    pub fn is_empty(&self) -> bool { self.rows.is_empty() }

    /// Column extractor: one cell per row, in result-set order.
    /// Short rows read as NULL for the trailing columns.
    pub fn column(&self, name: &str) -> XplanResult<Vec<&Cell>> {
        let idx = self
            .columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(name))
            .ok_or_else(|| XplanError::missing_column(name.to_string(), self.name.clone()))?;
        Ok(self.rows.iter().map(|r| r.get(idx).unwrap_or(&NULL_CELL)).collect())
    }
}

/// One execution-plan node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanRow {
    pub id: u64,
    pub operation: String,
    pub options: Option<String>,
    pub depth: usize,
    pub object_name: Option<String>,
    pub cardinality: Option<u64>,
    pub bytes: Option<u64>,
    pub cost: Option<f64>,
    pub cpu_cost: Option<f64>,
    pub io_cost: Option<f64>,
    pub access_predicates: Option<String>,
    pub filter_predicates: Option<String>,
    /// Estimated elapsed seconds.
    pub time: Option<u64>,
    pub partition_start: Option<String>,
    pub partition_stop: Option<String>,
}

impl PlanRow {
    pub fn has_predicates(&self) -> bool {
        self.filter_predicates.is_some() || self.access_predicates.is_some()
    }

    pub fn has_partition(&self) -> bool {
        self.partition_start.is_some() || self.partition_stop.is_some()
    }
}

/// The flat, pre-ordered plan plus its hash value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanTable {
    pub rows: Vec<PlanRow>,
    pub plan_hash_value: Option<String>,
}

impl PlanTable {
    pub fn new(rows: Vec<PlanRow>, plan_hash_value: impl Into<String>) -> Self {
        Self { rows, plan_hash_value: Some(plan_hash_value.into()) }
    }

    pub fn len(&self) -> usize { self.rows.len() }
    pub fn is_empty(&self) -> bool { self.rows.is_empty() }

    pub fn has_partitions(&self) -> bool { self.rows.iter().any(PlanRow::has_partition) }
    pub fn has_predicates(&self) -> bool { self.rows.iter().any(PlanRow::has_predicates) }

    /// Build from the plan result set. Every column in `PLAN_COLUMNS` must be present,
    /// even when the result set has no rows.
    pub fn from_result_set(rs: &ResultSet) -> XplanResult<Self> {
        let ids = rs.column("ID")?;
        let operations = rs.column("OPERATION")?;
        let depths = rs.column("DEPTH")?;
        let options = rs.column("OPTIONS")?;
        let names = rs.column("OBJECT_NAME")?;
        let cards = rs.column("CARDINALITY")?;
        let bytes = rs.column("BYTES")?;
        let costs = rs.column("COST")?;
        let cpu_costs = rs.column("CPU_COST")?;
        let io_costs = rs.column("IO_COST")?;
        let access = rs.column("ACCESS_PREDICATES")?;
        let filter = rs.column("FILTER_PREDICATES")?;
        let times = rs.column("TIME")?;
        let hashes = rs.column("PLAN_HASH_VALUE")?;
        let pstart = rs.column("PARTITION_START")?;
        let pstop = rs.column("PARTITION_STOP")?;

        let mut rows = Vec::with_capacity(rs.len());
        for i in 0..rs.len() {
            let id = ids[i]
                .as_u64("ID")?
                .ok_or_else(|| XplanError::invalid_value("ID", "NULL"))?;
            rows.push(PlanRow {
                id,
                operation: operations[i].as_text().unwrap_or_default(),
                options: options[i].as_text(),
                depth: depths[i].as_u64("DEPTH")?.unwrap_or(0) as usize,
                object_name: names[i].as_text(),
                cardinality: cards[i].as_u64("CARDINALITY")?,
                bytes: bytes[i].as_u64("BYTES")?,
                cost: costs[i].as_f64("COST")?,
                cpu_cost: cpu_costs[i].as_f64("CPU_COST")?,
                io_cost: io_costs[i].as_f64("IO_COST")?,
                access_predicates: access[i].as_text(),
                filter_predicates: filter[i].as_text(),
                time: times[i].as_u64("TIME")?,
                partition_start: pstart[i].as_text(),
                partition_stop: pstop[i].as_text(),
            });
        }
        let plan_hash_value = hashes.iter().find_map(|c| c.as_text());
        Ok(Self { rows, plan_hash_value })
    }
}

/// Statement text pieces in piece order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatementText {
    pub pieces: Vec<String>,
}

impl StatementText {
    pub fn new<I, S>(pieces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { pieces: pieces.into_iter().map(Into::into).collect() }
    }

    /// A statement whose text has aged out comes back with no rows (and possibly
    /// no columns); that is an empty text, not a schema problem.
    pub fn from_result_set(rs: &ResultSet) -> XplanResult<Self> {
        if rs.is_empty() {
            return Ok(Self::default());
        }
        let pieces = rs.column(SQL_TEXT_COLUMN)?.into_iter().map(|c| c.to_string()).collect();
        Ok(Self { pieces })
    }
}

#[cfg(test)]
#[path = "plan_tests.rs"]
mod tests;
