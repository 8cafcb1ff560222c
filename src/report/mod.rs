//!
//! xplan report engine
//! -------------------
//! Pure, in-memory formatting of a display-cursor style report:
//!
//! ```text
//! SQL_ID  <sql_id>, child number <n>
//! ----------------------------------
//! <statement text pieces>
//!
//! Plan hash value: <hash>
//!
//! <bordered plan table>
//!
//! <predicate information, when any row has predicates>
//! ```
//!
//! `display_cursor` wires a `RowSource` to the engine; everything below it is
//! I/O free and returns new values instead of mutating shared state.

use std::fmt::{Display, Formatter};
use std::io::{self, Write};

use tracing::{debug, info};

use crate::error::{XplanError, XplanResult};
use crate::plan::{PlanTable, StatementText};
use crate::source::RowSource;

pub mod align;
pub mod columns;
pub mod predicates;
pub mod table;

pub use align::{align, FormattedColumn, Justify};
pub use columns::plan_columns;
pub use predicates::predicate_section;
pub use table::assemble;

/// The finished report: an immutable sequence of lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    lines: Vec<String>,
}

impl Report {
    pub fn lines(&self) -> &[String] { &self.lines }
    pub fn into_lines(self) -> Vec<String> { self.lines }

    /// Write the report line by line to stdout.
    pub fn print(&self) -> io::Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.write_lines(&mut out)
    }

    pub fn write_lines<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for l in &self.lines {
            writeln!(out, "{}", l)?;
        }
        out.flush()
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.lines.join("\n"))
    }
}

pub fn statement_title(sql_id: &str, child_number: u32) -> String {
    format!("SQL_ID  {}, child number {}", sql_id, child_number)
}

/// Statement block, blank, plan table, blank, predicate section.
/// An empty plan is reported as `EmptyResult` rather than rendered.
pub fn compose(sql_id: &str, child_number: u32, text: &StatementText, plan: &PlanTable) -> XplanResult<Report> {
    if plan.is_empty() {
        return Err(XplanError::EmptyResult { sql_id: sql_id.to_string(), child_number });
    }
    let columns = plan_columns(plan);
    let table = assemble(&columns, plan.plan_hash_value.as_deref().unwrap_or(""))?;
    let predicates = predicate_section(&plan.rows);
    debug!(
        target: "xplan::report",
        "composed columns={} partitioned={} predicate_lines={}",
        columns.len(),
        plan.has_partitions(),
        predicates.len()
    );

    let title = statement_title(sql_id, child_number);
    let mut lines = Vec::with_capacity(text.pieces.len() + table.len() + predicates.len() + 4);
    let underline = "-".repeat(title.chars().count());
    lines.push(title);
    lines.push(underline);
    lines.extend(text.pieces.iter().cloned());
    lines.push(String::new());
    lines.extend(table);
    lines.push(String::new());
    lines.extend(predicates);
    Ok(Report { lines })
}

/// Fetch and type the plan, then fetch the statement text, then render.
pub async fn display_cursor<S: RowSource>(source: &S, sql_id: &str, child_number: u32) -> XplanResult<Report> {
    info!(target: "xplan::report", "display_cursor sql_id={} child_number={} source={}", sql_id, child_number, source.describe());
    let plan_rs = source.fetch_plan(sql_id, child_number).await?;
    // Schema is checked before emptiness so an incompatible source never reads as "no plan"
    let plan = PlanTable::from_result_set(&plan_rs)?;
    if plan.is_empty() {
        return Err(XplanError::EmptyResult { sql_id: sql_id.to_string(), child_number });
    }
    let text_rs = source.fetch_sql_text(sql_id, child_number).await?;
    let text = StatementText::from_result_set(&text_rs)?;
    debug!(target: "xplan::report", "plan rows={} text pieces={}", plan.len(), text.pieces.len());
    compose(sql_id, child_number, &text, &plan)
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
