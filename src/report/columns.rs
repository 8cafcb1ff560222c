//! Per-column formatters for the plan table.
//!
//! Each formatter maps a field of every `PlanRow` to a display string, prepends
//! the column header and runs the result through the alignment engine. All of
//! them return `1 + rows.len()` cells, including for an empty plan.

use crate::plan::{format_number, PlanRow, PlanTable};

use super::align::{align, with_header, FormattedColumn, Justify};

pub const ID_HEADER: &str = "ID";
pub const OPERATION_HEADER: &str = "OPERATION";
pub const NAME_HEADER: &str = "NAME";
pub const ROWS_HEADER: &str = "ROWS";
pub const BYTES_HEADER: &str = "BYTES";
pub const COST_HEADER: &str = "COST (%CPU)";
pub const TIME_HEADER: &str = "TIME";
pub const PSTART_HEADER: &str = "PSTART";
pub const PSTOP_HEADER: &str = "PSTOP";

/// Values below this render unabbreviated in ROWS and BYTES.
pub const ABBREVIATE_FROM: u64 = 10_000;
pub const DECIMAL_SCALE: u64 = 1000;
pub const BINARY_SCALE: u64 = 1024;

/// ID column. Rows carrying a predicate get a leading `*`; the asterisk slot is
/// reserved on every row so ids stay right-aligned.
pub fn format_id(rows: &[PlanRow]) -> FormattedColumn {
    let digits = rows.iter().map(|r| r.id).max().map(|m| m.to_string().len()).unwrap_or(0);
    let body: Vec<String> = rows
        .iter()
        .map(|r| {
            if r.has_predicates() {
                format!("*{:>w$} ", r.id, w = digits + 2)
            } else {
                format!("{:>w$} ", r.id, w = digits + 3)
            }
        })
        .collect();
    let mut out = Vec::with_capacity(body.len() + 1);
    out.push(format!("{:<w$}", " ID", w = digits + 4));
    out.extend(body);
    out
}

/// Operation plus options, indented by depth.
pub fn format_operation(rows: &[PlanRow]) -> FormattedColumn {
    let body = rows
        .iter()
        .map(|r| {
            let mut s = " ".repeat(r.depth);
            s.push_str(&r.operation);
            if let Some(opt) = r.options.as_deref().filter(|o| !o.is_empty()) {
                s.push(' ');
                s.push_str(opt);
            }
            s
        })
        .collect();
    align(&with_header(OPERATION_HEADER, body), Justify::Left)
}

pub fn format_name(rows: &[PlanRow]) -> FormattedColumn {
    let body = rows.iter().map(|r| r.object_name.clone().unwrap_or_default()).collect();
    align(&with_header(NAME_HEADER, body), Justify::Left)
}

pub fn format_rows(rows: &[PlanRow]) -> FormattedColumn {
    let body = abbreviate_column(rows.iter().map(|r| r.cardinality), DECIMAL_SCALE);
    align(&with_header(ROWS_HEADER, body), Justify::Right)
}

pub fn format_bytes(rows: &[PlanRow]) -> FormattedColumn {
    let body = abbreviate_column(rows.iter().map(|r| r.bytes), BINARY_SCALE);
    align(&with_header(BYTES_HEADER, body), Justify::Right)
}

/// Abbreviate one value by magnitude, or `None` when it stays a plain integer.
pub fn abbreviate(v: u64, scale: u64) -> Option<String> {
    if v < ABBREVIATE_FROM {
        return None;
    }
    let giga = scale * scale * scale;
    let mega = scale * scale;
    Some(if v >= giga {
        format!("{:.1}G", v as f64 / giga as f64)
    } else if v >= mega {
        format!("{}M", v / mega)
    } else {
        format!("{}K", v / scale)
    })
}

/// Once any value in the column is abbreviated, plain values get one trailing
/// space so their digits line up with the digits of the suffixed entries.
pub fn abbreviate_column<I>(values: I, scale: u64) -> Vec<String>
where
    I: IntoIterator<Item = Option<u64>>,
{
    let cells: Vec<(String, bool)> = values
        .into_iter()
        .map(|v| match v {
            None => (String::new(), false),
            Some(n) => match abbreviate(n, scale) {
                Some(s) => (s, false),
                None => (n.to_string(), true),
            },
        })
        .collect();
    let any_abbreviated = cells.iter().any(|(s, plain)| !plain && !s.is_empty());
    cells
        .into_iter()
        .map(|(s, plain)| if plain && any_abbreviated { s + " " } else { s })
        .collect()
}

/// Share of the cost not spent on I/O, rounded to a whole percent.
pub fn cpu_percent(cost: Option<f64>, io_cost: Option<f64>) -> i64 {
    match (cost, io_cost) {
        (Some(c), Some(io)) if c != 0.0 => ((c - io) / c * 100.0).round() as i64,
        _ => 0,
    }
}

/// `<cost> (<pct>)` with the parenthesised part right-aligned across rows.
pub fn format_cost(rows: &[PlanRow]) -> FormattedColumn {
    let parts: Vec<(String, String)> = rows
        .iter()
        .map(|r| {
            let cost = format_number(r.cost.unwrap_or(0.0));
            (cost, format!("({})", cpu_percent(r.cost, r.io_cost)))
        })
        .collect();
    let pct_w = parts.iter().map(|(_, p)| p.len()).max().unwrap_or(0);
    let body = parts.into_iter().map(|(c, p)| format!("{} {:>w$}", c, p, w = pct_w)).collect();
    align(&with_header(COST_HEADER, body), Justify::Right)
}

/// Seconds as `HH:MM:SS`; hours are not wrapped at 24.
pub fn format_hms(secs: u64) -> String {
    format!("{:02}:{:02}:{:02}", secs / 3600, secs % 3600 / 60, secs % 60)
}

pub fn format_time(rows: &[PlanRow]) -> FormattedColumn {
    let body = rows.iter().map(|r| r.time.map(format_hms).unwrap_or_default()).collect();
    align(&with_header(TIME_HEADER, body), Justify::Left)
}

/// PSTART and PSTOP, or `None` when no row is partitioned.
pub fn format_partitions(rows: &[PlanRow]) -> Option<(FormattedColumn, FormattedColumn)> {
    if !rows.iter().any(PlanRow::has_partition) {
        return None;
    }
    let start = rows.iter().map(|r| r.partition_start.clone().unwrap_or_default()).collect();
    let stop = rows.iter().map(|r| r.partition_stop.clone().unwrap_or_default()).collect();
    Some((
        align(&with_header(PSTART_HEADER, start), Justify::Right),
        align(&with_header(PSTOP_HEADER, stop), Justify::Right),
    ))
}

/// All table columns in display order.
pub fn plan_columns(plan: &PlanTable) -> Vec<FormattedColumn> {
    let rows = &plan.rows;
    let mut cols = vec![
        format_id(rows),
        format_operation(rows),
        format_name(rows),
        format_rows(rows),
        format_bytes(rows),
        format_cost(rows),
        format_time(rows),
    ];
    if let Some((start, stop)) = format_partitions(rows) {
        cols.push(start);
        cols.push(stop);
    }
    cols
}

#[cfg(test)]
#[path = "columns_tests.rs"]
mod tests;
