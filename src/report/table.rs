//! Table assembler: turns aligned columns into the bordered plan table.

use tracing::debug;

use crate::error::{XplanError, XplanResult};

use super::align::{display_width, FormattedColumn};

/// Title line, blank, border, header, border, one line per row, border.
/// Fails instead of emitting a box whose bars would not line up.
pub fn assemble(columns: &[FormattedColumn], plan_hash_value: &str) -> XplanResult<Vec<String>> {
    let height = match columns.first() {
        Some(c) => c.len(),
        None => return Err(XplanError::formatting("plan table has no columns")),
    };
    if height == 0 {
        return Err(XplanError::formatting("column 0 has no header"));
    }
    if let Some((i, c)) = columns.iter().enumerate().find(|(_, c)| c.len() != height) {
        return Err(XplanError::formatting(format!(
            "column {} has {} cells, expected {}",
            i,
            c.len(),
            height
        )));
    }

    let width: usize = columns.iter().map(|c| display_width(&c[0])).sum::<usize>() + columns.len() + 1;
    let border = "-".repeat(width);
    debug!(target: "xplan::report", "assembling plan table: columns={} rows={} width={}", columns.len(), height - 1, width);

    let mut lines = Vec::with_capacity(height + 6);
    lines.push(format!("Plan hash value: {}", plan_hash_value));
    lines.push(String::new());
    lines.push(border.clone());
    for r in 0..height {
        let cells: Vec<&str> = columns.iter().map(|c| c[r].as_str()).collect();
        let line = format!("|{}|", cells.join("|"));
        if display_width(&line) != width {
            return Err(XplanError::formatting(format!(
                "line {} is {} wide, border is {}",
                r,
                display_width(&line),
                width
            )));
        }
        lines.push(line);
        if r == 0 {
            lines.push(border.clone());
        }
    }
    lines.push(border);
    Ok(lines)
}

#[cfg(test)]
#[path = "table_tests.rs"]
mod tests;
