//! Alignment engine: pads a header-first column of strings to one width.
//!
//! With `w` the widest value (header included) every cell comes out exactly
//! `w + 2` characters: one space margin on each side. The header is always
//! left-justified; body cells follow the column's `Justify`.

/// Display strings for one column; index 0 is the header.
pub type FormattedColumn = Vec<String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Justify {
    Left,
    Right,
}

/// Prepend `header` to `body`, producing a new column.
pub fn with_header(header: &str, body: Vec<String>) -> Vec<String> {
    let mut out = Vec::with_capacity(body.len() + 1);
    out.push(header.to_string());
    out.extend(body);
    out
}

pub fn display_width(s: &str) -> usize { s.chars().count() }

pub fn align(values: &[String], justify: Justify) -> FormattedColumn {
    let Some((header, body)) = values.split_first() else {
        return Vec::new();
    };
    let w = values.iter().map(|v| display_width(v)).max().unwrap_or(0);
    let mut out = Vec::with_capacity(values.len());
    out.push(format!(" {:<w$} ", header, w = w));
    for v in body {
        out.push(match justify {
            Justify::Right => format!(" {:>w$} ", v, w = w),
            Justify::Left => format!(" {:<w$} ", v, w = w),
        });
    }
    out
}

#[cfg(test)]
#[path = "align_tests.rs"]
mod tests;
