//! Predicate information footnotes, keyed by operation id.

use std::fmt::{Display, Formatter};

use crate::plan::PlanRow;

pub const PREDICATE_TITLE: &str = "Predicate Information (identified by operation id):";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredicateKind {
    Filter,
    Access,
}

impl Display for PredicateKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            PredicateKind::Filter => "filter",
            PredicateKind::Access => "access",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Footnote<'a> {
    pub id: u64,
    pub kind: PredicateKind,
    pub text: &'a str,
}

impl Display for Footnote<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "   {} - {}({})", self.id, self.kind, self.text)
    }
}

/// Row order; within a row the filter predicate comes before the access predicate.
pub fn footnotes(rows: &[PlanRow]) -> Vec<Footnote<'_>> {
    let mut out = Vec::new();
    for r in rows {
        if let Some(text) = r.filter_predicates.as_deref() {
            out.push(Footnote { id: r.id, kind: PredicateKind::Filter, text });
        }
        if let Some(text) = r.access_predicates.as_deref() {
            out.push(Footnote { id: r.id, kind: PredicateKind::Access, text });
        }
    }
    out
}

/// Title, underline, blank line and one line per footnote; nothing at all when
/// the plan has no predicates.
pub fn predicate_section(rows: &[PlanRow]) -> Vec<String> {
    let notes = footnotes(rows);
    if notes.is_empty() {
        return Vec::new();
    }
    let mut lines = Vec::with_capacity(notes.len() + 3);
    lines.push(PREDICATE_TITLE.to_string());
    lines.push("-".repeat(PREDICATE_TITLE.len()));
    lines.push(String::new());
    lines.extend(notes.iter().map(ToString::to_string));
    lines
}

#[cfg(test)]
#[path = "predicates_tests.rs"]
mod tests;
