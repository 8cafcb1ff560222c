//!
//! xplan row sources
//! -----------------
//! A row source answers the two fixed questions the report needs: the plan rows
//! for one (sql_id, child_number) and the statement text pieces for one sql_id.
//! Both come back as name-keyed `ResultSet`s; typing happens in `crate::plan`.
//!
//! - `SnapshotSource` reads a captured JSON document (offline rendering, tests).
//! - `PgSource` runs the configured query templates over the postgres wire protocol.

use crate::error::XplanResult;
use crate::plan::ResultSet;

pub mod pg;
pub mod snapshot;

pub use pg::{display_cursor_pg, PgSource};
pub use snapshot::SnapshotSource;

/// Data source for one report. Calls are issued sequentially: plan first, then text.
#[allow(async_fn_in_trait)]
pub trait RowSource {
    /// Short human-readable description for logs.
    fn describe(&self) -> String;

    /// Plan rows ordered by `(id, parent_id)`.
    async fn fetch_plan(&self, sql_id: &str, child_number: u32) -> XplanResult<ResultSet>;

    /// Statement text pieces ordered by piece number, in a `SQL_TEXT` column.
    async fn fetch_sql_text(&self, sql_id: &str, child_number: u32) -> XplanResult<ResultSet>;
}
