pub mod cli;
pub mod config;
pub mod error;
pub mod plan;
pub mod report;
pub mod source;

pub use error::{XplanError, XplanResult};
pub use plan::{PlanRow, PlanTable, StatementText};
pub use report::{compose, display_cursor, Report};
