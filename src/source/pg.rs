use tokio::task::JoinHandle;
use tokio_postgres::{Client, Config, NoTls, SimpleQueryMessage};
use tracing::{debug, info, warn};

use crate::config::QueryTemplates;
use crate::error::{XplanError, XplanResult};
use crate::plan::{Cell, ResultSet};
use crate::report::{display_cursor, Report};

use super::RowSource;

/// A postgres-wire session running the configured query templates.
///
/// Values come back over the simple-query (text) protocol, so every cell is
/// `Cell::Text` or `Cell::Null`; numeric parsing happens when the plan is typed.
pub struct PgSource {
    client: Client,
    conn: JoinHandle<()>,
    templates: QueryTemplates,
    desc: String,
}

impl PgSource {
    pub async fn connect(dsn: &str, templates: QueryTemplates) -> XplanResult<Self> {
        let cfg: Config = dsn
            .parse()
            .map_err(|e: tokio_postgres::Error| XplanError::Connection(format!("invalid postgres dsn: {}", e)))?;
        let (client, conn) = cfg
            .connect(NoTls)
            .await
            .map_err(|e| XplanError::Connection(e.to_string()))?;
        // drive the connection in background until the client is dropped
        let conn = tokio::spawn(async move {
            if let Err(e) = conn.await {
                warn!(target: "xplan::source", "postgres connection ended with error: {}", e);
            }
        });
        let desc = describe_config(&cfg);
        info!(target: "xplan::source", "connected to {}", desc);
        Ok(Self { client, conn, templates, desc })
    }

    async fn run(&self, name: &str, sql: &str) -> XplanResult<ResultSet> {
        debug!(target: "xplan::source", "{} query: {}", name, sql);
        let msgs = self.client.simple_query(sql).await?;
        let mut cols: Vec<String> = Vec::new();
        let mut rows: Vec<Vec<Cell>> = Vec::new();
        for m in msgs {
            match m {
                // Sent even for zero-row results, so the schema is known without data
                SimpleQueryMessage::RowDescription(desc) => {
                    cols = desc.iter().map(|c| c.name().to_string()).collect();
                }
                SimpleQueryMessage::Row(r) => {
                    if cols.is_empty() {
                        cols = r.columns().iter().map(|c| c.name().to_string()).collect();
                    }
                    rows.push((0..r.len()).map(|i| Cell::from_text(r.get(i))).collect());
                }
                _ => {}
            }
        }
        debug!(target: "xplan::source", "{} query returned {} row(s)", name, rows.len());
        Ok(ResultSet::new(name, cols, rows))
    }

    /// Release the connection and wait for its driver task to finish.
    pub async fn close(self) {
        drop(self.client);
        if let Err(e) = self.conn.await {
            warn!(target: "xplan::source", "connection task failed: {}", e);
        }
        debug!(target: "xplan::source", "released {}", self.desc);
    }
}

impl RowSource for PgSource {
    fn describe(&self) -> String { format!("pg:{}", self.desc) }

    async fn fetch_plan(&self, sql_id: &str, child_number: u32) -> XplanResult<ResultSet> {
        self.run("plan", &self.templates.bind_plan(sql_id, child_number)).await
    }

    async fn fetch_sql_text(&self, sql_id: &str, child_number: u32) -> XplanResult<ResultSet> {
        self.run("sql_text", &self.templates.bind_text(sql_id, child_number)).await
    }
}

/// Connect, render, and release the connection whether or not rendering succeeded.
pub async fn display_cursor_pg(
    dsn: &str,
    templates: QueryTemplates,
    sql_id: &str,
    child_number: u32,
) -> XplanResult<Report> {
    let source = PgSource::connect(dsn, templates).await?;
    let result = display_cursor(&source, sql_id, child_number).await;
    source.close().await;
    result
}

// host:port/dbname without credentials
fn describe_config(cfg: &Config) -> String {
    let host = cfg
        .get_hosts()
        .first()
        .map(|h| match h {
            tokio_postgres::config::Host::Tcp(s) => s.clone(),
            #[cfg(unix)]
            tokio_postgres::config::Host::Unix(p) => p.display().to_string(),
        })
        .unwrap_or_default();
    let port = cfg.get_ports().first().copied().unwrap_or(5432);
    format!("{}:{}/{}", host, port, cfg.get_dbname().unwrap_or(""))
}

#[cfg(test)]
#[path = "pg_tests.rs"]
mod tests;
