//!
//! xplan CLI binary
//! ----------------
//! Renders the display-cursor report for one cursor (sql_id + child number)
//! from a postgres-wire data source or a captured JSON snapshot.

use std::env;
use std::fs;

use anyhow::{Context, Result};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use xplan::cli::{parse_args, usage, CliArgs, CliCommand};
use xplan::config::{QueryTemplates, SourceKind, ENV_DSN};
use xplan::error::XplanResult;
use xplan::report::{display_cursor, Report};
use xplan::source::{display_cursor_pg, SnapshotSource};

fn main() -> Result<()> {
    // Logs go to stderr so they never interleave with the report on stdout
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let mut args: Vec<String> = env::args().collect();
    let program = if args.is_empty() { "xplan".to_string() } else { args.remove(0) };

    let cli = match parse_args(&args) {
        Ok(CliCommand::Run(a)) => a,
        Ok(CliCommand::Help) => {
            println!("{}", usage(&program));
            return Ok(());
        }
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("{}", usage(&program));
            std::process::exit(2);
        }
    };

    let dsn = match cli.dsn.clone().or_else(|| env::var(ENV_DSN).ok()).filter(|s| !s.is_empty()) {
        Some(d) => d,
        None => {
            eprintln!("--dsn is required (or set {})", ENV_DSN);
            eprintln!("{}", usage(&program));
            std::process::exit(2);
        }
    };

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build Tokio runtime")?;

    match rt.block_on(render(&dsn, &cli)) {
        Ok(report) => emit(&report, &cli),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

async fn render(dsn: &str, cli: &CliArgs) -> XplanResult<Report> {
    match SourceKind::from_dsn(dsn)? {
        SourceKind::Postgres(url) => {
            let templates = QueryTemplates::resolve(cli.queries.as_deref())?;
            display_cursor_pg(&url, templates, &cli.sql_id, cli.child_number).await
        }
        SourceKind::Snapshot(path) => {
            let source = SnapshotSource::open(&path)?;
            display_cursor(&source, &cli.sql_id, cli.child_number).await
        }
    }
}

fn emit(report: &Report, cli: &CliArgs) -> Result<()> {
    if cli.print {
        return report.print().context("failed to write report to stdout");
    }
    match &cli.output {
        Some(path) => {
            fs::write(path, format!("{}\n", report))
                .with_context(|| format!("failed to write report to '{}'", path.display()))?;
            debug!(target: "xplan", "report written to '{}' ({} lines)", path.display(), report.lines().len());
        }
        None => println!("{}", report),
    }
    Ok(())
}
