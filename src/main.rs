//! macrolog stdio server
//!
//! Configuration comes from the environment:
//! - `MACROLOG_DATABASE_PATH`: SQLite file, default `data/macrolog.db` in the project root
//! - `RUST_LOG`: log filter, default `macrolog=info`

use std::path::{Path, PathBuf};

use macrolog::build_info::BuildInfo;
use macrolog::db::{migrations, Database};
use macrolog::mcp::MacrologService;
use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

/// The project root when running from `target/<profile>/`, else the binary's directory
fn install_root() -> PathBuf {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."));

    exe_dir
        .ancestors()
        .find(|dir| dir.ends_with("target"))
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .unwrap_or(exe_dir)
}

fn database_path() -> PathBuf {
    match std::env::var_os("MACROLOG_DATABASE_PATH") {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        _ => install_root().join("data").join("macrolog.db"),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // stdout carries the protocol
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("macrolog=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let build = BuildInfo::current();
    tracing::info!(
        version = build.version,
        build = build.build_number,
        built_at = build.build_timestamp,
        "macrolog starting"
    );

    let db_path = database_path();
    let database = Database::open(&db_path)?;
    let schema_version = database.with_conn(|conn| {
        migrations::run_migrations(conn)?;
        migrations::get_schema_version(conn)
    })?;
    tracing::info!(path = %db_path.display(), schema_version, "database ready");

    let server = MacrologService::new(db_path, database)
        .serve((stdin(), stdout()))
        .await?;
    server.waiting().await?;

    Ok(())
}
