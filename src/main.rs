mod aggregate;
mod calendar;
mod error;
mod server;
mod settings;
mod store;
mod tools;
mod types;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use rmcp::ServiceExt;
use tracing::info;

use crate::calendar::Zone;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("photo_memories=info".parse()?)
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if let Some(pos) = args.iter().position(|a| a == "--import") {
        let folder = args
            .get(pos + 1)
            .ok_or_else(|| anyhow::anyhow!("--import needs a folder path"))?;
        return run_import(&resolve_store_path(), resolve_zone(), folder).await;
    }

    run_mcp_server().await
}

async fn run_mcp_server() -> Result<()> {
    let store = store::Store::open(&resolve_store_path(), resolve_zone())?;
    let server = server::MemoryServer {
        store: Arc::new(store),
    };

    let transport = rmcp::transport::io::stdio();
    info!("starting photo-memories MCP server (stdio)");

    let service = server.serve(transport).await
        .map_err(|e| anyhow::anyhow!("MCP server failed: {}", e))?;

    let _ = service.waiting().await;
    Ok(())
}

async fn run_import(store_path: &Path, zone: Zone, folder: &str) -> Result<()> {
    let store = store::Store::open(store_path, zone)?;
    let server = server::MemoryServer {
        store: Arc::new(store),
    };

    let msg = server
        .do_import_folder(folder)
        .await
        .map_err(|e| e.context(format!("import of {} failed", folder)))?;
    eprintln!("{}", msg);
    Ok(())
}

fn resolve_store_path() -> PathBuf {
    PathBuf::from(
        std::env::var("MEMORIES_STORE_PATH").unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            format!("{}/.photo-memories/store", home)
        })
    )
}

fn resolve_zone() -> Zone {
    match std::env::var("MEMORIES_UTC_OFFSET") {
        Ok(raw) => Zone::parse_offset(&raw).unwrap_or_else(|| {
            tracing::warn!("ignoring unparseable MEMORIES_UTC_OFFSET '{}', using local time", raw);
            Zone::Local
        }),
        Err(_) => Zone::Local,
    }
}
