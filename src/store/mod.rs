pub mod import;
#[cfg(test)]
pub mod memory;
pub mod provider;
pub mod sqlite;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::RwLock;

use crate::aggregate::MemoryEngine;
use crate::calendar::Zone;
use crate::settings::Settings;

pub struct Store {
    pub path: PathBuf,
    pub library: Arc<sqlite::SqliteLibrary>,
    pub engine: MemoryEngine,
    pub settings: RwLock<Settings>,
}

impl Store {
    pub fn open(path: &Path, zone: Zone) -> Result<Self> {
        std::fs::create_dir_all(path)?;

        let library = Arc::new(sqlite::SqliteLibrary::open(path)?);
        tracing::info!("photo library opened ({} assets)", library.asset_count()?);

        // Bad settings shouldn't keep the library offline
        let settings = match Settings::load(path) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!("settings unreadable, using defaults: {}", e);
                Settings::default()
            }
        };

        let engine = MemoryEngine::new(library.clone(), zone);

        Ok(Self {
            path: path.to_path_buf(),
            library,
            engine,
            settings: RwLock::new(settings),
        })
    }
}
