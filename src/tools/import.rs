use std::path::PathBuf;

use anyhow::Result;

use crate::server::MemoryServer;
use crate::store::import;

impl MemoryServer {
    pub async fn do_import_folder(&self, path: &str) -> Result<String> {
        let folder = PathBuf::from(path);
        let library = self.store.library.clone();
        let report = tokio::task::spawn_blocking(move || import::import_folder(&library, &folder))
            .await??;

        tracing::info!(
            "import from {} complete: {} new, {} skipped",
            path, report.imported, report.skipped
        );

        Ok(format!(
            "Imported {} new items ({} live photos), skipped {} already in the library.",
            report.imported, report.live_photos, report.skipped
        ))
    }
}
