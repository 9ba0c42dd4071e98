use anyhow::Result;

use crate::server::MemoryServer;

impl MemoryServer {
    pub async fn do_remove_asset(&self, asset_id: &str) -> Result<String> {
        if self.store.library.remove_asset(asset_id)? {
            tracing::info!("removed asset {} from the library", asset_id);
            Ok(format!("Removed {} from the library.", asset_id))
        } else {
            Ok(format!("No asset found with id: {}", asset_id))
        }
    }
}
