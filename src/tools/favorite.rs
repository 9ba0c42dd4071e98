use anyhow::Result;

use crate::server::MemoryServer;

impl MemoryServer {
    pub async fn do_set_favorite(&self, asset_id: &str, favorite: bool) -> Result<String> {
        let library = &self.store.library;
        if library.get_asset(asset_id)?.is_none() {
            return Ok(format!("No asset found with id: {}", asset_id));
        }

        let changed = library.set_favorite(asset_id, favorite)?;
        let state = if favorite { "favorite" } else { "not a favorite" };
        if changed {
            Ok(format!("Marked {} as {}.", asset_id, state))
        } else {
            Ok(format!("{} was already {}.", asset_id, state))
        }
    }
}
