use anyhow::Result;

use crate::server::MemoryServer;

impl MemoryServer {
    pub async fn do_refresh(&self, reason: Option<&str>) -> Result<String> {
        let engine = &self.store.engine;
        engine.invalidate();
        tracing::info!("memory cache refresh requested: {}", reason.unwrap_or("manual"));

        let epoch = engine.snapshot().await?;
        tracing::info!(
            generation = epoch.generation,
            assets = epoch.asset_count,
            earliest_year = epoch.earliest_year,
            "memory cache rebuilt"
        );

        if epoch.frequency.is_empty() {
            return Ok("Library re-read: no memories yet.".into());
        }
        let days = epoch.frequency.len();
        Ok(format!(
            "Library re-read: {} {} on {} distinct {} since {}.",
            epoch.asset_count,
            if epoch.asset_count == 1 { "item" } else { "items" },
            days,
            if days == 1 { "day" } else { "days" },
            epoch.earliest_year
        ))
    }
}
