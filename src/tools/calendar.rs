use anyhow::Result;
use chrono::Datelike;

use crate::server::MemoryServer;
use crate::types::CanonicalDayKey;

impl MemoryServer {
    pub async fn do_memory_calendar(&self, month: Option<u32>, day: Option<u32>) -> Result<String> {
        if let Some(d) = day {
            let m = month.ok_or_else(|| anyhow::anyhow!("day needs a month"))?;
            let key = CanonicalDayKey::new(m, d)?;
            let count = self.store.engine.frequency_map().await?.get(&key);
            return Ok(format!(
                "{}: {} {} across all years.",
                key,
                count,
                if count == 1 { "memory" } else { "memories" }
            ));
        }

        if let Some(m) = month {
            if !(1..=12).contains(&m) {
                anyhow::bail!("month must be 1-12, got {}", m);
            }
        }

        let entries: Vec<_> = self
            .store
            .engine
            .picker_entries()
            .await?
            .into_iter()
            .filter(|e| month.map_or(true, |m| e.date.month() == m))
            .collect();

        if entries.is_empty() {
            return Ok("No memories in the library yet.".into());
        }

        let lines: Vec<String> = entries
            .iter()
            .map(|e| format!("{}: {}", e.date.format("%b %d"), e.count))
            .collect();
        Ok(format!(
            "{} days with memories:\n{}",
            entries.len(),
            lines.join("\n")
        ))
    }
}
