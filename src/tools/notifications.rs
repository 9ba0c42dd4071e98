use anyhow::Result;

use crate::aggregate::notifications::DEFAULT_NOTIFICATION_LIMIT;
use crate::server::MemoryServer;

impl MemoryServer {
    pub async fn do_upcoming_notifications(&self, limit: Option<usize>) -> Result<String> {
        let settings = self.store.settings.read().await.clone();
        if !settings.notifications_enabled {
            return Ok("Memory reminders are turned off.".into());
        }

        let max = limit
            .unwrap_or(settings.max_notifications)
            .clamp(1, DEFAULT_NOTIFICATION_LIMIT);
        let engine = &self.store.engine;
        let scheduled = engine
            .upcoming_notifications(
                engine.zone().now(),
                settings.notify_hour,
                settings.notify_minute,
                max,
            )
            .await?;

        if scheduled.is_empty() {
            return Ok("Nothing to remind about yet.".into());
        }

        let lines: Vec<String> = scheduled
            .iter()
            .map(|n| format!("{}  {}", n.local_time.format("%Y-%m-%d %H:%M"), n.body))
            .collect();
        Ok(format!(
            "Next {} reminders:\n{}",
            scheduled.len(),
            lines.join("\n")
        ))
    }
}
