use anyhow::Result;

use crate::server::{MemoryServer, SettingsRequest};

impl MemoryServer {
    pub async fn do_notification_settings(&self, req: SettingsRequest) -> Result<String> {
        let mut settings = self.store.settings.write().await;

        let mut updated = settings.clone();
        if let Some(enabled) = req.enabled {
            updated.notifications_enabled = enabled;
        }
        if let Some(hour) = req.hour {
            updated.notify_hour = hour;
        }
        if let Some(minute) = req.minute {
            updated.notify_minute = minute;
        }
        if let Some(favorites_only) = req.favorites_only {
            updated.favorites_only = favorites_only;
        }

        if updated != *settings {
            updated.save(&self.store.path)?;
            *settings = updated;
        }

        Ok(format!(
            "Reminders {} at {:02}:{:02}, up to {} scheduled. On this day shows {}.",
            if settings.notifications_enabled { "on" } else { "off" },
            settings.notify_hour,
            settings.notify_minute,
            settings.max_notifications,
            if settings.favorites_only { "favorites only" } else { "everything" },
        ))
    }
}
