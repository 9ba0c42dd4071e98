use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::aggregate::notifications::DEFAULT_NOTIFICATION_LIMIT;
use crate::calendar::notification_time;

/// User preferences, persisted next to the catalog as `settings.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub notifications_enabled: bool,
    pub notify_hour: u32,
    pub notify_minute: u32,
    pub max_notifications: usize,
    pub favorites_only: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            notifications_enabled: true,
            notify_hour: 9,
            notify_minute: 0,
            max_notifications: DEFAULT_NOTIFICATION_LIMIT,
            favorites_only: false,
        }
    }
}

impl Settings {
    pub fn load(store_path: &Path) -> Result<Self> {
        let file = store_path.join("settings.yaml");
        if !file.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(&file)?;
        let settings: Settings = serde_yaml::from_str(&raw)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn save(&self, store_path: &Path) -> Result<()> {
        self.validate()?;
        std::fs::create_dir_all(store_path)?;
        std::fs::write(store_path.join("settings.yaml"), serde_yaml::to_string(self)?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        notification_time(self.notify_hour, self.notify_minute)?;
        if self.max_notifications == 0 || self.max_notifications > DEFAULT_NOTIFICATION_LIMIT {
            anyhow::bail!(
                "max_notifications must be between 1 and {}, got {}",
                DEFAULT_NOTIFICATION_LIMIT,
                self.max_notifications
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Settings::load(dir.path()).unwrap(), Settings::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            notify_hour: 20,
            notify_minute: 15,
            favorites_only: true,
            ..Default::default()
        };
        settings.save(dir.path()).unwrap();
        assert_eq!(Settings::load(dir.path()).unwrap(), settings);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("settings.yaml"), "notify_hour: 7\n").unwrap();
        let settings = Settings::load(dir.path()).unwrap();
        assert_eq!(settings.notify_hour, 7);
        assert_eq!(settings.max_notifications, 64);
        assert!(settings.notifications_enabled);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let late = Settings { notify_hour: 24, ..Default::default() };
        assert!(late.validate().is_err());
        let none = Settings { max_notifications: 0, ..Default::default() };
        assert!(none.validate().is_err());
        let many = Settings { max_notifications: 65, ..Default::default() };
        assert!(many.validate().is_err());

        let dir = tempfile::tempdir().unwrap();
        assert!(late.save(dir.path()).is_err());
        assert!(!dir.path().join("settings.yaml").exists());
    }
}
