use std::sync::Arc;

use rmcp::{
    ServerHandler,
    model::{ServerCapabilities, ServerInfo},
    tool,
    schemars,
};

use crate::store::Store;

#[derive(Clone)]
pub struct MemoryServer {
    pub store: Arc<Store>,
}

// MCP request types

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct OnThisDayRequest {
    #[schemars(description = "Day to look back on, YYYY-MM-DD (optional, defaults to today)")]
    pub date: Option<String>,
    #[schemars(description = "Return the year groups as JSON instead of text (optional)")]
    pub json: Option<bool>,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct CalendarRequest {
    #[schemars(description = "Only list days from this month, 1-12 (optional)")]
    pub month: Option<u32>,
    #[schemars(description = "With month: count memories on this single day, 1-31 (optional)")]
    pub day: Option<u32>,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct NotificationsRequest {
    #[schemars(description = "How many upcoming reminders to list, at most 64 (optional)")]
    pub limit: Option<usize>,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct ImportRequest {
    #[schemars(description = "Folder to scan recursively for photos and videos")]
    pub path: String,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct FavoriteRequest {
    #[schemars(description = "Asset ID (from on_this_day results)")]
    pub asset_id: String,
    #[schemars(description = "true to mark as favorite, false to unmark")]
    pub favorite: bool,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct RemoveRequest {
    #[schemars(description = "Asset ID to drop from the library")]
    pub asset_id: String,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct RefreshRequest {
    #[schemars(description = "Optional: why the library is being re-read")]
    pub reason: Option<String>,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct SettingsRequest {
    #[schemars(description = "Turn daily memory reminders on or off (optional)")]
    pub enabled: Option<bool>,
    #[schemars(description = "Reminder hour, 0-23 (optional)")]
    pub hour: Option<u32>,
    #[schemars(description = "Reminder minute, 0-59 (optional)")]
    pub minute: Option<u32>,
    #[schemars(description = "Only show favorites in on_this_day (optional)")]
    pub favorites_only: Option<bool>,
}

#[tool(tool_box)]
impl MemoryServer {
    #[tool(description = "Show photos and videos taken on this day in previous years, grouped by year. Pass a date to look at another day.")]
    async fn on_this_day(
        &self, #[tool(aggr)] req: OnThisDayRequest,
    ) -> String {
        match self.do_on_this_day(req.date.as_deref(), req.json.unwrap_or(false)).await {
            Ok(msg) => msg,
            Err(e) => format!("Error: {}", e),
        }
    }

    #[tool(description = "List every calendar day that has memories, with how many photos and videos fall on it across all years. Pass month and day to count a single day.")]
    async fn memory_calendar(
        &self, #[tool(aggr)] req: CalendarRequest,
    ) -> String {
        match self.do_memory_calendar(req.month, req.day).await {
            Ok(msg) => msg,
            Err(e) => format!("Error: {}", e),
        }
    }

    #[tool(description = "List the next scheduled daily memory reminders, soonest first, at the configured reminder time.")]
    async fn upcoming_notifications(
        &self, #[tool(aggr)] req: NotificationsRequest,
    ) -> String {
        match self.do_upcoming_notifications(req.limit).await {
            Ok(msg) => msg,
            Err(e) => format!("Error: {}", e),
        }
    }

    #[tool(description = "Import a folder of photos and videos into the library. Already-known files are skipped; a still with a same-named .mov becomes a live photo.")]
    async fn import_folder(
        &self, #[tool(aggr)] req: ImportRequest,
    ) -> String {
        match self.do_import_folder(&req.path).await {
            Ok(msg) => msg,
            Err(e) => format!("Error: {}", e),
        }
    }

    #[tool(description = "Mark or unmark an asset as a favorite.")]
    async fn set_favorite(
        &self, #[tool(aggr)] req: FavoriteRequest,
    ) -> String {
        match self.do_set_favorite(&req.asset_id, req.favorite).await {
            Ok(msg) => msg,
            Err(e) => format!("Error: {}", e),
        }
    }

    #[tool(description = "Remove an asset from the library. The file on disk is left alone.")]
    async fn remove_asset(
        &self, #[tool(aggr)] req: RemoveRequest,
    ) -> String {
        match self.do_remove_asset(&req.asset_id).await {
            Ok(msg) => msg,
            Err(e) => format!("Error: {}", e),
        }
    }

    #[tool(description = "Drop cached memory counts and re-read the library.")]
    async fn refresh(
        &self, #[tool(aggr)] req: RefreshRequest,
    ) -> String {
        match self.do_refresh(req.reason.as_deref()).await {
            Ok(msg) => msg,
            Err(e) => format!("Error: {}", e),
        }
    }

    #[tool(description = "View or change reminder settings: on/off, time of day, favorites-only view. Call with no arguments to view.")]
    async fn notification_settings(
        &self, #[tool(aggr)] req: SettingsRequest,
    ) -> String {
        match self.do_notification_settings(req).await {
            Ok(msg) => msg,
            Err(e) => format!("Error: {}", e),
        }
    }
}

#[tool(tool_box)]
impl ServerHandler for MemoryServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "On-this-day photo memories. 8 tools: \
                 on_this_day (photos from this day in past years, grouped by year), \
                 memory_calendar (days with memories and their counts, or one day's count), \
                 upcoming_notifications (next daily reminders), \
                 import_folder (add photos and videos from disk), \
                 set_favorite (mark favorites), \
                 remove_asset (drop an asset from the library), \
                 refresh (re-read the library), \
                 notification_settings (reminder time and filters)."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
