use anyhow::Result;

use crate::aggregate::buckets::retain_favorites;
use crate::calendar::parse_anchor;
use crate::server::MemoryServer;
use crate::types::{MediaKind, YearGroup};

impl MemoryServer {
    pub async fn do_on_this_day(&self, date: Option<&str>, json: bool) -> Result<String> {
        let engine = &self.store.engine;
        let anchor = match date {
            Some(d) => parse_anchor(d)?,
            None => engine.zone().today(),
        };

        let mut groups = engine.grouped_by_year(anchor).await?;
        let favorites_only = self.store.settings.read().await.favorites_only;
        if favorites_only {
            groups = retain_favorites(groups);
        }

        if json {
            return Ok(serde_json::to_string_pretty(&groups)?);
        }

        let day = anchor.format("%B %d");
        if groups.is_empty() {
            return Ok(format!(
                "No {}memories on {} in any year.",
                if favorites_only { "favorite " } else { "" },
                day
            ));
        }

        let total: usize = groups.iter().map(|g| g.assets.len()).sum();
        let sections: Vec<String> = groups
            .iter()
            .map(|g| self.render_group(g))
            .collect();
        Ok(format!(
            "{} {} on {} across {} {}:\n\n{}",
            total,
            if total == 1 { "memory" } else { "memories" },
            day,
            groups.len(),
            if groups.len() == 1 { "year" } else { "years" },
            sections.join("\n\n")
        ))
    }

    fn render_group(&self, group: &YearGroup) -> String {
        let zone = self.store.engine.zone();
        let mut lines = vec![format!("{} ({})", group.year, summarize_kinds(group))];
        for asset in &group.assets {
            lines.push(format!(
                "  - [{}{}] {} {}\n    id: {}",
                asset.media_kind.as_str(),
                if asset.is_favorite { ", favorite" } else { "" },
                zone.civil(&asset.created_at).format("%H:%M"),
                asset.path.as_deref().unwrap_or("?"),
                asset.id,
            ));
        }
        lines.join("\n")
    }
}

fn summarize_kinds(group: &YearGroup) -> String {
    let count = |kind: MediaKind| group.assets.iter().filter(|a| a.media_kind == kind).count();
    let parts: Vec<String> = [
        (count(MediaKind::Photo), "photo"),
        (count(MediaKind::LivePhoto), "live photo"),
        (count(MediaKind::Video), "video"),
    ]
    .into_iter()
    .filter(|(n, _)| *n > 0)
    .map(|(n, label)| format!("{} {}{}", n, label, if n == 1 { "" } else { "s" }))
    .collect();
    parts.join(", ")
}
