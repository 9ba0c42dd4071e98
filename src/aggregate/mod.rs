//! Day-of-year memory aggregation: year bucketing, per-day frequency counts,
//! notification schedule, and the cache that ties them to a library.

pub mod buckets;
pub mod cache;
pub mod frequency;
pub mod notifications;

use std::sync::Arc;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::calendar::Zone;
use crate::error::Result;
use crate::store::provider::{AssetProvider, LibraryChange};
use crate::types::{PickerEntry, ScheduledNotification, YearGroup};

use buckets::{filter_assets_by_intervals, intervals_for_anchor};
use cache::{CacheEpoch, ResultCache};
use frequency::{picker_entries, FrequencyMap};

pub struct MemoryEngine {
    provider: Arc<dyn AssetProvider>,
    cache: Arc<ResultCache>,
    zone: Zone,
}

impl MemoryEngine {
    /// Build an engine over `provider` and subscribe its cache to the
    /// provider's change feed.
    pub fn new(provider: Arc<dyn AssetProvider>, zone: Zone) -> Self {
        let cache = Arc::new(ResultCache::new(Arc::clone(&provider), zone));

        let weak = Arc::downgrade(&cache);
        provider.observe(Arc::new(move |change: &LibraryChange| {
            if let Some(cache) = weak.upgrade() {
                debug!(
                    inserted = change.inserted,
                    updated = change.updated,
                    removed = change.removed,
                    "library changed"
                );
                cache.invalidate();
            }
        }));

        Self { provider, cache, zone }
    }

    pub fn zone(&self) -> Zone {
        self.zone
    }

    pub fn invalidate(&self) {
        self.cache.invalidate();
    }

    #[cfg(test)]
    pub fn recomputations(&self) -> u64 {
        self.cache.recomputations()
    }

    /// Assets from every past year on `anchor`'s month/day, through this year.
    pub async fn grouped_by_year(&self, anchor: NaiveDate) -> Result<Vec<YearGroup>> {
        self.grouped_by_year_until(anchor, self.zone.today().year()).await
    }

    pub async fn grouped_by_year_until(&self, anchor: NaiveDate, to_year: i32) -> Result<Vec<YearGroup>> {
        let earliest_year = self.cache.earliest_year().await?;
        let intervals = intervals_for_anchor(&self.zone, &anchor, earliest_year.min(to_year), to_year)?;

        let provider = Arc::clone(&self.provider);
        let query = intervals.clone();
        let assets = tokio::task::spawn_blocking(move || {
            if provider.authorization().is_authorized() {
                provider.assets_in_intervals(&query)
            } else {
                Ok(Vec::new())
            }
        })
        .await??;

        Ok(filter_assets_by_intervals(&assets, &intervals))
    }

    /// The whole cached epoch: counts, earliest year and snapshot size.
    pub async fn snapshot(&self) -> Result<Arc<CacheEpoch>> {
        self.cache.get().await
    }

    pub async fn frequency_map(&self) -> Result<Arc<FrequencyMap>> {
        self.cache.frequency_map().await
    }

    pub async fn picker_entries(&self) -> Result<Vec<PickerEntry>> {
        Ok(picker_entries(&*self.frequency_map().await?))
    }

    pub async fn upcoming_notifications(
        &self,
        now: NaiveDateTime,
        hour: u32,
        minute: u32,
        max: usize,
    ) -> Result<Vec<ScheduledNotification>> {
        let map = self.frequency_map().await?;
        notifications::upcoming_notifications(&self.zone, &map, now, hour, minute, max)
    }
}
