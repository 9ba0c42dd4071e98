use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Datelike;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::aggregate::frequency::{build_frequency_map, FrequencyMap};
use crate::calendar::Zone;
use crate::error::{MemoriesError, Result};
use crate::store::provider::AssetProvider;

/// Year used for the bucketing range when the library has no assets.
pub const DEFAULT_EARLIEST_YEAR: i32 = 2000;

/// Everything derived from one full library snapshot.
#[derive(Debug)]
pub struct CacheEpoch {
    pub generation: u64,
    pub earliest_year: i32,
    pub nominal_year: i32,
    pub asset_count: usize,
    pub frequency: Arc<FrequencyMap>,
}

type Flight = Arc<OnceCell<Result<Arc<CacheEpoch>>>>;

/// Memoized frequency map and earliest year with explicit invalidation.
///
/// A computation is a *flight* tagged with the generation it started in.
/// Callers asking for the same generation share the flight, so at most one
/// snapshot fetch runs per generation. `invalidate` only bumps the
/// generation: a running flight still answers the callers already waiting on
/// it, and the next caller starts a new one.
pub struct ResultCache {
    provider: Arc<dyn AssetProvider>,
    zone: Zone,
    generation: AtomicU64,
    recomputations: AtomicU64,
    slot: Mutex<Option<(u64, Flight)>>,
}

impl ResultCache {
    pub fn new(provider: Arc<dyn AssetProvider>, zone: Zone) -> Self {
        Self {
            provider,
            zone,
            generation: AtomicU64::new(0),
            recomputations: AtomicU64::new(0),
            slot: Mutex::new(None),
        }
    }

    pub fn invalidate(&self) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(generation, "memory cache invalidated");
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Number of snapshot computations started so far.
    #[cfg(test)]
    pub fn recomputations(&self) -> u64 {
        self.recomputations.load(Ordering::SeqCst)
    }

    /// Current epoch. An epoch realized on an earlier calendar year than
    /// today's is stale even without an invalidation.
    pub async fn get(&self) -> Result<Arc<CacheEpoch>> {
        self.get_for_year(self.zone.today().year()).await
    }

    async fn get_for_year(&self, year: i32) -> Result<Arc<CacheEpoch>> {
        let epoch = self.current(year).await?;
        if epoch.nominal_year == year {
            return Ok(epoch);
        }
        debug!(from = epoch.nominal_year, to = year, "calendar year rolled over");
        self.invalidate();
        self.current(year).await
    }

    async fn current(&self, year: i32) -> Result<Arc<CacheEpoch>> {
        let generation = self.generation();
        let flight = self.flight_for(generation)?;

        let provider = Arc::clone(&self.provider);
        let zone = self.zone;
        let recomputations = &self.recomputations;
        let result = flight
            .get_or_init(|| async move {
                recomputations.fetch_add(1, Ordering::SeqCst);
                debug!(generation, "recomputing memory frequency map");
                let epoch: Result<CacheEpoch> = match tokio::task::spawn_blocking(move || {
                    compute_epoch(&*provider, &zone, generation, year)
                })
                .await
                {
                    Ok(epoch) => epoch,
                    Err(e) => Err(e.into()),
                };
                epoch.map(Arc::new)
            })
            .await
            .clone();

        if let Err(e) = &result {
            warn!("memory cache recomputation failed: {}", e);
            self.discard(&flight);
        }
        result
    }

    pub async fn frequency_map(&self) -> Result<Arc<FrequencyMap>> {
        Ok(Arc::clone(&self.get().await?.frequency))
    }

    pub async fn earliest_year(&self) -> Result<i32> {
        Ok(self.get().await?.earliest_year)
    }

    fn flight_for(&self, generation: u64) -> Result<Flight> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| MemoriesError::Worker("cache slot lock poisoned".into()))?;
        match slot.as_ref() {
            // A newer flight may already exist if an invalidation raced this call.
            Some((current, flight)) if *current >= generation => Ok(Arc::clone(flight)),
            _ => {
                let flight: Flight = Arc::new(OnceCell::new());
                *slot = Some((generation, Arc::clone(&flight)));
                Ok(flight)
            }
        }
    }

    fn discard(&self, failed: &Flight) {
        if let Ok(mut slot) = self.slot.lock() {
            if matches!(slot.as_ref(), Some((_, flight)) if Arc::ptr_eq(flight, failed)) {
                *slot = None;
            }
        }
    }
}

fn compute_epoch(
    provider: &dyn AssetProvider,
    zone: &Zone,
    generation: u64,
    nominal_year: i32,
) -> Result<CacheEpoch> {
    let assets = if provider.authorization().is_authorized() {
        provider.all_assets_ascending()?
    } else {
        debug!("photo library not authorized, using an empty snapshot");
        Vec::new()
    };

    let earliest_year = assets
        .first()
        .map(|a| zone.year_of(&a.created_at))
        .unwrap_or(DEFAULT_EARLIEST_YEAR);
    let frequency = build_frequency_map(zone, &assets, nominal_year)?;

    debug!(
        generation,
        assets = assets.len(),
        days = frequency.len(),
        earliest_year,
        "memory cache epoch computed"
    );

    Ok(CacheEpoch {
        generation,
        earliest_year,
        nominal_year,
        asset_count: assets.len(),
        frequency: Arc::new(frequency),
    })
}
