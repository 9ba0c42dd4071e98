//! In-memory asset provider with knobs for exercising the cache and engine.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::error::{MemoriesError, Result};
use crate::store::provider::{AssetProvider, Authorization, ChangeObserver, LibraryChange};
use crate::types::{AssetRecord, MediaKind, YearInterval};

pub struct InMemoryLibrary {
    assets: Mutex<Vec<AssetRecord>>,
    observers: Mutex<Vec<ChangeObserver>>,
    authorization: Mutex<Authorization>,
    fetch_delay: Mutex<Duration>,
    failing: AtomicBool,
    full_fetches: AtomicUsize,
}

impl InMemoryLibrary {
    pub fn new(assets: Vec<AssetRecord>) -> Self {
        let lib = Self {
            assets: Mutex::new(Vec::new()),
            observers: Mutex::new(Vec::new()),
            authorization: Mutex::new(Authorization::Authorized),
            fetch_delay: Mutex::new(Duration::ZERO),
            failing: AtomicBool::new(false),
            full_fetches: AtomicUsize::new(0),
        };
        lib.assets.lock().unwrap().extend(assets);
        lib.sort();
        lib
    }

    pub fn asset(id: &str, ts: &str) -> AssetRecord {
        AssetRecord {
            id: id.to_string(),
            created_at: DateTime::parse_from_rfc3339(ts).unwrap().with_timezone(&Utc),
            is_favorite: false,
            media_kind: MediaKind::Photo,
            path: None,
        }
    }

    pub fn push(&self, asset: AssetRecord) {
        self.assets.lock().unwrap().push(asset);
        self.sort();
        self.notify(&LibraryChange { inserted: 1, ..Default::default() });
    }

    pub fn set_authorization(&self, authorization: Authorization) {
        *self.authorization.lock().unwrap() = authorization;
    }

    pub fn set_fetch_delay(&self, delay: Duration) {
        *self.fetch_delay.lock().unwrap() = delay;
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn full_fetches(&self) -> usize {
        self.full_fetches.load(Ordering::SeqCst)
    }

    fn sort(&self) {
        self.assets.lock().unwrap().sort_by_key(|a| a.created_at);
    }

    fn notify(&self, change: &LibraryChange) {
        let observers = self.observers.lock().unwrap().clone();
        for observer in observers {
            observer(change);
        }
    }
}

impl AssetProvider for InMemoryLibrary {
    fn authorization(&self) -> Authorization {
        *self.authorization.lock().unwrap()
    }

    fn all_assets_ascending(&self) -> Result<Vec<AssetRecord>> {
        self.full_fetches.fetch_add(1, Ordering::SeqCst);
        let delay = *self.fetch_delay.lock().unwrap();
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(MemoriesError::LibraryUnavailable("store offline".into()));
        }
        Ok(self.assets.lock().unwrap().clone())
    }

    fn assets_in_intervals(&self, intervals: &[YearInterval]) -> Result<Vec<AssetRecord>> {
        Ok(self
            .assets
            .lock()
            .unwrap()
            .iter()
            .filter(|a| intervals.iter().any(|i| i.contains(&a.created_at)))
            .cloned()
            .collect())
    }

    fn observe(&self, observer: ChangeObserver) {
        self.observers.lock().unwrap().push(observer);
    }
}
