use std::sync::Arc;

use crate::error::Result;
use crate::types::{AssetRecord, YearInterval};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authorization {
    Authorized,
    Denied,
    NotDetermined,
}

impl Authorization {
    pub fn is_authorized(&self) -> bool {
        matches!(self, Authorization::Authorized)
    }
}

/// Summary of one committed batch of library edits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LibraryChange {
    pub inserted: usize,
    pub updated: usize,
    pub removed: usize,
}

impl LibraryChange {
    pub fn is_empty(&self) -> bool {
        self.inserted == 0 && self.updated == 0 && self.removed == 0
    }
}

pub type ChangeObserver = Arc<dyn Fn(&LibraryChange) + Send + Sync>;

/// Source of asset snapshots. The aggregation core only ever borrows what a
/// provider hands out.
pub trait AssetProvider: Send + Sync {
    fn authorization(&self) -> Authorization;

    /// Every asset, oldest first.
    fn all_assets_ascending(&self) -> Result<Vec<AssetRecord>>;

    /// Assets created inside any of `intervals`, oldest first.
    fn assets_in_intervals(&self, intervals: &[YearInterval]) -> Result<Vec<AssetRecord>>;

    /// Register a callback fired at most once per committed change batch.
    fn observe(&self, observer: ChangeObserver);
}
