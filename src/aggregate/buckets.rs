use chrono::NaiveDate;

use crate::calendar::Zone;
use crate::error::{MemoriesError, Result};
use crate::types::{AssetRecord, CanonicalDayKey, YearGroup, YearInterval};

/// One interval per year in `from_year..=to_year` on the anchor's month/day,
/// ascending by year.
pub fn intervals_for_anchor(
    zone: &Zone,
    anchor: &NaiveDate,
    from_year: i32,
    to_year: i32,
) -> Result<Vec<YearInterval>> {
    if from_year > to_year {
        return Err(MemoriesError::EmptyYearRange { from: from_year, to: to_year });
    }

    let key = CanonicalDayKey::of_date(anchor);
    let mut intervals = Vec::with_capacity((to_year - from_year + 1) as usize);
    for year in from_year..=to_year {
        let day = key.realize(year)?;
        let (start, end) = day
            .and_hms_opt(0, 0, 0)
            .zip(day.and_hms_opt(23, 59, 59))
            .ok_or(MemoriesError::YearOutOfRange(year))?;
        intervals.push(YearInterval {
            year,
            day,
            start: zone.instant(start),
            end: zone.instant(end),
        });
    }
    Ok(intervals)
}

/// Partition `assets` by interval. Relative order inside a year is kept and
/// years without a match are left out.
pub fn filter_assets_by_intervals(
    assets: &[AssetRecord],
    intervals: &[YearInterval],
) -> Vec<YearGroup> {
    intervals
        .iter()
        .filter_map(|interval| {
            let matching: Vec<AssetRecord> = assets
                .iter()
                .filter(|a| interval.contains(&a.created_at))
                .cloned()
                .collect();
            if matching.is_empty() {
                None
            } else {
                Some(YearGroup {
                    year: interval.year,
                    interval: interval.clone(),
                    assets: matching,
                })
            }
        })
        .collect()
}

/// Keep only favorites, dropping groups left empty.
pub fn retain_favorites(groups: Vec<YearGroup>) -> Vec<YearGroup> {
    groups
        .into_iter()
        .filter_map(|mut group| {
            group.assets.retain(|a| a.is_favorite);
            (!group.assets.is_empty()).then_some(group)
        })
        .collect()
}
