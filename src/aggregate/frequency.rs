use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::calendar::{canonical_key, Zone};
use crate::error::Result;
use crate::types::{AssetRecord, CanonicalDayKey, PickerEntry};

/// Asset counts per calendar day, realized on a single nominal year so the
/// days sort in calendar order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyMap {
    nominal_year: i32,
    counts: BTreeMap<NaiveDate, usize>,
}

impl FrequencyMap {
    pub fn get(&self, key: &CanonicalDayKey) -> usize {
        key.realize(self.nominal_year)
            .ok()
            .and_then(|date| self.counts.get(&date).copied())
            .unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NaiveDate, &usize)> {
        self.counts.iter()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    #[cfg(test)]
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}

/// Count every asset under its month/day in `nominal_year`. Leap-day assets
/// land on Feb 28 when the nominal year is a common year.
pub fn build_frequency_map(
    zone: &Zone,
    assets: &[AssetRecord],
    nominal_year: i32,
) -> Result<FrequencyMap> {
    let mut counts = BTreeMap::new();
    for asset in assets {
        let date = canonical_key(zone, &asset.created_at).realize(nominal_year)?;
        *counts.entry(date).or_insert(0) += 1;
    }
    Ok(FrequencyMap { nominal_year, counts })
}

/// Days with at least one memory, ascending.
pub fn picker_entries(map: &FrequencyMap) -> Vec<PickerEntry> {
    map.iter()
        .filter(|(_, count)| **count > 0)
        .map(|(date, count)| PickerEntry { date: *date, count: *count })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MediaKind;
    use chrono::{DateTime, Utc};

    fn asset(id: &str, ts: &str) -> AssetRecord {
        AssetRecord {
            id: id.to_string(),
            created_at: DateTime::parse_from_rfc3339(ts).unwrap().with_timezone(&Utc),
            is_favorite: false,
            media_kind: MediaKind::Photo,
            path: None,
        }
    }

    #[test]
    fn test_same_day_across_years_accumulates() {
        let assets = vec![
            asset("a", "2019-08-08T10:00:00Z"),
            asset("b", "2020-08-08T11:00:00Z"),
            asset("c", "2021-08-08T12:00:00Z"),
        ];
        let map = build_frequency_map(&Zone::utc(), &assets, 2023).unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&CanonicalDayKey::new(8, 8).unwrap()), 3);
        let (date, count) = map.iter().next().unwrap();
        assert_eq!(*date, NaiveDate::from_ymd_opt(2023, 8, 8).unwrap());
        assert_eq!(*count, 3);
    }

    #[test]
    fn test_counts_sum_to_asset_count() {
        let assets = vec![
            asset("a", "2010-01-01T00:00:00Z"),
            asset("b", "2011-12-31T23:59:59Z"),
            asset("c", "2012-02-29T12:00:00Z"),
            asset("d", "2015-02-28T12:00:00Z"),
            asset("e", "2015-07-04T12:00:00Z"),
            asset("f", "2016-07-04T18:00:00Z"),
        ];
        let map = build_frequency_map(&Zone::utc(), &assets, 2023).unwrap();
        assert_eq!(map.total(), assets.len());
    }

    #[test]
    fn test_traversal_order_does_not_change_counts() {
        let mut assets = vec![
            asset("a", "2010-03-01T00:00:00Z"),
            asset("b", "2011-05-06T00:00:00Z"),
            asset("c", "2012-03-01T00:00:00Z"),
        ];
        let forward = build_frequency_map(&Zone::utc(), &assets, 2020).unwrap();
        assets.reverse();
        let backward = build_frequency_map(&Zone::utc(), &assets, 2020).unwrap();
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_leap_day_in_common_nominal_year() {
        let assets = vec![asset("leap", "2020-02-29T09:00:00Z"), asset("eve", "2021-02-28T09:00:00Z")];

        let common = build_frequency_map(&Zone::utc(), &assets, 2023).unwrap();
        assert_eq!(common.len(), 1);
        assert_eq!(common.get(&CanonicalDayKey::new(2, 28).unwrap()), 2);

        let leap = build_frequency_map(&Zone::utc(), &assets, 2024).unwrap();
        assert_eq!(leap.len(), 2);
        assert_eq!(leap.get(&CanonicalDayKey::new(2, 29).unwrap()), 1);
    }

    #[test]
    fn test_empty_library_gives_empty_map() {
        let map = build_frequency_map(&Zone::utc(), &[], 2023).unwrap();
        assert!(map.is_empty());
        assert_eq!(map.total(), 0);
        assert!(picker_entries(&map).is_empty());
    }

    #[test]
    fn test_picker_entries_ascending() {
        let assets = vec![
            asset("a", "2019-12-25T10:00:00Z"),
            asset("b", "2018-01-02T10:00:00Z"),
            asset("c", "2017-06-15T10:00:00Z"),
            asset("d", "2016-01-02T10:00:00Z"),
        ];
        let map = build_frequency_map(&Zone::utc(), &assets, 2023).unwrap();
        let entries = picker_entries(&map);
        let days: Vec<String> = entries.iter().map(|e| e.date.format("%m-%d").to_string()).collect();
        assert_eq!(days, vec!["01-02", "06-15", "12-25"]);
        assert_eq!(entries[0].count, 2);
    }
}
