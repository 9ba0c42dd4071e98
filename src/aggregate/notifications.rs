use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDateTime, NaiveTime};

use crate::aggregate::frequency::FrequencyMap;
use crate::calendar::{notification_time, Zone};
use crate::error::Result;
use crate::types::{CanonicalDayKey, ScheduledNotification};

/// Most pending local notifications a device will hold at once.
pub const DEFAULT_NOTIFICATION_LIMIT: usize = 64;

/// Next local occurrence of `key` at `time` strictly after `now`.
pub fn next_occurrence(key: &CanonicalDayKey, now: NaiveDateTime, time: NaiveTime) -> Result<NaiveDateTime> {
    let this_year = key.realize(now.year())?.and_time(time);
    if this_year > now {
        return Ok(this_year);
    }
    Ok(key.realize(now.year() + 1)?.and_time(time))
}

/// One summary notification per remembered day, soonest first, capped at
/// `max`. Days that fall on the same instant after leap-day clamping merge.
pub fn upcoming_notifications(
    zone: &Zone,
    map: &FrequencyMap,
    now: NaiveDateTime,
    hour: u32,
    minute: u32,
    max: usize,
) -> Result<Vec<ScheduledNotification>> {
    let time = notification_time(hour, minute)?;

    let mut by_fire_time: BTreeMap<NaiveDateTime, (CanonicalDayKey, usize)> = BTreeMap::new();
    for (date, count) in map.iter() {
        if *count == 0 {
            continue;
        }
        let key = CanonicalDayKey::of_date(date);
        let local = next_occurrence(&key, now, time)?;
        let slot = by_fire_time.entry(local).or_insert((CanonicalDayKey::of_date(&local.date()), 0));
        slot.1 += count;
    }

    Ok(by_fire_time
        .into_iter()
        .take(max)
        .map(|(local, (day, count))| ScheduledNotification {
            fire_at: zone.instant(local),
            local_time: local,
            day,
            count,
            body: notification_body(count),
        })
        .collect())
}

pub fn notification_body(count: usize) -> String {
    if count == 1 {
        "1 photo memory for today".to_string()
    } else {
        format!("{} photo memories for today", count)
    }
}
