use chrono::{
    DateTime, Datelike, Duration, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, Offset,
    TimeZone, Utc,
};

use crate::error::{MemoriesError, Result};
use crate::types::CanonicalDayKey;

/// Civil time zone every calendar decision is made in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Zone {
    #[default]
    Local,
    Fixed(FixedOffset),
}

impl Zone {
    pub fn utc() -> Self {
        Zone::Fixed(Utc.fix())
    }

    /// Parse an offset such as `+02:00`, `-0530` or `Z`.
    pub fn parse_offset(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("z") || s.eq_ignore_ascii_case("utc") {
            return Some(Self::utc());
        }
        s.parse::<FixedOffset>().ok().map(Zone::Fixed)
    }

    pub fn civil(&self, instant: &DateTime<Utc>) -> NaiveDateTime {
        match self {
            Zone::Local => instant.with_timezone(&Local).naive_local(),
            Zone::Fixed(offset) => instant.with_timezone(offset).naive_local(),
        }
    }

    /// Map local civil time to an instant. Ambiguous times take the earlier
    /// instant; times skipped by a DST jump are shifted forward by the gap.
    pub fn instant(&self, civil: NaiveDateTime) -> DateTime<Utc> {
        match self {
            Zone::Local => resolve_civil(&Local, civil),
            Zone::Fixed(offset) => resolve_civil(offset, civil),
        }
    }

    pub fn now(&self) -> NaiveDateTime {
        self.civil(&Utc::now())
    }

    pub fn today(&self) -> NaiveDate {
        self.now().date()
    }

    pub fn year_of(&self, instant: &DateTime<Utc>) -> i32 {
        self.civil(instant).year()
    }
}

fn resolve_civil<Tz: TimeZone>(tz: &Tz, civil: NaiveDateTime) -> DateTime<Utc> {
    if let Some(t) = tz.from_local_datetime(&civil).earliest() {
        return t.with_timezone(&Utc);
    }
    // Inside a forward jump: keep the offset in force before it.
    let before = tz.offset_from_utc_datetime(&(civil - Duration::days(1))).fix();
    Utc.from_utc_datetime(&(civil - Duration::seconds(i64::from(before.local_minus_utc()))))
}

pub fn canonical_key(zone: &Zone, instant: &DateTime<Utc>) -> CanonicalDayKey {
    CanonicalDayKey::of_date(&zone.civil(instant).date())
}

pub fn parse_anchor(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| MemoriesError::InvalidAnchor(s.to_string()))
}

pub fn notification_time(hour: u32, minute: u32) -> Result<NaiveTime> {
    NaiveTime::from_hms_opt(hour, minute, 0).ok_or(MemoriesError::InvalidTime { hour, minute })
}
