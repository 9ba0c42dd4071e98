use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::MemoriesError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Photo,
    LivePhoto,
    Video,
}

impl MediaKind {
    pub fn as_str(&self) -> &str {
        match self {
            MediaKind::Photo => "photo",
            MediaKind::LivePhoto => "live_photo",
            MediaKind::Video => "video",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "photo" => Some(MediaKind::Photo),
            "live_photo" | "livephoto" => Some(MediaKind::LivePhoto),
            "video" => Some(MediaKind::Video),
            _ => None,
        }
    }
}

/// Read-only view of a photo or video owned by the library.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssetRecord {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub is_favorite: bool,
    pub media_kind: MediaKind,
    pub path: Option<String>,
}

/// Year-independent day identifier. Ordered by month, then day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalDayKey {
    pub month: u32,
    pub day: u32,
}

impl CanonicalDayKey {
    /// Validated against a leap year, so Feb 29 is a legal key.
    pub fn new(month: u32, day: u32) -> Result<Self, MemoriesError> {
        if NaiveDate::from_ymd_opt(2000, month, day).is_none() {
            return Err(MemoriesError::InvalidDay { month, day });
        }
        Ok(Self { month, day })
    }

    pub fn of_date(date: &NaiveDate) -> Self {
        Self { month: date.month(), day: date.day() }
    }

    pub fn is_leap_day(&self) -> bool {
        self.month == 2 && self.day == 29
    }

    /// Concrete date in `year`. A leap-day key clamps to Feb 28 in common years.
    pub fn realize(&self, year: i32) -> Result<NaiveDate, MemoriesError> {
        if let Some(date) = NaiveDate::from_ymd_opt(year, self.month, self.day) {
            return Ok(date);
        }
        if self.is_leap_day() {
            if let Some(date) = NaiveDate::from_ymd_opt(year, 2, 28) {
                return Ok(date);
            }
        }
        Err(MemoriesError::YearOutOfRange(year))
    }
}

impl std::fmt::Display for CanonicalDayKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}-{:02}", self.month, self.day)
    }
}

/// One calendar day in one year, 00:00:00 through 23:59:59 local time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct YearInterval {
    pub year: i32,
    pub day: NaiveDate,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl YearInterval {
    /// The end second is inclusive, including any fraction of it.
    pub fn contains(&self, instant: &DateTime<Utc>) -> bool {
        *instant >= self.start && *instant < self.end + chrono::Duration::seconds(1)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearGroup {
    pub year: i32,
    pub interval: YearInterval,
    pub assets: Vec<AssetRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PickerEntry {
    pub date: NaiveDate,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScheduledNotification {
    pub fire_at: DateTime<Utc>,
    pub local_time: NaiveDateTime,
    pub day: CanonicalDayKey,
    pub count: usize,
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_validation() {
        assert!(CanonicalDayKey::new(2, 29).is_ok());
        assert!(CanonicalDayKey::new(2, 30).is_err());
        assert!(CanonicalDayKey::new(4, 31).is_err());
        assert!(CanonicalDayKey::new(13, 1).is_err());
        assert!(CanonicalDayKey::new(0, 1).is_err());
    }

    #[test]
    fn test_leap_day_clamps_in_common_year() {
        let key = CanonicalDayKey::new(2, 29).unwrap();
        assert_eq!(key.realize(2024).unwrap(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(key.realize(2023).unwrap(), NaiveDate::from_ymd_opt(2023, 2, 28).unwrap());
    }

    #[test]
    fn test_key_ordering() {
        let mut keys = vec![
            CanonicalDayKey::new(12, 1).unwrap(),
            CanonicalDayKey::new(1, 31).unwrap(),
            CanonicalDayKey::new(1, 2).unwrap(),
        ];
        keys.sort();
        let rendered: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
        assert_eq!(rendered, vec!["01-02", "01-31", "12-01"]);
    }

    #[test]
    fn test_interval_end_second_is_inclusive() {
        let start = DateTime::parse_from_rfc3339("2021-08-08T00:00:00Z").unwrap().with_timezone(&Utc);
        let end = DateTime::parse_from_rfc3339("2021-08-08T23:59:59Z").unwrap().with_timezone(&Utc);
        let interval = YearInterval {
            year: 2021,
            day: NaiveDate::from_ymd_opt(2021, 8, 8).unwrap(),
            start,
            end,
        };
        let late = DateTime::parse_from_rfc3339("2021-08-08T23:59:59.750Z").unwrap().with_timezone(&Utc);
        let next = DateTime::parse_from_rfc3339("2021-08-09T00:00:00Z").unwrap().with_timezone(&Utc);
        assert!(interval.contains(&start));
        assert!(interval.contains(&late));
        assert!(!interval.contains(&next));
    }

    #[test]
    fn test_media_kind_names() {
        for kind in [MediaKind::Photo, MediaKind::LivePhoto, MediaKind::Video] {
            assert_eq!(MediaKind::from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(MediaKind::from_str("gif"), None);
    }
}
