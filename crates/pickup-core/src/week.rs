use crate::error::{PickupError, Result};
use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of bookable days per week, Sunday through Friday.
pub const SLOTS_PER_WEEK: usize = 6;

const DAY_LABELS: [&str; SLOTS_PER_WEEK] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
];

const DAY_ABBREVIATIONS: [&str; SLOTS_PER_WEEK] = ["sun", "mon", "tue", "wed", "thu", "fri"];

const KEY_FORMAT: &str = "%Y-%m-%d";

fn shift_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    let magnitude = Days::new(days.unsigned_abs());
    if days >= 0 {
        date.checked_add_days(magnitude)
    } else {
        date.checked_sub_days(magnitude)
    }
}

// ---------------------------------------------------------------------------
// WeekKey
// ---------------------------------------------------------------------------

/// The Sunday that opens a week. Only constructible when every slot date of
/// that week is representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WeekKey(NaiveDate);

impl WeekKey {
    pub fn from_sunday(date: NaiveDate) -> Result<Self> {
        if date.weekday() != Weekday::Sun {
            return Err(PickupError::InvalidWeekKey(
                date.format(KEY_FORMAT).to_string(),
            ));
        }
        if date.checked_add_days(Days::new(6)).is_none() {
            return Err(PickupError::WeekOutOfRange);
        }
        Ok(Self(date))
    }

    /// Week containing `date`.
    pub fn containing(date: NaiveDate) -> Result<Self> {
        week_key(date, 0)
    }

    pub fn start(self) -> NaiveDate {
        self.0
    }

    /// The Saturday closing the week.
    pub fn end(self) -> NaiveDate {
        self.0.checked_add_days(Days::new(6)).unwrap_or(self.0)
    }

    pub fn offset(self, weeks: i64) -> Result<Self> {
        week_key(self.0, weeks)
    }

    pub fn date_of(self, day: DayIndex) -> NaiveDate {
        self.0
            .checked_add_days(Days::new(day.0 as u64))
            .unwrap_or(self.0)
    }
}

impl fmt::Display for WeekKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(KEY_FORMAT))
    }
}

impl FromStr for WeekKey {
    type Err = PickupError;

    fn from_str(s: &str) -> Result<Self> {
        let date = NaiveDate::parse_from_str(s.trim(), KEY_FORMAT)
            .map_err(|_| PickupError::InvalidWeekKey(s.to_string()))?;
        match Self::from_sunday(date) {
            Err(PickupError::InvalidWeekKey(_)) => Err(PickupError::InvalidWeekKey(s.to_string())),
            other => other,
        }
    }
}

impl TryFrom<String> for WeekKey {
    type Error = PickupError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<WeekKey> for String {
    fn from(week: WeekKey) -> Self {
        week.to_string()
    }
}

/// First Sunday of the week containing `reference + offset_weeks * 7` days.
pub fn week_key(reference: NaiveDate, offset_weeks: i64) -> Result<WeekKey> {
    let days = offset_weeks
        .checked_mul(7)
        .ok_or(PickupError::WeekOutOfRange)?;
    let date = shift_days(reference, days).ok_or(PickupError::WeekOutOfRange)?;
    let since_sunday = i64::from(date.weekday().num_days_from_sunday());
    let sunday = shift_days(date, -since_sunday).ok_or(PickupError::WeekOutOfRange)?;
    WeekKey::from_sunday(sunday)
}

/// The bookable dates of `week`, in day-index order.
pub fn slot_dates(week: WeekKey) -> Vec<NaiveDate> {
    week.start().iter_days().take(SLOTS_PER_WEEK).collect()
}

pub fn day_label(day: DayIndex) -> &'static str {
    DAY_LABELS[day.index()]
}

// ---------------------------------------------------------------------------
// DayIndex
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct DayIndex(u8);

impl DayIndex {
    pub fn new(index: usize) -> Result<Self> {
        if index >= SLOTS_PER_WEEK {
            return Err(PickupError::SlotInvalid(index.to_string()));
        }
        Ok(Self(index as u8))
    }

    pub fn all() -> impl Iterator<Item = DayIndex> {
        (0..SLOTS_PER_WEEK as u8).map(DayIndex)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn label(self) -> &'static str {
        day_label(self)
    }
}

impl fmt::Display for DayIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Accepts `0`-`5` or an English day name or three-letter abbreviation.
impl FromStr for DayIndex {
    type Err = PickupError;

    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim().to_ascii_lowercase();
        if let Ok(n) = needle.parse::<usize>() {
            return Self::new(n).map_err(|_| PickupError::SlotInvalid(s.to_string()));
        }
        DAY_LABELS
            .iter()
            .zip(DAY_ABBREVIATIONS)
            .position(|(full, short)| needle == full.to_ascii_lowercase() || needle == short)
            .map(|i| Self(i as u8))
            .ok_or_else(|| PickupError::SlotInvalid(s.to_string()))
    }
}

impl TryFrom<u8> for DayIndex {
    type Error = PickupError;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(value as usize)
    }
}

impl From<DayIndex> for u8 {
    fn from(day: DayIndex) -> Self {
        day.0
    }
}

// ---------------------------------------------------------------------------
// SlotKey
// ---------------------------------------------------------------------------

/// One bookable slot, rendered `<week_key>_<day_index>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotKey {
    pub week: WeekKey,
    pub day: DayIndex,
}

impl SlotKey {
    pub fn new(week: WeekKey, day: DayIndex) -> Self {
        Self { week, day }
    }

    pub fn date(self) -> NaiveDate {
        self.week.date_of(self.day)
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.week, self.day)
    }
}

impl FromStr for SlotKey {
    type Err = PickupError;

    fn from_str(s: &str) -> Result<Self> {
        let (week, day) = s
            .rsplit_once('_')
            .ok_or_else(|| PickupError::SlotInvalid(s.to_string()))?;
        let day: usize = day
            .parse()
            .map_err(|_| PickupError::SlotInvalid(s.to_string()))?;
        Ok(Self {
            week: week.parse()?,
            day: DayIndex::new(day)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
