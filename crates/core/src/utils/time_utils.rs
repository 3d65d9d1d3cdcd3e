use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Calendar used both when a recurring schedule is set up and when the daily
/// batch decides what is due. Keep these on the same zone or weekly goals
/// drift by a day around midnight.
pub const SCHEDULE_TZ: Tz = chrono_tz::UTC;

/// Named day of the week as persisted on a schedule descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DayOfWeek::Monday => "Monday",
            DayOfWeek::Tuesday => "Tuesday",
            DayOfWeek::Wednesday => "Wednesday",
            DayOfWeek::Thursday => "Thursday",
            DayOfWeek::Friday => "Friday",
            DayOfWeek::Saturday => "Saturday",
            DayOfWeek::Sunday => "Sunday",
        }
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Mon => DayOfWeek::Monday,
            Weekday::Tue => DayOfWeek::Tuesday,
            Weekday::Wed => DayOfWeek::Wednesday,
            Weekday::Thu => DayOfWeek::Thursday,
            Weekday::Fri => DayOfWeek::Friday,
            Weekday::Sat => DayOfWeek::Saturday,
            Weekday::Sun => DayOfWeek::Sunday,
        }
    }
}

impl std::fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Civil date decomposed into the two fields a schedule can match on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    /// 1..=31
    pub day_of_month: u32,
    pub day_of_week: DayOfWeek,
}

impl CalendarDay {
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            date,
            day_of_month: date.day(),
            day_of_week: date.weekday().into(),
        }
    }
}

/// Converts a UTC instant to the civil date in the given timezone.
pub fn schedule_date_from_utc(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// Resolves the schedule calendar day for an instant. Pure and total.
pub fn calendar_day_from_utc(instant: DateTime<Utc>) -> CalendarDay {
    CalendarDay::from_date(schedule_date_from_utc(instant, SCHEDULE_TZ))
}

pub fn calendar_day_today() -> CalendarDay {
    calendar_day_from_utc(Utc::now())
}
