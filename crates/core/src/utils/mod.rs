pub mod time_utils;

pub use time_utils::{
    calendar_day_from_utc, calendar_day_today, schedule_date_from_utc, CalendarDay, DayOfWeek,
    SCHEDULE_TZ,
};
