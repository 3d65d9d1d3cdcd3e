//! Recurrence rule attached to a savings goal.

use std::str::FromStr;

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};
use crate::utils::{schedule_date_from_utc, CalendarDay, DayOfWeek, SCHEDULE_TZ};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduleInterval {
    Weekly,
    Monthly,
}

impl FromStr for ScheduleInterval {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weekly" => Ok(ScheduleInterval::Weekly),
            "monthly" => Ok(ScheduleInterval::Monthly),
            other => Err(Error::invalid_input(format!(
                "Unsupported schedule interval '{}', expected Weekly or Monthly",
                other
            ))),
        }
    }
}

/// Which calendar field a schedule fires on. Exactly one is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScheduleCadence {
    DayOfMonth(u32),
    DayOfWeek(DayOfWeek),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleDescriptor {
    #[serde(flatten)]
    pub cadence: ScheduleCadence,
    pub interval: ScheduleInterval,
    pub start_date: DateTime<Utc>,
}

impl ScheduleDescriptor {
    /// Builds the descriptor for a goal's recurring savings setup.
    ///
    /// The anchor day is taken from `start_date` in the schedule calendar,
    /// the same one the daily batch evaluates in.
    pub fn from_setup(interval: &str, start_date: DateTime<Utc>) -> Result<Self> {
        let interval = interval.parse::<ScheduleInterval>()?;
        let anchor = schedule_date_from_utc(start_date, SCHEDULE_TZ);
        let cadence = match interval {
            ScheduleInterval::Monthly => ScheduleCadence::DayOfMonth(anchor.day()),
            ScheduleInterval::Weekly => ScheduleCadence::DayOfWeek(anchor.weekday().into()),
        };
        Ok(Self {
            cadence,
            interval,
            start_date,
        })
    }

    pub fn day_of_month(&self) -> Option<u32> {
        match self.cadence {
            ScheduleCadence::DayOfMonth(day) => Some(day),
            ScheduleCadence::DayOfWeek(_) => None,
        }
    }

    pub fn day_of_week(&self) -> Option<DayOfWeek> {
        match self.cadence {
            ScheduleCadence::DayOfWeek(day) => Some(day),
            ScheduleCadence::DayOfMonth(_) => None,
        }
    }

    /// True when either the day-of-month or the day-of-week matches.
    pub fn matches(&self, day: &CalendarDay) -> bool {
        self.day_of_month() == Some(day.day_of_month)
            || self.day_of_week() == Some(day.day_of_week)
    }
}
