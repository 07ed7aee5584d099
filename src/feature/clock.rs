//! Wall-clock snapshots and greetings.

use chrono::{DateTime, Datelike, Local, TimeZone, Timelike};
use serde::{Deserialize, Serialize};

/// Coarse period of the day, derived from the local hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeOfDay {
    /// 05:00 - 11:59
    Morning,
    /// 12:00 - 16:59
    Afternoon,
    /// 17:00 - 20:59
    Evening,
    /// 21:00 - 04:59
    Night,
}

impl TimeOfDay {
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            5..=11 => TimeOfDay::Morning,
            12..=16 => TimeOfDay::Afternoon,
            17..=20 => TimeOfDay::Evening,
            _ => TimeOfDay::Night,
        }
    }

    pub fn greeting(self) -> &'static str {
        match self {
            TimeOfDay::Morning => "Good Morning!",
            TimeOfDay::Afternoon => "Good Afternoon!",
            TimeOfDay::Evening => "Good Evening!",
            TimeOfDay::Night => "Good Night!",
        }
    }
}

impl std::fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TimeOfDay::Morning => "Morning",
            TimeOfDay::Afternoon => "Afternoon",
            TimeOfDay::Evening => "Evening",
            TimeOfDay::Night => "Night",
        };
        f.write_str(name)
    }
}

/// Broken-down local time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Now {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    /// Abbreviated English weekday (`Mon` .. `Sun`)
    pub weekday: String,
    pub time_of_day: TimeOfDay,
    /// ISO 8601 week number
    pub iso_week: u32,
    /// `%Y-%m-%d %H:%M:%S`
    pub formatted: String,
}

impl Now {
    /// Snapshot the local clock.
    pub fn local() -> Self {
        Self::from_datetime(&Local::now())
    }

    pub fn from_datetime<Tz: TimeZone>(dt: &DateTime<Tz>) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        Self {
            year: dt.year(),
            month: dt.month(),
            day: dt.day(),
            hour: dt.hour(),
            minute: dt.minute(),
            second: dt.second(),
            weekday: dt.weekday().to_string(),
            time_of_day: TimeOfDay::from_hour(dt.hour()),
            iso_week: dt.iso_week().week(),
            formatted: dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }

    pub fn is_weekend(&self) -> bool {
        matches!(self.weekday.as_str(), "Sat" | "Sun")
    }
}

/// Seconds since the Unix epoch.
pub fn timestamp() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Milliseconds since the Unix epoch.
pub fn timestamp_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Greeting for the current local time of day.
pub fn greeting() -> String {
    Now::local().time_of_day.greeting().to_string()
}
