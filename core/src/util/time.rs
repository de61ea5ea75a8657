use chrono::{DateTime, Local, TimeZone};

/// Wall-clock stamp used as the prefix of every frame log record: `HH:MM:SS.mmm`.
pub fn clock_stamp() -> String {
    format_stamp(&Local::now())
}

pub fn format_stamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format("%H:%M:%S%.3f").to_string()
}
