use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex_lite::Regex;

use crate::application::errors::ServiceError;

static WINDOW_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2}):(\d{1,2})-(\d{1,2}):(\d{1,2})$").unwrap());

/// Wall-clock time of day with minute precision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeOfDay {
    pub hour: u8,
    pub minute: u8,
}

impl TimeOfDay {
    pub fn new(hour: u8, minute: u8) -> Result<Self, ServiceError> {
        if hour > 23 {
            return Err(ServiceError::InvalidSyntax(format!(
                "hour {} out of range",
                hour
            )));
        }
        if minute > 59 {
            return Err(ServiceError::InvalidSyntax(format!(
                "minute {} out of range",
                minute
            )));
        }
        Ok(Self { hour, minute })
    }

    pub fn minutes_since_midnight(&self) -> u32 {
        u32::from(self.hour) * 60 + u32::from(self.minute)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Daily on/off window. Start must not be later than end, compared by
/// minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleWindow {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl fmt::Display for ScheduleWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

impl FromStr for ScheduleWindow {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = WINDOW_RE.captures(s.trim()).ok_or_else(|| {
            ServiceError::InvalidSyntax("no start/end time matched, expected HH:MM-HH:MM".to_string())
        })?;

        let field = |idx: usize| -> Result<u8, ServiceError> {
            caps.get(idx)
                .and_then(|m| m.as_str().parse().ok())
                .ok_or_else(|| ServiceError::InvalidSyntax("expected HH:MM-HH:MM".to_string()))
        };

        let start = TimeOfDay::new(field(1)?, field(2)?)?;
        let end = TimeOfDay::new(field(3)?, field(4)?)?;

        if start.minutes_since_midnight() > end.minutes_since_midnight() {
            return Err(ServiceError::InvalidRange(format!(
                "start {} is after end {}",
                start, end
            )));
        }

        Ok(Self { start, end })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_digit_hours() {
        let window: ScheduleWindow = "9:00-18:30".parse().unwrap();
        assert_eq!(window.start, TimeOfDay { hour: 9, minute: 0 });
        assert_eq!(window.end, TimeOfDay { hour: 18, minute: 30 });
    }

    #[test]
    fn start_may_equal_end() {
        assert!("12:00-12:00".parse::<ScheduleWindow>().is_ok());
    }

    #[test]
    fn rejects_inverted_window() {
        let err = "20:00-08:00".parse::<ScheduleWindow>().unwrap_err();
        assert!(matches!(err, ServiceError::InvalidRange(_)));
    }

    #[test]
    fn rejects_out_of_range_fields() {
        assert!("25:00-26:00".parse::<ScheduleWindow>().is_err());
        assert!("10:70-11:00".parse::<ScheduleWindow>().is_err());
    }

    #[test]
    fn rejects_garbage() {
        assert!("soon-later".parse::<ScheduleWindow>().is_err());
        assert!("9:00".parse::<ScheduleWindow>().is_err());
    }
}
