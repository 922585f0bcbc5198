use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub open: String,
    pub close: String,
}

impl TimeRange {
    pub fn new(open: &str, close: &str) -> Self {
        Self {
            open: open.to_string(),
            close: close.to_string(),
        }
    }

    /// Open and close as minutes since midnight, `None` if either is malformed.
    pub fn minutes(&self) -> Option<(u32, u32)> {
        let open = parse_clock(&self.open).ok()?;
        let close = parse_clock(&self.close).ok()?;
        Some((open, close))
    }

    /// Whether `[start, end)` nests entirely inside this range.
    pub fn contains(&self, start: u32, end: u32) -> bool {
        self.minutes()
            .is_some_and(|(open, close)| start >= open && end <= close)
    }
}

/// Opening configuration for one weekday, `day` counted from Sunday (0) to Saturday (6).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessHours {
    pub day: u8,
    pub is_open: bool,
    #[serde(default)]
    pub slots: Vec<TimeRange>,
}

impl BusinessHours {
    pub fn closed(day: u8) -> Self {
        Self {
            day,
            is_open: false,
            slots: vec![],
        }
    }

    pub fn open(day: u8, slots: Vec<TimeRange>) -> Self {
        Self {
            day,
            is_open: true,
            slots,
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.day > 6 {
            return Err(anyhow::anyhow!("invalid weekday: {}", self.day));
        }
        for range in &self.slots {
            let open = parse_clock(&range.open)?;
            let close = parse_clock(&range.close)?;
            if close <= open {
                return Err(anyhow::anyhow!(
                    "range closes before it opens: {}-{}",
                    range.open,
                    range.close
                ));
            }
        }
        Ok(())
    }
}

/// Parses `HH:MM` into minutes since midnight.
pub fn parse_clock(s: &str) -> anyhow::Result<u32> {
    let (hour, minute) = s
        .split_once(':')
        .ok_or_else(|| anyhow::anyhow!("invalid time format: {s}"))?;
    let hour: u32 = hour
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid hour in: {s}"))?;
    let minute: u32 = minute
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid minute in: {s}"))?;
    if hour > 23 || minute > 59 {
        return Err(anyhow::anyhow!("time out of range: {s}"));
    }
    Ok(hour * 60 + minute)
}

pub fn format_clock(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_clock() {
        assert_eq!(parse_clock("08:30").unwrap(), 510);
        assert_eq!(parse_clock("00:00").unwrap(), 0);
        assert_eq!(parse_clock("23:59").unwrap(), 1439);
    }

    #[test]
    fn test_parse_clock_rejects_garbage() {
        assert!(parse_clock("8").is_err());
        assert!(parse_clock("24:00").is_err());
        assert!(parse_clock("12:60").is_err());
        assert!(parse_clock("ab:cd").is_err());
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(510), "08:30");
        assert_eq!(format_clock(1170), "19:30");
    }

    #[test]
    fn test_range_contains() {
        let range = TimeRange::new("08:30", "12:30");
        assert!(range.contains(510, 750));
        assert!(range.contains(690, 750));
        assert!(!range.contains(720, 780));
        assert!(!range.contains(480, 540));
    }

    #[test]
    fn test_malformed_range_contains_nothing() {
        let range = TimeRange::new("8.30", "12:30");
        assert!(!range.contains(600, 630));
    }

    #[test]
    fn test_validate_hours() {
        let ok = BusinessHours::open(2, vec![TimeRange::new("08:30", "12:30")]);
        assert!(ok.validate().is_ok());

        let bad_day = BusinessHours::closed(7);
        assert!(bad_day.validate().is_err());

        let inverted = BusinessHours::open(3, vec![TimeRange::new("12:30", "08:30")]);
        assert!(inverted.validate().is_err());

        let malformed = BusinessHours::open(3, vec![TimeRange::new("25:00", "26:00")]);
        assert!(malformed.validate().is_err());
    }
}
