use crate::model::{Error, Result};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

const ISO_DATE: &str = "%Y-%m-%d";

/// The date range every correlation filter is scoped to.
///
/// Membership tests compare ISO-8601 strings lexicographically and strictly
/// against the bound dates. A plain date (`2018-01-15`) must therefore lie
/// strictly between the bounds, while a timestamp on the start day
/// (`2017-11-01T09:00:00.000+0000`) sorts after `2017-11-01` and is kept, and
/// one on the end day sorts after the end bound and is dropped.
#[derive(Debug, Clone, Eq, Hash, PartialEq)]
pub struct ReportWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
    start_iso: String,
    end_iso: String,
}

// Create
impl ReportWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start >= end {
            return Err(Error::Config(format!(
                "Report window start {} must be before end {}",
                start, end
            )));
        }
        Ok(Self {
            start,
            end,
            start_iso: start.format(ISO_DATE).to_string(),
            end_iso: end.format(ISO_DATE).to_string(),
        })
    }

    pub fn parse(start: &str, end: &str) -> Result<Self> {
        let parse = |value: &str| {
            NaiveDate::parse_from_str(value, ISO_DATE)
                .map_err(|_| Error::Config(format!("Not a valid date: {}", value)))
        };
        Self::new(parse(start)?, parse(end)?)
    }
}

// Bounds
impl ReportWindow {
    pub fn start_iso(&self) -> &str {
        &self.start_iso
    }

    pub fn end_iso(&self) -> &str {
        &self.end_iso
    }

    /// First instant of the start day, inclusive.
    pub fn since(&self) -> DateTime<Utc> {
        self.start.and_time(NaiveTime::default()).and_utc()
    }

    /// First instant of the end day, exclusive.
    pub fn until(&self) -> DateTime<Utc> {
        self.end.and_time(NaiveTime::default()).and_utc()
    }
}

// Membership
impl ReportWindow {
    pub fn contains(&self, value: &str) -> bool {
        value > self.start_iso.as_str() && value < self.end_iso.as_str()
    }

    pub fn contains_opt(&self, value: Option<&str>) -> bool {
        value.is_some_and(|value| self.contains(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn window() -> ReportWindow {
        ReportWindow::parse("2017-11-01", "2018-04-06").unwrap()
    }

    #[test]
    fn rejects_empty_or_inverted_window() {
        assert!(ReportWindow::parse("2018-04-06", "2017-11-01").is_err());
        assert!(ReportWindow::parse("2018-04-06", "2018-04-06").is_err());
        assert!(ReportWindow::parse("Nov 1 2017", "2018-04-06").is_err());
    }

    #[test]
    fn plain_dates_must_be_strictly_inside() {
        let window = window();
        assert!(window.contains("2017-11-02"));
        assert!(window.contains("2018-04-05"));
        assert!(!window.contains("2017-11-01"));
        assert!(!window.contains("2018-04-06"));
        assert!(!window.contains("2017-10-31"));
    }

    #[test]
    fn timestamps_are_start_inclusive_end_exclusive() {
        let window = window();
        assert!(window.contains("2017-11-01T00:00:00.000+0000"));
        assert!(window.contains("2018-04-05T23:59:59.000+0000"));
        assert!(!window.contains("2018-04-06T00:00:00.000+0000"));
        assert!(!window.contains_opt(None));
    }

    #[test]
    fn commit_bounds_are_utc_midnights() {
        let window = window();
        assert_eq!(window.since(), Utc.with_ymd_and_hms(2017, 11, 1, 0, 0, 0).unwrap());
        assert_eq!(window.until(), Utc.with_ymd_and_hms(2018, 4, 6, 0, 0, 0).unwrap());
    }
}
