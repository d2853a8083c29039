//! Share lifetime keywords.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Supported share lifetimes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ExpiryDuration {
    /// Ten minutes (`10m`).
    #[serde(rename = "10m")]
    TenMinutes,
    /// One hour (`1h`).
    #[serde(rename = "1h")]
    OneHour,
    /// One day (`1d`).
    #[default]
    #[serde(rename = "1d")]
    OneDay,
    /// Seven days (`7d`).
    #[serde(rename = "7d")]
    SevenDays,
}

impl ExpiryDuration {
    /// Map a duration keyword. Absent or unrecognized keywords fall back to
    /// one day rather than failing.
    pub fn parse(keyword: Option<&str>) -> Self {
        match keyword {
            Some("10m") => Self::TenMinutes,
            Some("1h") => Self::OneHour,
            Some("7d") => Self::SevenDays,
            _ => Self::OneDay,
        }
    }

    /// The keyword for this duration.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TenMinutes => "10m",
            Self::OneHour => "1h",
            Self::OneDay => "1d",
            Self::SevenDays => "7d",
        }
    }

    /// Offset added to the creation time.
    pub fn offset(&self) -> Duration {
        match self {
            Self::TenMinutes => Duration::minutes(10),
            Self::OneHour => Duration::hours(1),
            Self::OneDay => Duration::hours(24),
            Self::SevenDays => Duration::days(7),
        }
    }

    /// Absolute expiry for a share created at `now`.
    pub fn expires_from(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now + self.offset()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_keywords() {
        let now = Utc::now();
        assert_eq!(
            ExpiryDuration::parse(Some("10m")).expires_from(now) - now,
            Duration::minutes(10)
        );
        assert_eq!(
            ExpiryDuration::parse(Some("1h")).expires_from(now) - now,
            Duration::hours(1)
        );
        assert_eq!(
            ExpiryDuration::parse(Some("1d")).expires_from(now) - now,
            Duration::hours(24)
        );
        assert_eq!(
            ExpiryDuration::parse(Some("7d")).expires_from(now) - now,
            Duration::days(7)
        );
    }

    #[test]
    fn test_unknown_keyword_falls_back_to_one_day() {
        assert_eq!(ExpiryDuration::parse(Some("3y")), ExpiryDuration::OneDay);
        assert_eq!(ExpiryDuration::parse(Some("")), ExpiryDuration::OneDay);
        assert_eq!(ExpiryDuration::parse(None), ExpiryDuration::OneDay);
    }
}
