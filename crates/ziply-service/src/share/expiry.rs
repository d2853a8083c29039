//! Expiry policy.

use chrono::{DateTime, Utc};

use ziply_entity::share::ExpiryDuration;

/// Absolute expiry for a share created at `now` with the given duration
/// keyword. Unknown or missing keywords mean one day.
pub fn calculate_expiry(keyword: Option<&str>, now: DateTime<Utc>) -> DateTime<Utc> {
    ExpiryDuration::parse(keyword).expires_from(now)
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn test_offsets() {
        let now = Utc::now();
        let cases = [
            (Some("10m"), Duration::minutes(10)),
            (Some("1h"), Duration::hours(1)),
            (Some("1d"), Duration::days(1)),
            (Some("7d"), Duration::days(7)),
            (Some("forever"), Duration::days(1)),
            (None, Duration::days(1)),
        ];
        for (keyword, offset) in cases {
            assert_eq!(calculate_expiry(keyword, now), now + offset, "{keyword:?}");
        }
    }
}
