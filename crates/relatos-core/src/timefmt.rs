use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// Render seconds as `MM:SS`, or `HH:MM:SS` once past the first hour.
pub fn format_timestamp(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    if hours > 0 {
        format!("{hours:02}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes:02}:{secs:02}")
    }
}

pub fn format_rfc3339(ts: OffsetDateTime) -> String {
    ts.format(&Rfc3339)
        .expect("RFC3339 formatting should not fail")
}

pub fn now_rfc3339() -> String {
    format_rfc3339(OffsetDateTime::now_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_and_long_timestamps() {
        assert_eq!(format_timestamp(0.0), "00:00");
        assert_eq!(format_timestamp(95.9), "01:35");
        assert_eq!(format_timestamp(3599.0), "59:59");
        assert_eq!(format_timestamp(3725.0), "01:02:05");
    }

    #[test]
    fn rfc3339_of_epoch() {
        assert_eq!(
            format_rfc3339(OffsetDateTime::UNIX_EPOCH),
            "1970-01-01T00:00:00Z"
        );
    }
}
