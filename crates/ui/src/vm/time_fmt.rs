use chrono::{DateTime, Utc};

/// Wall-clock time of day, `HH:MM:SS` in UTC.
#[must_use]
pub fn format_clock_time(value: DateTime<Utc>) -> String {
    value.format("%H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use practice_core::time::fixed_now;

    #[test]
    fn formats_time_of_day() {
        assert_eq!(format_clock_time(fixed_now()), "22:13:20");
    }
}
