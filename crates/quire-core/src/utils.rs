use std::time::{SystemTime, UNIX_EPOCH};

/// Get current timestamp in milliseconds.
// u128 millis fits in u64 for realistic timestamps (until year 584942417)
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Convert epoch milliseconds to a date string "YYYY-MM-DD".
// u64 days since epoch fits in i64 for date calculations
#[allow(clippy::cast_possible_wrap)]
pub(crate) fn date_string_from_millis(millis: u64) -> String {
    let days = millis / 86_400_000;
    let mut days = days as i64;
    let mut year = 1970i32;

    loop {
        let days_in_year = if is_leap_year(year) { 366 } else { 365 };
        if days < days_in_year {
            break;
        }
        days -= days_in_year;
        year += 1;
    }

    let days_in_months: [i64; 12] = if is_leap_year(year) {
        [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31]
    } else {
        [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31]
    };

    let mut month = 0;
    for (i, &d) in days_in_months.iter().enumerate() {
        if days < d {
            month = i + 1;
            break;
        }
        days -= d;
    }

    let day = days + 1;
    format!("{year:04}-{month:02}-{day:02}")
}

pub(crate) fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

/// Humanized "Last edited ..." label for recent page subtitles.
/// Cascades day > hour > min > sec; anything under a second is "Now".
pub(crate) fn last_edited_label(now_millis: u64, modified_millis: u64) -> String {
    let elapsed_secs = now_millis.saturating_sub(modified_millis) / 1000;

    let (amount, unit) = if elapsed_secs >= 86_400 {
        (elapsed_secs / 86_400, "day")
    } else if elapsed_secs >= 3600 {
        (elapsed_secs / 3600, "hour")
    } else if elapsed_secs >= 60 {
        (elapsed_secs / 60, "min")
    } else if elapsed_secs >= 1 {
        (elapsed_secs, "sec")
    } else {
        return "Last edited Now.".to_string();
    };

    let plural = if amount == 1 { "" } else { "s" };
    format!("Last edited {amount} {unit}{plural} ago.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_string_from_millis_epoch() {
        assert_eq!(date_string_from_millis(0), "1970-01-01");
    }

    #[test]
    fn test_date_string_from_millis_leap_year() {
        // 2024-02-29 00:00:00 UTC
        assert_eq!(date_string_from_millis(1_709_164_800_000), "2024-02-29");
    }

    #[test]
    fn test_is_leap_year() {
        assert!(is_leap_year(2024));
        assert!(is_leap_year(2000));
        assert!(!is_leap_year(1900));
        assert!(!is_leap_year(2023));
    }

    #[test]
    fn test_last_edited_label_days() {
        let now = 10 * 86_400_000;
        assert_eq!(
            last_edited_label(now, now - 2 * 86_400_000),
            "Last edited 2 days ago."
        );
        assert_eq!(
            last_edited_label(now, now - 86_400_000),
            "Last edited 1 day ago."
        );
    }

    #[test]
    fn test_last_edited_label_cascade() {
        let now = 86_400_000;
        assert_eq!(
            last_edited_label(now, now - 3_600_000),
            "Last edited 1 hour ago."
        );
        assert_eq!(
            last_edited_label(now, now - 120_000),
            "Last edited 2 mins ago."
        );
        assert_eq!(
            last_edited_label(now, now - 5000),
            "Last edited 5 secs ago."
        );
        assert_eq!(last_edited_label(now, now), "Last edited Now.");
    }

    #[test]
    fn test_last_edited_label_future_timestamp() {
        // Clock skew: modified in the future reads as "Now"
        assert_eq!(last_edited_label(1000, 5000), "Last edited Now.");
    }
}
