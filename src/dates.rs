//! Month arithmetic used by the calendar: weekday of the 1st, month
//! lengths and rolling month numbers used for next/previous navigation.

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    #[error("invalid month {0}, enter a value between 1 and 12")]
    InvalidMonth(i32),
    #[error("invalid month name: {0}")]
    UnknownMonthName(String),
}

pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Day of the week the month starts on, 0 = Sunday.
///
/// Sakamoto's method over the proleptic Gregorian calendar; `month` must
/// be in 1..=12.
pub fn weekday_of_first(year: i32, month: u32) -> u32 {
    const OFFSETS: [i32; 12] = [0, 3, 2, 5, 0, 3, 5, 1, 4, 6, 2, 4];
    let idx = (month.clamp(1, 12) - 1) as usize;
    let y = if month < 3 { year - 1 } else { year };
    let sum = y + y.div_euclid(4) - y.div_euclid(100) + y.div_euclid(400) + OFFSETS[idx] + 1;
    sum.rem_euclid(7) as u32
}

/// Resolves a rolling month number against `current_year`.
///
/// 1..=12 are the months of `current_year`, 13 is January of the next
/// year, 24 is December of the next year. Anything below 1 is rejected.
pub fn normalize(month_number: i32, current_year: i32) -> Result<(i32, u32), DateError> {
    if month_number < 1 {
        return Err(DateError::InvalidMonth(month_number));
    }
    let zero_based = month_number - 1;
    let year = current_year + zero_based / 12;
    let month = (zero_based % 12) as u32 + 1;
    Ok((year, month))
}

pub fn month_from_name(name: &str) -> Result<u32, DateError> {
    let wanted = name.trim().to_lowercase();
    MONTH_NAMES
        .iter()
        .position(|m| m.to_lowercase() == wanted)
        .map(|idx| idx as u32 + 1)
        .ok_or_else(|| DateError::UnknownMonthName(name.trim().to_string()))
}

pub fn month_name(month: u32) -> &'static str {
    MONTH_NAMES
        .get((month as usize).wrapping_sub(1))
        .copied()
        .unwrap_or("Unknown")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, NaiveDate};

    #[test]
    fn february_follows_the_leap_year_rule() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2000, 2), 29);
        assert_eq!(days_in_month(1900, 2), 28);
    }

    #[test]
    fn month_lengths_match_the_table() {
        let expected = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
        for (idx, days) in expected.iter().enumerate() {
            assert_eq!(days_in_month(2023, idx as u32 + 1), *days);
        }
    }

    #[test]
    fn weekday_of_first_agrees_with_chrono() {
        for year in [1899, 1900, 1970, 1999, 2000, 2023, 2024, 2025, 2026, 2100] {
            for month in 1..=12 {
                let first = NaiveDate::from_ymd_opt(year, month, 1).expect("valid date");
                assert_eq!(
                    weekday_of_first(year, month),
                    first.weekday().num_days_from_sunday(),
                    "{year}-{month}"
                );
            }
        }
    }

    #[test]
    fn known_month_starts() {
        // June 2025 starts on a Sunday, March 2026 on a Sunday, October 2026 on a Thursday.
        assert_eq!(weekday_of_first(2025, 6), 0);
        assert_eq!(weekday_of_first(2026, 3), 0);
        assert_eq!(weekday_of_first(2026, 10), 4);
    }

    #[test]
    fn normalize_rolls_into_following_years() {
        assert_eq!(normalize(1, 2026), Ok((2026, 1)));
        assert_eq!(normalize(12, 2026), Ok((2026, 12)));
        assert_eq!(normalize(13, 2026), Ok((2027, 1)));
        assert_eq!(normalize(24, 2026), Ok((2027, 12)));
        assert_eq!(normalize(25, 2026), Ok((2028, 1)));
    }

    #[test]
    fn normalize_rejects_zero_and_negative() {
        assert_eq!(normalize(0, 2026), Err(DateError::InvalidMonth(0)));
        assert_eq!(normalize(-3, 2026), Err(DateError::InvalidMonth(-3)));
    }

    #[test]
    fn month_names_are_case_insensitive() {
        assert_eq!(month_from_name("march"), Ok(3));
        assert_eq!(month_from_name("DECEMBER"), Ok(12));
        assert_eq!(
            month_from_name("smarch"),
            Err(DateError::UnknownMonthName("smarch".into()))
        );
        assert_eq!(month_name(6), "June");
        assert_eq!(month_name(0), "Unknown");
    }
}
