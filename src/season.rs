use chrono::{Datelike, NaiveDate};

/// Day-of-year threshold splitting a calendar year between two seasons.
/// Days before it belong to the season that began the previous year.
pub const SEASON_BOUNDARY_DAY: u32 = 200;

/// Season a date belongs to, named by the calendar year the season begins.
///
/// Jan-Jul dates fall in the season that started the year before; Aug-Dec
/// dates start a new season in their own year.
pub fn season_id(year: i32, day_of_year: u32) -> i32 {
    if day_of_year < SEASON_BOUNDARY_DAY {
        year - 1
    } else {
        year
    }
}

/// Position of a date within its season.
///
/// Front-half days (before the boundary) keep their day-of-year; back-half
/// days are shifted down by the length of their calendar year, landing in
/// the negative range so they sort before the following January.
pub fn season_day(day_of_year: u32, is_leap_year: bool) -> i32 {
    let day = day_of_year as i32;
    if day_of_year < SEASON_BOUNDARY_DAY {
        day
    } else if is_leap_year {
        day - 366
    } else {
        day - 365
    }
}

/// Maps a calendar date onto the season axis. Total over all valid dates.
pub fn align(date: NaiveDate) -> (i32, i32) {
    let day_of_year = date.ordinal();
    (
        season_id(date.year(), day_of_year),
        season_day(day_of_year, date.leap_year()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_front_half_keeps_day_of_year() {
        // 2021-01-15 is day 15, so it belongs to the 2020 season.
        assert_eq!(align(date(2021, 1, 15)), (2020, 15));
        assert_eq!(align(date(2021, 7, 18)), (2020, 199)); // last day before the boundary
    }

    #[test]
    fn test_back_half_shifts_by_year_length() {
        // 2020-08-05 is day 218 of a leap year: 218 - 366 = -148.
        assert_eq!(align(date(2020, 8, 5)), (2020, -148));
        // 2021-08-05 is day 217 of a common year: 217 - 365 = -148.
        assert_eq!(align(date(2021, 8, 5)), (2021, -148));
    }

    #[test]
    fn test_boundary_day_starts_new_season() {
        // Day 200 of 2021 is July 19.
        assert_eq!(date(2021, 7, 19).ordinal(), 200);
        assert_eq!(align(date(2021, 7, 19)), (2021, -165));
    }

    #[test]
    fn test_december_31_aligns_regardless_of_leap() {
        // Last day of the year maps to season day 0 in both year lengths.
        assert_eq!(align(date(2020, 12, 31)), (2020, 0));
        assert_eq!(align(date(2021, 12, 31)), (2021, 0));
    }

    #[test]
    fn test_season_days_sort_chronologically_within_season() {
        // Aug 2020 through Jul 2021 is one season; season days must be
        // strictly increasing along it.
        let dates = [
            date(2020, 8, 1),
            date(2020, 10, 15),
            date(2020, 12, 31),
            date(2021, 1, 1),
            date(2021, 3, 20),
            date(2021, 7, 18),
        ];
        let days: Vec<i32> = dates
            .iter()
            .map(|d| {
                let (id, day) = align(*d);
                assert_eq!(id, 2020);
                day
            })
            .collect();
        assert!(days.windows(2).all(|w| w[0] < w[1]));
    }
}
