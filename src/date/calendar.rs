//! Pure calendar arithmetic over a millisecond-since-epoch instant.
//!
//! Every function here is a direct transcription of one ECMAScript
//! "Time Related Calculations" abstract operation. They take and return
//! plain `f64`, propagate NaN as the "invalid instant" sentinel, and do not
//! touch a clock, a timezone, or a locale; that is [`super::local`] and
//! [`super::format`]'s job.

use super::mathutil::floor;

pub const MS_PER_SECOND: f64 = 1_000.0;
pub const MS_PER_MINUTE: f64 = 60_000.0;
pub const MS_PER_HOUR: f64 = 3_600_000.0;
pub const MS_PER_DAY: f64 = 86_400_000.0;

/// Cumulative day count at the start of each month, non-leap year.
const CUM_DAYS: [u16; 13] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334, 365];
/// Same, leap year (February gains a day, every later month shifts by one).
const CUM_DAYS_LEAP: [u16; 13] = [0, 31, 60, 91, 121, 152, 182, 213, 244, 274, 305, 335, 366];

/// A fully decomposed instant. `year` is unclamped and may be negative;
/// `weekday` is `0` (Sunday) through `6` (Saturday).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrokenDownTime {
    pub year: i64,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub min: u8,
    pub sec: u8,
    pub msec: u16,
    pub weekday: u8,
}

/// Euclidean modulo with the ECMAScript sign convention: the result has
/// the same sign as `b` (here always positive), so it is always in
/// `[0, b)` regardless of the sign of `a`.
fn modulo(a: f64, b: f64) -> f64 {
    let r = a - b * floor(a / b);
    if r == 0.0 {
        0.0
    } else {
        r
    }
}

pub fn day(t: f64) -> f64 {
    floor(t / MS_PER_DAY)
}

pub fn time_within_day(t: f64) -> f64 {
    modulo(t, MS_PER_DAY)
}

pub fn is_leap_year(y: i64) -> bool {
    (y % 4 == 0 && y % 100 != 0) || y % 400 == 0
}

pub fn days_in_year(y: i64) -> i64 {
    if is_leap_year(y) {
        366
    } else {
        365
    }
}

pub fn day_from_year(y: i64) -> i64 {
    365 * (y - 1970) + (y - 1969).div_euclid(4) - (y - 1901).div_euclid(100) + (y - 1601).div_euclid(400)
}

pub fn time_from_year(y: i64) -> f64 {
    MS_PER_DAY * day_from_year(y) as f64
}

/// Bisection search for the unique `y` with `TimeFromYear(y) <= t <
/// TimeFromYear(y + 1)`. The `/366` and `/365` estimates bracket the true
/// year to within a couple of days' worth of slop, which the expansion
/// loops below correct for before bisecting.
pub fn year_from_time(t: f64) -> i64 {
    let d = day(t);
    let est_lo = floor(d / 366.0) as i64 + 1970;
    let est_hi = floor(d / 365.0) as i64 + 1970;
    let (mut lo, mut hi) = if est_lo <= est_hi { (est_lo, est_hi) } else { (est_hi, est_lo) };
    lo -= 2;
    hi += 2;
    while time_from_year(lo) > t {
        lo -= 1;
    }
    while time_from_year(hi + 1) <= t {
        hi += 1;
    }
    while lo < hi {
        let mid = lo + (hi - lo + 1) / 2;
        if time_from_year(mid) <= t {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }
    lo
}

fn cum_days(leap: bool) -> &'static [u16; 13] {
    if leap {
        &CUM_DAYS_LEAP
    } else {
        &CUM_DAYS
    }
}

fn day_within_year(t: f64) -> i64 {
    day(t) as i64 - day_from_year(year_from_time(t))
}

fn month_from_day_within_year(day_in_year: i64, leap: bool) -> u8 {
    let table = cum_days(leap);
    let mut m = 0usize;
    while m < 11 && day_in_year as u16 >= table[m + 1] {
        m += 1;
    }
    m as u8
}

pub fn month_from_time(t: f64) -> u8 {
    let leap = is_leap_year(year_from_time(t));
    month_from_day_within_year(day_within_year(t), leap)
}

pub fn date_from_time(t: f64) -> u8 {
    let leap = is_leap_year(year_from_time(t));
    let day_in_year = day_within_year(t);
    let month = month_from_day_within_year(day_in_year, leap);
    (day_in_year - cum_days(leap)[month as usize] as i64 + 1) as u8
}

/// Days in `month` (0-based) for `year`, accounting for leap February.
pub fn days_in_month(year: i64, month: u8) -> u8 {
    let table = cum_days(is_leap_year(year));
    (table[month as usize + 1] - table[month as usize]) as u8
}

/// 1970-01-01 was a Thursday (weekday 4).
pub fn week_day(t: f64) -> u8 {
    modulo(day(t) + 4.0, 7.0) as u8
}

pub fn hour_from_time(t: f64) -> u8 {
    modulo(floor(t / MS_PER_HOUR), 24.0) as u8
}

pub fn min_from_time(t: f64) -> u8 {
    modulo(floor(t / MS_PER_MINUTE), 60.0) as u8
}

pub fn sec_from_time(t: f64) -> u8 {
    modulo(floor(t / MS_PER_SECOND), 60.0) as u8
}

pub fn ms_from_time(t: f64) -> u16 {
    modulo(t, 1_000.0) as u16
}

pub fn make_time(h: f64, m: f64, s: f64, ms: f64) -> f64 {
    if !h.is_finite() || !m.is_finite() || !s.is_finite() || !ms.is_finite() {
        return f64::NAN;
    }
    ((h * 60.0 + m) * 60.0 + s) * 1_000.0 + ms
}

/// `month` is not pre-normalized: callers pass raw, possibly out-of-range
/// month numbers (e.g. `13` for "next January"), which this function
/// folds back into `year` before looking up day tables.
pub fn make_day(year: f64, month: f64, date: f64) -> f64 {
    if !year.is_finite() || !month.is_finite() || !date.is_finite() {
        return f64::NAN;
    }
    let normalized_year = year + floor(month / 12.0);
    if normalized_year.abs() > 275_000.0 {
        return f64::NAN;
    }
    let normalized_month = modulo(month, 12.0) as u8;
    let y = normalized_year as i64;
    let day_no = floor(time_from_year(y) / MS_PER_DAY);
    let first = cum_days(is_leap_year(y))[normalized_month as usize] as f64;
    day_no + first + date - 1.0
}

pub fn make_date(day: f64, time: f64) -> f64 {
    if !day.is_finite() || !time.is_finite() {
        return f64::NAN;
    }
    day * MS_PER_DAY + time
}

/// Decompose a valid instant. Returns `None` for NaN/infinite input rather
/// than panicking: invalid-in, invalid-out is the contract the rest of
/// the date subsystem relies on.
pub fn break_down(t: f64) -> Option<BrokenDownTime> {
    if !t.is_finite() {
        return None;
    }
    Some(BrokenDownTime {
        year: year_from_time(t),
        month: month_from_time(t),
        day: date_from_time(t),
        hour: hour_from_time(t),
        min: min_from_time(t),
        sec: sec_from_time(t),
        msec: ms_from_time(t),
        weekday: week_day(t),
    })
}

/// Inverse of [`break_down`]: rebuild an instant from calendar fields.
pub fn make_instant(year: f64, month: f64, date: f64, hour: f64, min: f64, sec: f64, ms: f64) -> f64 {
    make_date(make_day(year, month, date), make_time(hour, min, sec, ms))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_from_time_epoch_is_1970() {
        assert_eq!(year_from_time(0.0), 1970);
    }

    #[test]
    fn week_day_epoch_is_thursday() {
        assert_eq!(week_day(0.0), 4);
    }

    #[test]
    fn leap_day_2016_matches_known_day_count() {
        // 2016 is a leap year; 2016-02-29 is day 16_860 from the epoch.
        assert_eq!(make_day(2016.0, 1.0, 29.0), 16_860.0);
    }

    #[test]
    fn make_day_normalizes_overflowing_month() {
        // Month 12 (0-based) rolls into next January.
        let rolled = make_day(2020.0, 12.0, 1.0);
        let plain = make_day(2021.0, 0.0, 1.0);
        assert_eq!(rolled, plain);
    }

    #[test]
    fn round_trip_through_break_down_and_make_instant() {
        for year in [1, 1969, 1970, 1971, 2000, 2024, 2100, 10_000, 275_000] {
            for month in 0..12 {
                let day_count = days_in_month(year, month);
                for day in [1u8, day_count] {
                    let t = make_instant(year as f64, month as f64, day as f64, 12.0, 34.0, 56.0, 789.0);
                    let bd = break_down(t).expect("constructed instant must be finite");
                    assert_eq!(bd.year, year, "year mismatch for {}-{}-{}", year, month, day);
                    assert_eq!(bd.month, month);
                    assert_eq!(bd.day, day);
                    assert_eq!(bd.hour, 12);
                    assert_eq!(bd.min, 34);
                    assert_eq!(bd.sec, 56);
                    assert_eq!(bd.msec, 789);
                }
            }
        }
    }

    #[test]
    fn negative_years_are_supported() {
        let t = make_instant(-5.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0);
        let bd = break_down(t).unwrap();
        assert_eq!(bd.year, -5);
        assert_eq!(bd.month, 0);
        assert_eq!(bd.day, 1);
    }

    #[test]
    fn invalid_input_yields_none() {
        assert!(break_down(f64::NAN).is_none());
        assert!(break_down(f64::INFINITY).is_none());
    }
}
