//! Object glue: value coercion and the `Date` value surface.
//!
//! Everything here operates on a bare instant (`f64`) plus whatever host
//! collaborators a given operation needs, rather than on a concrete
//! engine value. The embedding engine is expected to wrap that instant in
//! its own object/property-table representation, which is out of scope
//! here (see the crate-level docs).

use alloc::string::String;

use super::calendar::{self, break_down, BrokenDownTime};
use super::format;
use super::local::{self, TimeZoneSource};
use super::mathutil;
use super::parse::{self, HostDateParser};
use crate::error::{JsError, JsResult};

/// A decoded primitive, the result of a host's `ToPrimitive` on a value
/// that might be an object. Engines typically prefer a "Number" hint when
/// coercing a `Date` constructor argument other than a string; this type
/// only carries the three JS primitive kinds coercion actually branches
/// on.
pub enum Primitive {
    Number(f64),
    Boolean(bool),
    Str(String),
}

/// Opaque host value handle. An engine's concrete value type implements
/// this once; everything in this module is generic over it rather than
/// naming the engine's value enum directly.
pub trait HostValue {
    fn to_primitive(&self) -> Primitive;
}

/// Host wall-clock source for the zero-argument constructor and `Date.now`.
pub trait NowSource {
    fn now_millis(&self) -> f64;
}

/// Coerce any JS value to a (possibly invalid) instant.
pub fn value_to_instant<V: HostValue>(v: &V) -> f64 {
    match v.to_primitive() {
        Primitive::Number(n) => number_to_instant(n),
        Primitive::Boolean(b) => {
            if b {
                1.0
            } else {
                0.0
            }
        }
        Primitive::Str(s) => string_to_instant(&s),
    }
}

fn number_to_instant(n: f64) -> f64 {
    if !n.is_finite() {
        return f64::NAN;
    }
    mathutil::trunc(n)
}

/// Base-10 integer parse; any trailing non-digit makes the whole value
/// invalid (this is deliberately stricter than `str::parse`, which would
/// accept leading/trailing whitespace `f64` wouldn't).
fn string_to_instant(s: &str) -> f64 {
    let bytes = s.as_bytes();
    if bytes.is_empty() {
        return f64::NAN;
    }
    let (sign, digits) = match bytes[0] {
        b'+' => (1.0, &bytes[1..]),
        b'-' => (-1.0, &bytes[1..]),
        _ => (1.0, bytes),
    };
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return f64::NAN;
    }
    let mut value = 0.0f64;
    for &b in digits {
        value = value * 10.0 + (b - b'0') as f64;
    }
    sign * value
}

/// Constructor dispatch, zero arguments: the current instant.
pub fn construct_now<C: NowSource>(clock: &C) -> f64 {
    clock.now_millis()
}

/// Constructor dispatch, one string argument.
pub fn construct_from_string<P: HostDateParser, Z: TimeZoneSource>(s: &str, host_parser: Option<&P>, zone: &Z) -> f64 {
    parse::parse(s, host_parser, zone)
}

/// Constructor dispatch, one non-string argument.
pub fn construct_from_value<V: HostValue>(v: &V) -> f64 {
    value_to_instant(v)
}

/// Constructor dispatch, two or more arguments. `day` defaults to 1
/// when not supplied; a 2-digit `year` in `[0, 99]` is lifted to
/// `1900 + year`. Fields are interpreted as local time, per the host's
/// timezone, and converted to a UTC instant.
pub fn construct_from_fields<Z: TimeZoneSource>(
    zone: &Z,
    year: f64,
    month: f64,
    day: Option<f64>,
    hour: f64,
    min: f64,
    sec: f64,
    ms: f64,
) -> f64 {
    let year = lift_two_digit_year(year);
    let day = day.unwrap_or(1.0);
    let local = calendar::make_instant(year, month, day, hour, min, sec, ms);
    local::utc(zone, local)
}

fn lift_two_digit_year(year: f64) -> f64 {
    if year.is_finite() {
        let truncated = mathutil::trunc(year);
        if (0.0..=99.0).contains(&truncated) {
            return 1900.0 + truncated;
        }
    }
    year
}

/// Static `Date.UTC(...)`: fields are interpreted directly as UTC, unlike
/// [`construct_from_fields`] which treats them as local time.
pub fn construct_utc_from_fields(
    year: f64,
    month: f64,
    day: Option<f64>,
    hour: f64,
    min: f64,
    sec: f64,
    ms: f64,
) -> f64 {
    let year = lift_two_digit_year(year);
    let day = day.unwrap_or(1.0);
    calendar::make_instant(year, month, day, hour, min, sec, ms)
}

/// `getTime()` / `valueOf()`: both just expose the raw instant.
pub fn get_time(t: f64) -> f64 {
    t
}

/// `setTime(v)`: replace the instant outright, after the usual
/// number-to-instant coercion.
pub fn set_time(v: f64) -> f64 {
    number_to_instant(v)
}

fn broken_down_for_field_read<Z: TimeZoneSource>(zone: &Z, t: f64, utc: bool) -> Option<BrokenDownTime> {
    break_down(if utc { t } else { local::local_time(zone, t) })
}

macro_rules! field_getter {
    ($name:ident, $utc_name:ident, $field:ident, $as_ty:ty) => {
        pub fn $name<Z: TimeZoneSource>(zone: &Z, t: f64) -> f64 {
            match broken_down_for_field_read(zone, t, false) {
                Some(bd) => bd.$field as $as_ty as f64,
                None => f64::NAN,
            }
        }

        pub fn $utc_name(t: f64) -> f64 {
            match break_down(t) {
                Some(bd) => bd.$field as $as_ty as f64,
                None => f64::NAN,
            }
        }
    };
}

field_getter!(get_full_year, get_utc_full_year, year, i64);
field_getter!(get_month, get_utc_month, month, u8);
field_getter!(get_date, get_utc_date, day, u8);
field_getter!(get_day, get_utc_day, weekday, u8);
field_getter!(get_hours, get_utc_hours, hour, u8);
field_getter!(get_minutes, get_utc_minutes, min, u8);
field_getter!(get_seconds, get_utc_seconds, sec, u8);
field_getter!(get_milliseconds, get_utc_milliseconds, msec, u16);

/// `setFullYear`/`setUTCFullYear` and friends all reduce to patching a
/// single field and rebuilding through [`apply_patch`]; this one function
/// per named setter just builds the one-field patch.
macro_rules! field_setter {
    ($name:ident, $utc_name:ident, $patch_field:ident) => {
        pub fn $name<Z: TimeZoneSource>(zone: &Z, t: f64, value: f64) -> f64 {
            let patch = FieldPatch { $patch_field: Some(value), ..Default::default() };
            apply_patch(zone, t, &patch, false)
        }

        pub fn $utc_name<Z: TimeZoneSource>(zone: &Z, t: f64, value: f64) -> f64 {
            let patch = FieldPatch { $patch_field: Some(value), ..Default::default() };
            apply_patch(zone, t, &patch, true)
        }
    };
}

field_setter!(set_full_year, set_utc_full_year, year);
field_setter!(set_month, set_utc_month, month);
field_setter!(set_date, set_utc_date, day);
field_setter!(set_hours, set_utc_hours, hour);
field_setter!(set_minutes, set_utc_minutes, min);
field_setter!(set_seconds, set_utc_seconds, sec);
field_setter!(set_milliseconds, set_utc_milliseconds, ms);

/// Named fields a partial setter may supply; absent fields keep their
/// current value.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldPatch {
    pub year: Option<f64>,
    pub month: Option<f64>,
    pub day: Option<f64>,
    pub hour: Option<f64>,
    pub min: Option<f64>,
    pub sec: Option<f64>,
    pub ms: Option<f64>,
}

const EPOCH_BROKEN_DOWN: BrokenDownTime =
    BrokenDownTime { year: 1970, month: 0, day: 1, hour: 0, min: 0, sec: 0, msec: 0, weekday: 4 };

/// Apply `patch` to `current_utc` and rebuild the instant.
///
/// `utc` selects which flavor of setter this is: `true` patches fields
/// read directly off the UTC instant (`setUTCFullYear` and friends);
/// `false` decomposes through local time first and recombines through
/// `UTC()` (`setFullYear` and friends). If `current_utc` is invalid and
/// no `year` is supplied there is nothing to anchor the rebuild to, so the
/// result stays invalid; supplying `year` on an invalid date anchors the
/// other unset fields to the epoch, mirroring how `setFullYear` is the
/// one setter usable to establish a first valid value.
pub fn apply_patch<Z: TimeZoneSource>(zone: &Z, current_utc: f64, patch: &FieldPatch, utc: bool) -> f64 {
    let decompose_base = if utc { current_utc } else { local::local_time(zone, current_utc) };
    let bd = match break_down(decompose_base) {
        Some(bd) => bd,
        None if patch.year.is_some() => EPOCH_BROKEN_DOWN,
        None => return f64::NAN,
    };

    let year = patch.year.unwrap_or(bd.year as f64);
    let month = patch.month.unwrap_or(bd.month as f64);
    let day = patch.day.unwrap_or(bd.day as f64);
    let hour = patch.hour.unwrap_or(bd.hour as f64);
    let min = patch.min.unwrap_or(bd.min as f64);
    let sec = patch.sec.unwrap_or(bd.sec as f64);
    let ms = patch.ms.unwrap_or(bd.msec as f64);
    let rebuilt = calendar::make_instant(year, month, day, hour, min, sec, ms);
    if utc {
        rebuilt
    } else {
        local::utc(zone, rebuilt)
    }
}

/// `getTimezoneOffset()`: minutes to ADD to local time to get UTC (the
/// inverse sign convention from `standard_offset_seconds`).
pub fn timezone_offset_minutes<Z: TimeZoneSource>(zone: &Z, t: f64) -> f64 {
    if !t.is_finite() {
        return f64::NAN;
    }
    let dst_ms = if zone.is_dst_active(t) { calendar::MS_PER_HOUR } else { 0.0 };
    -(zone.standard_offset_seconds() as f64 * 1_000.0 + dst_ms) / 60_000.0
}

/// `toISOString()` / `toJSON()`: the two are the same operation; callers
/// needing `toJSON`'s extra "call `toISOString` only if it is callable"
/// indirection implement that at the object layer.
pub fn to_iso_string(t: f64) -> JsResult<String> {
    format::to_iso_string(t).ok_or_else(|| JsError::range_error("Invalid Date"))
}

pub fn to_date_string<Z: TimeZoneSource>(t: f64, zone: &Z) -> JsResult<String> {
    let bd = break_down(local::local_time(zone, t)).ok_or_else(|| JsError::range_error("Invalid Date"))?;
    Ok(format::to_date_string(&bd))
}

pub fn to_time_string<Z: TimeZoneSource>(t: f64, zone: &Z, tz_name: Option<&str>) -> JsResult<String> {
    let local = local::local_time(zone, t);
    let bd = break_down(local).ok_or_else(|| JsError::range_error("Invalid Date"))?;
    let offset = timezone_offset_minutes(zone, t);
    Ok(format::to_time_string(&bd, -(offset as i32), tz_name))
}

pub fn to_string<Z: TimeZoneSource>(t: f64, zone: &Z, tz_name: Option<&str>) -> JsResult<String> {
    format::to_string(t, zone, tz_name).ok_or_else(|| JsError::range_error("Invalid Date"))
}

pub fn to_utc_string(t: f64) -> JsResult<String> {
    format::to_utc_string(t).ok_or_else(|| JsError::range_error("Invalid Date"))
}

/// `toJSON()` delegates to `toISOString()` with no extra behavior of its
/// own; the "only call it if it's callable" indirection real engines add
/// belongs at the object layer, not here.
pub fn to_json(t: f64) -> JsResult<String> {
    to_iso_string(t)
}

pub fn to_locale_date_string<L: format::HostLocale, Z: TimeZoneSource>(
    host: &L,
    locale: &str,
    t: f64,
    zone: &Z,
) -> JsResult<String> {
    let bd = break_down(local::local_time(zone, t)).ok_or_else(|| JsError::range_error("Invalid Date"))?;
    Ok(format::to_locale_string(host, locale, &bd, "%m/%d/%Y"))
}

pub fn to_locale_time_string<L: format::HostLocale, Z: TimeZoneSource>(
    host: &L,
    locale: &str,
    t: f64,
    zone: &Z,
) -> JsResult<String> {
    let bd = break_down(local::local_time(zone, t)).ok_or_else(|| JsError::range_error("Invalid Date"))?;
    Ok(format::to_locale_string(host, locale, &bd, "%H:%M:%S"))
}

pub fn to_locale_string<L: format::HostLocale, Z: TimeZoneSource>(
    host: &L,
    locale: &str,
    t: f64,
    zone: &Z,
) -> JsResult<String> {
    let bd = break_down(local::local_time(zone, t)).ok_or_else(|| JsError::range_error("Invalid Date"))?;
    Ok(format::to_locale_string(host, locale, &bd, "%m/%d/%Y %H:%M:%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::RefCell;

    struct FakeHostLocale {
        current: RefCell<String>,
    }

    impl format::HostLocale for FakeHostLocale {
        fn get_current(&self) -> String {
            self.current.borrow().clone()
        }
        fn set(&self, locale: &str) {
            *self.current.borrow_mut() = String::from(locale);
        }
    }

    struct Utc;
    impl TimeZoneSource for Utc {
        fn standard_offset_seconds(&self) -> i32 {
            0
        }
        fn is_dst_active(&self, _t: f64) -> bool {
            false
        }
    }

    struct FixedClock(f64);
    impl NowSource for FixedClock {
        fn now_millis(&self) -> f64 {
            self.0
        }
    }

    #[test]
    fn construct_now_reads_the_clock() {
        assert_eq!(construct_now(&FixedClock(42.0)), 42.0);
    }

    #[test]
    fn two_digit_year_is_lifted_into_1900s() {
        let t = construct_from_fields(&Utc, 99.0, 0.0, Some(1.0), 0.0, 0.0, 0.0, 0.0);
        let bd = break_down(t).unwrap();
        assert_eq!(bd.year, 1999);
    }

    #[test]
    fn four_digit_year_is_left_alone() {
        let t = construct_from_fields(&Utc, 2016.0, 0.0, Some(1.0), 0.0, 0.0, 0.0, 0.0);
        let bd = break_down(t).unwrap();
        assert_eq!(bd.year, 2016);
    }

    #[test]
    fn number_to_instant_truncates_toward_zero() {
        assert_eq!(number_to_instant(1.9), 1.0);
        assert_eq!(number_to_instant(-1.9), -1.0);
    }

    #[test]
    fn number_to_instant_rejects_infinities() {
        assert!(number_to_instant(f64::INFINITY).is_nan());
    }

    #[test]
    fn string_to_instant_rejects_trailing_garbage() {
        assert!(string_to_instant("123abc").is_nan());
        assert_eq!(string_to_instant("123"), 123.0);
        assert_eq!(string_to_instant("-5"), -5.0);
    }

    #[test]
    fn apply_patch_keeps_unset_fields() {
        let base = calendar::make_instant(2020.0, 5.0, 10.0, 1.0, 2.0, 3.0, 4.0);
        let patch = FieldPatch { day: Some(15.0), ..Default::default() };
        let patched = apply_patch(&Utc, base, &patch, true);
        let bd = break_down(patched).unwrap();
        assert_eq!(bd.year, 2020);
        assert_eq!(bd.month, 5);
        assert_eq!(bd.day, 15);
        assert_eq!(bd.hour, 1);
    }

    #[test]
    fn apply_patch_on_invalid_date_without_year_stays_invalid() {
        let patch = FieldPatch { month: Some(3.0), ..Default::default() };
        assert!(apply_patch(&Utc, f64::NAN, &patch, true).is_nan());
    }

    #[test]
    fn apply_patch_on_invalid_date_with_year_anchors_to_epoch() {
        let patch = FieldPatch { year: Some(2000.0), ..Default::default() };
        let t = apply_patch(&Utc, f64::NAN, &patch, true);
        let bd = break_down(t).unwrap();
        assert_eq!((bd.year, bd.month, bd.day), (2000, 0, 1));
    }

    #[test]
    fn to_iso_string_errors_on_invalid_instant() {
        assert!(to_iso_string(f64::NAN).is_err());
    }

    #[test]
    fn utc_static_constructor_does_not_apply_local_offset() {
        struct FiveWest;
        impl TimeZoneSource for FiveWest {
            fn standard_offset_seconds(&self) -> i32 {
                -5 * 3600
            }
            fn is_dst_active(&self, _t: f64) -> bool {
                false
            }
        }
        let t = construct_utc_from_fields(2016.0, 1.0, Some(29.0), 0.0, 0.0, 0.0, 0.0);
        let bd = break_down(t).unwrap();
        assert_eq!((bd.year, bd.month, bd.day, bd.hour), (2016, 1, 29, 0));
    }

    #[test]
    fn named_getters_read_utc_fields_directly() {
        let t = calendar::make_instant(2024.0, 2.0, 5.0, 9.0, 30.0, 15.0, 250.0);
        assert_eq!(get_utc_full_year(t), 2024.0);
        assert_eq!(get_utc_month(t), 2.0);
        assert_eq!(get_utc_date(t), 5.0);
        assert_eq!(get_utc_hours(t), 9.0);
        assert_eq!(get_utc_minutes(t), 30.0);
        assert_eq!(get_utc_seconds(t), 15.0);
        assert_eq!(get_utc_milliseconds(t), 250.0);
    }

    #[test]
    fn named_setter_patches_single_field_and_rebuilds() {
        let t = calendar::make_instant(2020.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0);
        let patched = set_utc_month(&Utc, t, 6.0);
        let bd = break_down(patched).unwrap();
        assert_eq!(bd.month, 6);
        assert_eq!(bd.year, 2020);
    }

    #[test]
    fn get_time_and_set_time_round_trip() {
        assert_eq!(get_time(12345.0), 12345.0);
        assert_eq!(set_time(12345.9), 12345.0);
    }

    #[test]
    fn to_json_matches_to_iso_string() {
        assert_eq!(to_json(0.0).unwrap(), to_iso_string(0.0).unwrap());
    }

    #[test]
    fn locale_date_and_time_strings_split_the_default_pattern() {
        let host = FakeHostLocale { current: RefCell::new(String::from("C")) };
        let date_part = to_locale_date_string(&host, "C", 0.0, &Utc).unwrap();
        let time_part = to_locale_time_string(&host, "C", 0.0, &Utc).unwrap();
        assert_eq!(date_part, "01/01/1970");
        assert_eq!(time_part, "00:00:00");
        assert_eq!(to_locale_string(&host, "C", 0.0, &Utc).unwrap(), "01/01/1970 00:00:00");
    }

    #[test]
    fn timezone_offset_matches_sign_convention() {
        struct FiveWest;
        impl TimeZoneSource for FiveWest {
            fn standard_offset_seconds(&self) -> i32 {
                -5 * 3600
            }
            fn is_dst_active(&self, _t: f64) -> bool {
                false
            }
        }
        assert_eq!(timezone_offset_minutes(&FiveWest, 0.0), 300.0);
    }
}
