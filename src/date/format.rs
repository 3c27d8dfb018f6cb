//! Instant-to-string formatting: ISO, RFC-ish date/time strings, and
//! host-locale-sensitive strings.

use alloc::format;
use alloc::string::String;

use super::calendar::{break_down, week_day, BrokenDownTime};
use super::local::{local_time, TimeZoneSource};

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
const MONTHS: [&str; 12] =
    ["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec"];

/// The host's process-wide current formatting locale. Locale-sensitive
/// formatting must save the current value, install its own, format, then
/// restore. See [`with_locale`].
///
/// Save/restore code for process-wide state is an easy place to get the
/// argument order backwards (calling `set` where `get` belonged). The
/// guard pattern here makes that bug class inexpressible: [`LocaleGuard`]
/// always captures on construction and restores on drop.
pub trait HostLocale {
    fn get_current(&self) -> String;
    fn set(&self, locale: &str);
}

/// RAII guard: captures the host locale on construction, restores it on
/// drop. Construct via [`with_locale`].
pub struct LocaleGuard<'a, L: HostLocale> {
    host: &'a L,
    previous: String,
}

impl<'a, L: HostLocale> Drop for LocaleGuard<'a, L> {
    fn drop(&mut self) {
        self.host.set(&self.previous);
    }
}

/// Run `f` with the host locale temporarily overridden to `locale`,
/// restoring whatever was active beforehand even if `f` panics.
pub fn with_locale<L: HostLocale, R>(host: &L, locale: &str, f: impl FnOnce() -> R) -> R {
    let previous = host.get_current();
    host.set(locale);
    let _guard = LocaleGuard { host, previous };
    f()
}

fn year_field(year: i64) -> String {
    if (0..=9999).contains(&year) {
        format!("{:04}", year)
    } else {
        format!("{}{:06}", if year < 0 { "-" } else { "+" }, year.abs())
    }
}

/// `YYYY-MM-DDTHH:MM:SS.sssZ`.
pub fn to_iso_string(t: f64) -> Option<String> {
    let bd = break_down(t)?;
    Some(format!(
        "{}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}Z",
        year_field(bd.year),
        bd.month + 1,
        bd.day,
        bd.hour,
        bd.min,
        bd.sec,
        bd.msec
    ))
}

/// `Www Mmm DD YYYY`.
pub fn to_date_string(bd: &BrokenDownTime) -> String {
    format!(
        "{} {} {:02} {}",
        WEEKDAYS[bd.weekday as usize],
        MONTHS[bd.month as usize],
        bd.day,
        year_field(bd.year)
    )
}

/// `HH:MM:SS GMT` or, with a non-zero offset, `HH:MM:SS GMT±HHMM (TZNAME)`.
pub fn to_time_string(bd: &BrokenDownTime, tz_offset_minutes: i32, tz_name: Option<&str>) -> String {
    let mut out = format!("{:02}:{:02}:{:02} GMT", bd.hour, bd.min, bd.sec);
    if tz_offset_minutes != 0 {
        let sign = if tz_offset_minutes < 0 { '-' } else { '+' };
        let mag = tz_offset_minutes.unsigned_abs();
        out.push(sign);
        out.push_str(&format!("{:02}{:02}", mag / 60, mag % 60));
        if let Some(name) = tz_name {
            out.push_str(" (");
            out.push_str(name);
            out.push(')');
        }
    }
    out
}

/// `toString()`: date string, a space, then time string.
pub fn to_string<Z: TimeZoneSource>(t: f64, zone: &Z, tz_name: Option<&str>) -> Option<String> {
    let local = local_time(zone, t);
    let bd = break_down(local)?;
    let offset_minutes = zone.standard_offset_seconds() / 60
        + if zone.is_dst_active(t) { 60 } else { 0 };
    Some(format!("{} {}", to_date_string(&bd), to_time_string(&bd, offset_minutes, tz_name)))
}

/// `toUTCString()`: `Www, DD Mmm YYYY HH:MM:SS GMT`.
pub fn to_utc_string(t: f64) -> Option<String> {
    let bd = break_down(t)?;
    Some(format!(
        "{}, {:02} {} {} {:02}:{:02}:{:02} GMT",
        WEEKDAYS[bd.weekday as usize],
        bd.day,
        MONTHS[bd.month as usize],
        year_field(bd.year),
        bd.hour,
        bd.min,
        bd.sec
    ))
}

/// Host-`strftime`-flavored locale string, formatted under the locale
/// saved/restored by [`with_locale`]. The host trait is the actual
/// formatter; this just threads the broken-down fields through under the
/// guard.
pub fn to_locale_string<L: HostLocale>(host: &L, locale: &str, bd: &BrokenDownTime, pattern: &str) -> String {
    with_locale(host, locale, || render_pattern(pattern, bd))
}

fn render_pattern(pattern: &str, bd: &BrokenDownTime) -> String {
    let mut out = String::new();
    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('Y') => out.push_str(&year_field(bd.year)),
            Some('m') => out.push_str(&format!("{:02}", bd.month + 1)),
            Some('d') => out.push_str(&format!("{:02}", bd.day)),
            Some('H') => out.push_str(&format!("{:02}", bd.hour)),
            Some('M') => out.push_str(&format!("{:02}", bd.min)),
            Some('S') => out.push_str(&format!("{:02}", bd.sec)),
            Some('a') => out.push_str(WEEKDAYS[bd.weekday as usize]),
            Some('b') => out.push_str(MONTHS[bd.month as usize]),
            Some(other) => {
                out.push('%');
                out.push(other);
            }
            None => out.push('%'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::RefCell;

    #[test]
    fn iso_format_of_epoch() {
        assert_eq!(to_iso_string(0.0).as_deref(), Some("1970-01-01T00:00:00.000Z"));
    }

    #[test]
    fn iso_format_rejects_invalid_instant() {
        assert_eq!(to_iso_string(f64::NAN), None);
    }

    #[test]
    fn wide_year_gets_signed_six_digit_field() {
        assert_eq!(year_field(12_345), "+012345");
        assert_eq!(year_field(-1), "-000001");
        assert_eq!(year_field(1970), "1970");
    }

    #[test]
    fn utc_string_matches_known_format() {
        assert_eq!(to_utc_string(0.0).as_deref(), Some("Thu, 01 Jan 1970 00:00:00 GMT"));
    }

    #[test]
    fn time_string_includes_offset_and_name_when_nonzero() {
        let bd = break_down(0.0).unwrap();
        let s = to_time_string(&bd, -300, Some("EST"));
        assert_eq!(s, "00:00:00 GMT-0500 (EST)");
    }

    #[test]
    fn time_string_omits_offset_when_zero() {
        let bd = break_down(0.0).unwrap();
        assert_eq!(to_time_string(&bd, 0, Some("UTC")), "00:00:00 GMT");
    }

    struct FakeHostLocale {
        current: RefCell<String>,
    }

    impl HostLocale for FakeHostLocale {
        fn get_current(&self) -> String {
            self.current.borrow().clone()
        }
        fn set(&self, locale: &str) {
            *self.current.borrow_mut() = String::from(locale);
        }
    }

    #[test]
    fn locale_guard_restores_previous_locale_on_drop() {
        let host = FakeHostLocale { current: RefCell::new(String::from("en_US")) };
        {
            let _guard_result = with_locale(&host, "fr_FR", || host.get_current());
            assert_eq!(_guard_result, "fr_FR");
        }
        assert_eq!(host.get_current(), "en_US");
    }

    #[test]
    fn locale_pattern_renders_fields() {
        let host = FakeHostLocale { current: RefCell::new(String::from("C")) };
        let bd = break_down(0.0).unwrap();
        let s = to_locale_string(&host, "C", &bd, "%Y-%m-%d %a %b");
        assert_eq!(s, "1970-01-01 Thu Jan");
    }
}
