//! Multi-strategy date string parsing.
//!
//! No regex engine is used, in keeping with the rest of this crate's
//! hand-written byte-level scanners (see the sibling `ast` module, and the
//! teacher's own `lexer.rs`): each strategy walks the string with plain
//! slicing and digit checks and bails out to the next strategy on the
//! first mismatch.

use super::calendar::{make_date, make_day, make_time};
use super::local::{utc, TimeZoneSource};

/// Fields as written in the source string, before the month is rebased to
/// 0-based and before range validation.
struct RawFields {
    year: i32,
    month1: i32,
    day: i32,
    hour: i32,
    min: i32,
    sec: i32,
    msec: i32,
    /// Minutes east of UTC, if the string carried an explicit offset.
    tz_minutes: Option<i32>,
}

impl RawFields {
    fn date_only(year: i32, month1: i32, day: i32) -> Self {
        Self { year, month1, day, hour: 0, min: 0, sec: 0, msec: 0, tz_minutes: None }
    }
}

/// Host-provided best-effort parser, tried between the strict ISO strategy
/// and the RFC-style one. A host with no calendar library of its own can
/// simply not implement this trait and callers pass `None`.
pub trait HostDateParser {
    fn parse(&self, s: &str) -> Option<ParsedDate>;
}

/// A validated, 0-based-month result ready for instant construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedDate {
    pub year: i32,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub min: u8,
    pub sec: u8,
    pub msec: u16,
    pub tz_minutes: Option<i32>,
}

/// Try every strategy in order and resolve the first match against `zone`
/// to an instant. Returns NaN if every strategy fails.
pub fn parse<P: HostDateParser, Z: TimeZoneSource>(s: &str, host_parser: Option<&P>, zone: &Z) -> f64 {
    let s = s.trim();

    if let Some(raw) = parse_iso(s) {
        return resolve(raw, zone);
    }
    log::debug!("parse: not strict ISO-8601, trying host parser: {:?}", s);
    if let Some(host) = host_parser {
        if let Some(pd) = host.parse(s) {
            return resolve_parsed(pd, zone);
        }
    }
    log::debug!("parse: host parser did not match, trying RFC-style grammar: {:?}", s);
    if let Some(raw) = parse_rfc(s) {
        return resolve(raw, zone);
    }
    log::debug!("parse: not RFC-style, trying permuted-separator fallback: {:?}", s);
    if let Some(raw) = parse_fallback(s) {
        return resolve(raw, zone);
    }
    log::debug!("parse: every strategy failed, returning an invalid instant: {:?}", s);
    f64::NAN
}

fn resolve<Z: TimeZoneSource>(raw: RawFields, zone: &Z) -> f64 {
    match finish(raw) {
        Some(pd) => resolve_parsed(pd, zone),
        None => f64::NAN,
    }
}

fn resolve_parsed<Z: TimeZoneSource>(pd: ParsedDate, zone: &Z) -> f64 {
    let naive = make_date(
        make_day(pd.year as f64, pd.month as f64, pd.day as f64),
        make_time(pd.hour as f64, pd.min as f64, pd.sec as f64, pd.msec as f64),
    );
    match pd.tz_minutes {
        Some(minutes) => naive - minutes as f64 * 60_000.0,
        None => utc(zone, naive),
    }
}

fn finish(raw: RawFields) -> Option<ParsedDate> {
    let month = raw.month1 - 1;
    if !(1..=31).contains(&raw.day) {
        return None;
    }
    if !(0..=11).contains(&month) {
        return None;
    }
    if !(0..=23).contains(&raw.hour) || !(0..=59).contains(&raw.min) || !(0..=59).contains(&raw.sec) {
        return None;
    }
    // `raw.tz_minutes` is already normalized to minutes-east-of-UTC by
    // `parse_tz_offset` (the "hhmm" decoding happens there); here we only
    // enforce the final |tz| <= 12h bound.
    let tz_minutes = match raw.tz_minutes {
        None => None,
        Some(tz) if tz.abs() > 12 * 60 => return None,
        Some(tz) => Some(tz),
    };
    Some(ParsedDate {
        year: raw.year,
        month: month as u8,
        day: raw.day as u8,
        hour: raw.hour as u8,
        min: raw.min as u8,
        sec: raw.sec as u8,
        msec: raw.msec as u16,
        tz_minutes,
    })
}

/// `YYYY-MM-DDTHH:MM:SS.sssZ`, strict UTC form only.
fn parse_iso(s: &str) -> Option<RawFields> {
    let b = s.as_bytes();
    if b.len() != 24 {
        return None;
    }
    if b[4] != b'-' || b[7] != b'-' || b[10] != b'T' || b[13] != b':' || b[16] != b':' || b[19] != b'.' || b[23] != b'Z' {
        return None;
    }
    let year = digits(&b[0..4])?;
    let month1 = digits(&b[5..7])?;
    let day = digits(&b[8..10])?;
    let hour = digits(&b[11..13])?;
    let min = digits(&b[14..16])?;
    let sec = digits(&b[17..19])?;
    let msec = digits(&b[20..23])?;
    Some(RawFields { year, month1, day, hour, min, sec, msec, tz_minutes: Some(0) })
}

const MONTHS: [&str; 12] =
    ["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec"];

fn month_index(name: &str) -> Option<i32> {
    MONTHS.iter().position(|m| m.eq_ignore_ascii_case(name)).map(|i| i as i32 + 1)
}

/// `Www Mmm DD YYYY HH:MM:SS GMT[+-HHMM]`.
fn parse_rfc(s: &str) -> Option<RawFields> {
    let mut tokens = s.split_whitespace();
    let _weekday = tokens.next()?;
    let month1 = month_index(tokens.next()?)?;
    let day = tokens.next()?.parse::<i32>().ok()?;
    let year = tokens.next()?.parse::<i32>().ok()?;
    let time = tokens.next()?;
    let (hour, min, sec) = parse_hms(time)?;
    let gmt = tokens.next()?;
    if !gmt.eq_ignore_ascii_case("GMT") && !gmt.starts_with("GMT") {
        return None;
    }
    let offset_token = if gmt.len() > 3 { &gmt[3..] } else { tokens.next().unwrap_or("") };
    let tz_minutes = parse_tz_offset(offset_token).or(Some(0));
    Some(RawFields { year, month1, day, hour, min, sec, msec: 0, tz_minutes })
}

/// Permuted numeric forms separated by `/`, `.`, or `-`, optionally
/// followed by a clock time and a trailing `GMT[+-N]`.
fn parse_fallback(s: &str) -> Option<RawFields> {
    let mut tokens = s.split_whitespace();
    let date_part = tokens.next()?;

    let (sep, order) = [('/', DateOrder::Mdy), ('.', DateOrder::Dmy), ('-', DateOrder::Ymd)]
        .into_iter()
        .find(|&(c, _)| date_part.as_bytes().contains(&(c as u8)))?;

    let mut fields = date_part.split(sep);
    let a = fields.next()?.parse::<i32>().ok()?;
    let b = fields.next()?.parse::<i32>().ok()?;
    let c = fields.next()?.parse::<i32>().ok()?;
    if fields.next().is_some() {
        return None;
    }
    let (year, month1, day) = match order {
        DateOrder::Mdy => (c, a, b),
        DateOrder::Dmy => (c, b, a),
        DateOrder::Ymd => (a, b, c),
    };

    let mut raw = RawFields::date_only(year, month1, day);

    if let Some(time_tok) = tokens.next() {
        if let Some((h, m, sec)) = parse_hms(time_tok) {
            raw.hour = h;
            raw.min = m;
            raw.sec = sec;
        } else {
            return None;
        }
    }
    if let Some(tz_tok) = tokens.next() {
        let offset_text = if let Some(rest) = tz_tok.strip_prefix("GMT") { rest } else { tz_tok };
        raw.tz_minutes = parse_tz_offset(offset_text);
    }
    Some(raw)
}

#[derive(Clone, Copy)]
enum DateOrder {
    Mdy,
    Dmy,
    Ymd,
}

/// `HH:MM` or `HH:MM:SS`.
fn parse_hms(s: &str) -> Option<(i32, i32, i32)> {
    let mut parts = s.split(':');
    let h = parts.next()?.parse::<i32>().ok()?;
    let m = parts.next()?.parse::<i32>().ok()?;
    let sec = match parts.next() {
        Some(sec_str) => sec_str.parse::<i32>().ok()?,
        None => 0,
    };
    if parts.next().is_some() {
        return None;
    }
    Some((h, m, sec))
}

/// `+HHMM`, `-HHMM`, or a bare signed integer already in that shape.
fn parse_tz_offset(s: &str) -> Option<i32> {
    if s.is_empty() {
        return None;
    }
    let value: i32 = s.parse().ok()?;
    let magnitude = value.abs();
    let hours = magnitude / 100;
    let minutes = magnitude % 100;
    if hours > 12 || minutes > 59 {
        return None;
    }
    let total = hours * 60 + minutes;
    Some(if value < 0 { -total } else { total })
}

fn digits(bytes: &[u8]) -> Option<i32> {
    if bytes.is_empty() || !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }
    let mut value = 0i32;
    for &b in bytes {
        value = value * 10 + (b - b'0') as i32;
    }
    Some(value)
}
