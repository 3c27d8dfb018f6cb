//! Local-time adjustment against a host-supplied timezone.
//!
//! The engine embedding this crate owns the actual timezone database (or
//! has none, and hardcodes UTC); this module only implements the
//! UTC-local conversion arithmetic against whatever the host reports.

pub const MS_PER_HOUR: f64 = super::calendar::MS_PER_HOUR;

/// Host collaborator for timezone queries. `standard_offset_seconds` is the
/// host's standard-time (non-DST) offset added to UTC to get local time;
/// `is_dst_active` is probed per-instant since DST boundaries move offsets
/// discontinuously.
pub trait TimeZoneSource {
    /// Standard-time offset from UTC, in seconds, positive east of
    /// Greenwich. Assumed fixed across instants; hosts that track
    /// historical offset changes are expected to fold that into
    /// `is_dst_active` instead.
    fn standard_offset_seconds(&self) -> i32;

    /// Whether daylight saving time is in effect at UTC instant `t`.
    fn is_dst_active(&self, t: f64) -> bool;
}

fn local_tza<Z: TimeZoneSource>(zone: &Z) -> f64 {
    zone.standard_offset_seconds() as f64 * 1_000.0
}

fn daylight_saving_ta<Z: TimeZoneSource>(zone: &Z, t: f64) -> f64 {
    if zone.is_dst_active(t) {
        MS_PER_HOUR
    } else {
        0.0
    }
}

/// UTC instant to local instant.
pub fn local_time<Z: TimeZoneSource>(zone: &Z, t: f64) -> f64 {
    if !t.is_finite() {
        return f64::NAN;
    }
    t + local_tza(zone) + daylight_saving_ta(zone, t)
}

/// Local instant to UTC instant.
///
/// DST is probed at `t - LocalTZA`, not at `t` itself, so that
/// `UTC(LocalTime(t)) == t` holds away from DST transition boundaries.
/// Probing at `t` directly would make the inverse wrong for exactly the
/// instants that most need to round-trip: the period right after a
/// fall-back transition, when both the pre- and post-transition local
/// times briefly denote the same wall clock reading.
pub fn utc<Z: TimeZoneSource>(zone: &Z, t: f64) -> f64 {
    if !t.is_finite() {
        return f64::NAN;
    }
    let tza = local_tza(zone);
    t - tza - daylight_saving_ta(zone, t - tza)
}
