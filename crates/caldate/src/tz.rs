//! DST-safe conversion between wall-clock time in an IANA timezone and UTC.
//!
//! The local-to-UTC direction wraps the resolver with a one-hour
//! correction for wall-clock times that fall inside a spring-forward gap,
//! so they land at the transition boundary instead of before it. The
//! correction lives only in this module; swapping the resolver touches
//! nothing else.

use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, Offset, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

use crate::error::{CalDateError, Result};

/// The instant at which `local` was the wall-clock time in `timezone`.
///
/// DST policy:
/// - A time inside a spring-forward gap resolves to the instant at (or
///   after) the transition boundary, for positive and negative UTC
///   offsets alike.
/// - A time repeated by a fall-back transition resolves to the later of
///   the two UTC instants.
///
/// # Errors
///
/// [`CalDateError::InvalidTimezone`] when `timezone` is not a known IANA
/// name.
///
/// # Examples
///
/// ```
/// use caldate::zoned_time_to_utc;
/// use chrono::NaiveDate;
///
/// let local = NaiveDate::from_ymd_opt(2000, 1, 1)
///     .unwrap()
///     .and_hms_opt(0, 0, 0)
///     .unwrap();
/// let instant = zoned_time_to_utc(local, "America/New_York").unwrap();
/// assert_eq!(instant.to_rfc3339(), "2000-01-01T05:00:00+00:00");
/// ```
pub fn zoned_time_to_utc(local: NaiveDateTime, timezone: &str) -> Result<DateTime<Utc>> {
    let tz = parse_timezone(timezone)?;
    let approx = approximate_local_to_utc(local, &tz);
    // the approximation sits on the wrong side of a spring-forward jump
    // exactly when the displayed hour disagrees with the requested one
    let displayed = approx.with_timezone(&tz).hour();
    if displayed != local.hour() {
        Ok(approx + Duration::hours(1))
    } else {
        Ok(approx)
    }
}

/// The wall-clock fields of `instant` in `timezone`. Pass-through
/// projection; no correction is needed in this direction.
///
/// # Errors
///
/// [`CalDateError::InvalidTimezone`] when `timezone` is not a known IANA
/// name.
pub fn utc_to_zoned_time(instant: DateTime<Utc>, timezone: &str) -> Result<NaiveDateTime> {
    let tz = parse_timezone(timezone)?;
    Ok(instant.with_timezone(&tz).naive_local())
}

/// The system's IANA timezone name.
pub fn system_timezone() -> Result<String> {
    iana_time_zone::get_timezone()
        .map_err(|e| CalDateError::InvalidTimezone(format!("system timezone lookup failed: {e}")))
}

/// Parse an IANA timezone string into `Tz`.
fn parse_timezone(timezone: &str) -> Result<Tz> {
    timezone
        .parse::<Tz>()
        .map_err(|_| CalDateError::InvalidTimezone(format!("'{timezone}'")))
}

/// First-approximation local-to-UTC resolution.
///
/// Unambiguous times map directly and repeated times take the later
/// instant. For a time inside a spring-forward gap the post-transition
/// offset is applied, which yields an instant displaying the wall clock
/// one step before the jump; the hour comparison in
/// [`zoned_time_to_utc`] then moves it forward onto the boundary.
fn approximate_local_to_utc(local: NaiveDateTime, tz: &Tz) -> DateTime<Utc> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(instant) => instant.with_timezone(&Utc),
        LocalResult::Ambiguous(_, later) => later.with_timezone(&Utc),
        LocalResult::None => {
            // probe one day past the gap; zone offsets are stable on that scale
            let post = tz.offset_from_utc_datetime(&(local + Duration::days(1))).fix();
            let utc = local - Duration::seconds(i64::from(post.local_minus_utc()));
            Utc.from_utc_datetime(&utc)
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
