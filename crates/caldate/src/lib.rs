//! # caldate
//!
//! A mutable calendar date value type: a naive local date/time (year,
//! month, day, hour, minute, second) decoupled from any timezone, plus a
//! duration in hours. Out-of-range fields are folded back into canonical
//! form through calendar-aware carry arithmetic, signed fractional
//! offsets decompose exactly into day/hour/minute/second deltas, and
//! conversion to and from IANA timezones resolves daylight-saving gaps
//! and repeats deterministically.
//!
//! ## Modules
//!
//! - [`date`] - the [`CalDate`] value type, field normalization, offset decomposition
//! - [`tz`] - DST-safe wall-clock to UTC conversion and back
//! - [`error`] - error types
//!
//! ## Example
//!
//! ```
//! use caldate::{CalDate, CalDateOptions};
//!
//! let mut date = CalDate::new(CalDateOptions {
//!     year: Some(2000),
//!     month: Some(1),
//!     day: Some(1),
//!     ..Default::default()
//! });
//! date.set_offset(5).unwrap();
//! assert_eq!(date.format_iso().unwrap(), "2000-01-06T00:00:00Z");
//!
//! let instant = date.to_timezone(Some("America/New_York")).unwrap();
//! assert_eq!(instant.to_rfc3339(), "2000-01-06T05:00:00+00:00");
//! ```

pub mod date;
pub mod error;
pub mod tz;

pub use date::{
    to_int, CalDate, CalDateOptions, DateInput, Offset, OffsetUnit, YearInput, DEFAULT_DURATION,
};
pub use error::CalDateError;
pub use tz::{system_timezone, utc_to_zoned_time, zoned_time_to_utc};
