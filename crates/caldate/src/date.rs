//! The [`CalDate`] value type: a naive local calendar date/time plus a
//! duration in hours.
//!
//! Fields are deliberately signed and unclamped so callers can push them
//! out of range (month 13, hour 25, a negative day after an offset) and
//! have [`CalDate::update`] fold the overflow back into canonical form.
//! The carry arithmetic for days and clock time is delegated to chrono's
//! calendar engine; days-per-month and leap-year rules are never
//! hand-rolled here.

use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CalDateError, Result};
use crate::tz;

/// Hours from a date/time until the end of its logical event, unless the
/// caller says otherwise.
pub const DEFAULT_DURATION: f64 = 24.0;

// ── Input types ─────────────────────────────────────────────────────────────

/// Partial field set for constructing or mutating a [`CalDate`].
///
/// Only supplied fields are applied; `duration` keeps fractional precision
/// while the calendar fields are integers. Deserializes from the plain
/// `{"year": ..., "month": ...}` object shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalDateOptions {
    pub year: Option<i32>,
    pub month: Option<i32>,
    pub day: Option<i32>,
    pub hour: Option<i32>,
    pub minute: Option<i32>,
    pub second: Option<i32>,
    pub duration: Option<f64>,
}

/// Input accepted by [`CalDate::new`] and [`CalDate::set`]: either a
/// partial field set or an absolute local instant. Cloning an existing
/// `CalDate` is plain [`Clone`].
#[derive(Debug, Clone)]
pub enum DateInput {
    Options(CalDateOptions),
    Instant(NaiveDateTime),
}

impl From<CalDateOptions> for DateInput {
    fn from(opts: CalDateOptions) -> Self {
        DateInput::Options(opts)
    }
}

impl From<NaiveDateTime> for DateInput {
    fn from(instant: NaiveDateTime) -> Self {
        DateInput::Instant(instant)
    }
}

/// Unit of a numeric offset: whole-and-fractional days, hours, or minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OffsetUnit {
    #[default]
    #[serde(rename = "d")]
    Day,
    #[serde(rename = "h")]
    Hour,
    #[serde(rename = "m")]
    Minute,
}

/// A signed fractional offset for [`CalDate::set_offset`].
///
/// Builds from a bare number (unit defaults to days), a `(number, unit)`
/// pair, or a numeric string; a string that does not parse carries NaN and
/// fails at use with [`CalDateError::InvalidOffset`]. Deserializes from
/// the `{"number": ..., "unit": "h"}` object shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Offset {
    pub number: f64,
    #[serde(default)]
    pub unit: OffsetUnit,
}

impl From<f64> for Offset {
    fn from(number: f64) -> Self {
        Offset {
            number,
            unit: OffsetUnit::default(),
        }
    }
}

impl From<i32> for Offset {
    fn from(number: i32) -> Self {
        Offset::from(f64::from(number))
    }
}

impl From<(f64, OffsetUnit)> for Offset {
    fn from((number, unit): (f64, OffsetUnit)) -> Self {
        Offset { number, unit }
    }
}

impl From<(i32, OffsetUnit)> for Offset {
    fn from((number, unit): (i32, OffsetUnit)) -> Self {
        Offset {
            number: f64::from(number),
            unit,
        }
    }
}

impl From<&str> for Offset {
    fn from(text: &str) -> Self {
        let trimmed = text.trim();
        // an empty string is a zero offset, anything unparseable is NaN
        let number = if trimmed.is_empty() {
            0.0
        } else {
            trimmed.parse().unwrap_or(f64::NAN)
        };
        Offset::from(number)
    }
}

/// Input accepted by [`CalDate::to_year`].
#[derive(Debug, Clone)]
pub enum YearInput {
    /// No value given; resolves to the current system year.
    Absent,
    Number(i32),
    Text(String),
    Instant(NaiveDateTime),
}

impl From<i32> for YearInput {
    fn from(year: i32) -> Self {
        YearInput::Number(year)
    }
}

impl From<&str> for YearInput {
    fn from(text: &str) -> Self {
        YearInput::Text(text.to_string())
    }
}

impl From<String> for YearInput {
    fn from(text: String) -> Self {
        YearInput::Text(text)
    }
}

impl From<NaiveDateTime> for YearInput {
    fn from(instant: NaiveDateTime) -> Self {
        YearInput::Instant(instant)
    }
}

// ── CalDate ─────────────────────────────────────────────────────────────────

/// A mutable calendar date: six naive local date/time fields plus a
/// duration in hours.
///
/// `year` is `None` only for a value built from partial fields that
/// supplied a month without a year; every operation that projects the
/// fields onto the timeline fails with [`CalDateError::MissingYear`] until
/// a year is set.
///
/// # Examples
///
/// ```
/// use caldate::{CalDate, CalDateOptions};
///
/// let date = CalDate::new(CalDateOptions {
///     year: Some(2000),
///     month: Some(2),
///     day: Some(30),
///     hour: Some(25),
///     minute: Some(61),
///     second: Some(62),
///     ..Default::default()
/// });
/// assert_eq!(date.format().unwrap(), "2000-03-02 02:02:02");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalDate {
    pub year: Option<i32>,
    pub month: i32,
    pub day: i32,
    pub hour: i32,
    pub minute: i32,
    pub second: i32,
    /// Hours until the end of the logical event; never implicitly
    /// normalized alongside the calendar fields.
    pub duration: f64,
}

impl Default for CalDate {
    fn default() -> Self {
        CalDate {
            year: Some(1900),
            month: 1,
            day: 1,
            hour: 0,
            minute: 0,
            second: 0,
            duration: DEFAULT_DURATION,
        }
    }
}

impl From<NaiveDateTime> for CalDate {
    fn from(instant: NaiveDateTime) -> Self {
        let mut date = CalDate::default();
        date.assign_datetime(instant);
        date
    }
}

impl FromStr for CalDate {
    type Err = CalDateError;

    /// Parses the formats [`CalDate::format`] and [`CalDate::format_iso`]
    /// emit: `YYYY-MM-DD HH:MM:SS` and `YYYY-MM-DDTHH:MM:SS[Z]`.
    fn from_str(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        let trimmed = trimmed.strip_suffix('Z').unwrap_or(trimmed);
        NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S")
            .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S"))
            .map(CalDate::from)
            .map_err(|e| CalDateError::InvalidDatetime(format!("'{text}': {e}")))
    }
}

impl CalDate {
    /// Construct from a field set merged over the defaults
    /// (`1900-01-01 00:00:00`, duration 24), or from a local instant.
    ///
    /// Supplying a `month` without a `year` leaves `year` unset: the value
    /// is a partially specified, year-less date until a year arrives.
    pub fn new(input: impl Into<DateInput>) -> Self {
        match input.into() {
            DateInput::Instant(instant) => CalDate::from(instant),
            DateInput::Options(opts) => {
                let mut date = CalDate::default();
                if opts.month.is_some() && opts.year.is_none() {
                    date.year = None;
                }
                date.set(opts);
                date
            }
        }
    }

    /// Copy fields from the input without normalizing.
    ///
    /// An instant overwrites all six fields and resets `duration` to the
    /// default. A field set copies only the supplied fields; a supplied
    /// `duration` of zero is ignored and leaves the current duration in
    /// place.
    pub fn set(&mut self, input: impl Into<DateInput>) -> &mut Self {
        match input.into() {
            DateInput::Instant(instant) => {
                self.assign_datetime(instant);
                self.duration = DEFAULT_DURATION;
            }
            DateInput::Options(opts) => {
                if let Some(year) = opts.year {
                    self.year = Some(year);
                }
                if let Some(month) = opts.month {
                    self.month = month;
                }
                if let Some(day) = opts.day {
                    self.day = day;
                }
                if let Some(hour) = opts.hour {
                    self.hour = hour;
                }
                if let Some(minute) = opts.minute {
                    self.minute = minute;
                }
                if let Some(second) = opts.second {
                    self.second = second;
                }
                if let Some(duration) = opts.duration {
                    if duration != 0.0 {
                        self.duration = duration;
                    }
                }
            }
        }
        self
    }

    /// Apply a signed fractional offset, then normalize.
    ///
    /// The number is decomposed by truncating the largest unit first and
    /// cascading the fractional remainder downward, so fractional inputs
    /// yield exact day/hour/minute/second deltas under truncation rather
    /// than rounding: 12.555 hours becomes +12h 33m 17s.
    ///
    /// A zero offset only triggers normalization.
    ///
    /// # Errors
    ///
    /// [`CalDateError::InvalidOffset`] when the number is NaN (e.g. an
    /// offset built from a non-numeric string).
    ///
    /// # Examples
    ///
    /// ```
    /// use caldate::{CalDate, Offset, OffsetUnit};
    ///
    /// let mut date: CalDate = "2000-01-01 00:00:00".parse().unwrap();
    /// date.set_offset(Offset { number: 12.555, unit: OffsetUnit::Hour }).unwrap();
    /// assert_eq!(date.format_iso().unwrap(), "2000-01-01T12:33:17Z");
    /// ```
    pub fn set_offset(&mut self, offset: impl Into<Offset>) -> Result<&mut Self> {
        let Offset { mut number, unit } = offset.into();
        if number.is_nan() {
            return Err(CalDateError::InvalidOffset);
        }
        if number != 0.0 {
            let mut day = 0.0;
            let mut hour = 0.0;
            if unit == OffsetUnit::Day {
                day = number.trunc();
                number -= day;
                number *= 24.0;
            }
            if matches!(unit, OffsetUnit::Day | OffsetUnit::Hour) {
                hour = (number % 24.0).trunc();
                number -= hour;
                number *= 60.0;
            }
            let minute = (number % 60.0).trunc();
            number -= minute;
            number *= 60.0;
            let second = (number % 60.0).trunc();

            self.day += day as i32;
            self.hour += hour as i32;
            self.minute += minute as i32;
            self.second += second as i32;
        }
        self.update()
    }

    /// Set the time of day and recompute `duration` as the hours remaining
    /// until the next local midnight, then normalize.
    ///
    /// The logical event ends at midnight by convention; call
    /// [`CalDate::set_duration`] afterwards when that is not the case.
    pub fn set_time(&mut self, hour: i32, minute: i32, second: i32) -> Result<&mut Self> {
        self.hour = hour;
        self.minute = minute;
        self.second = second;
        self.duration =
            24.0 - (f64::from(hour) + f64::from(minute) / 60.0 + f64::from(second) / 3600.0);
        self.update()
    }

    /// Set the duration in hours. No validation, no normalization.
    pub fn set_duration(&mut self, duration: f64) -> &mut Self {
        self.duration = duration;
        self
    }

    /// Fold out-of-range fields back into canonical form.
    ///
    /// Afterwards `month` is 1..=12, `day` is valid for the month and
    /// year, `hour` is 0..=23 and `minute`/`second` are 0..=59, all
    /// denoting the same local point in time. `duration` is untouched.
    /// No-op when `year` is unset.
    pub fn update(&mut self) -> Result<&mut Self> {
        if self.year.is_some() {
            let instant = self.to_datetime()?;
            self.assign_datetime(instant);
        }
        Ok(self)
    }

    /// The end of the logical event: this date advanced by whole minutes
    /// of `duration`, as a new normalized value with the default duration.
    pub fn to_end_date(&self) -> Result<CalDate> {
        let mut end = CalDate::from(self.to_datetime()?);
        end.minute += (self.duration * 60.0).trunc() as i32;
        end.update()?;
        Ok(end)
    }

    /// Project the fields onto a local-calendar instant, carrying any
    /// out-of-range values.
    ///
    /// # Errors
    ///
    /// [`CalDateError::MissingYear`] when `year` is unset,
    /// [`CalDateError::InvalidDatetime`] when the fields resolve outside
    /// chrono's supported range.
    pub fn to_datetime(&self) -> Result<NaiveDateTime> {
        let year = self.year.ok_or(CalDateError::MissingYear)?;
        resolve_fields(year, self.month, self.day, self.hour, self.minute, self.second)
    }

    /// Whether `other` falls on the same normalized year/month/day.
    /// Time of day is ignored; `other` is compared as-is.
    pub fn is_equal_date(&self, other: &CalDate) -> bool {
        let mut date = self.clone();
        if date.update().is_err() {
            return false;
        }
        date.year == other.year && date.month == other.month && date.day == other.day
    }

    /// Day of week of the normalized date, 0 = Sunday .. 6 = Saturday.
    pub fn day_of_week(&self) -> Result<u32> {
        Ok(self.to_datetime()?.weekday().num_days_from_sunday())
    }

    /// The normalized date as `YYYY-MM-DD HH:MM:SS`.
    pub fn format(&self) -> Result<String> {
        Ok(self.to_datetime()?.format("%Y-%m-%d %H:%M:%S").to_string())
    }

    /// The normalized date as `YYYY-MM-DDTHH:MM:SSZ`.
    ///
    /// The trailing `Z` is a format convention kept for compatibility: the
    /// fields are naive local calendar time, not UTC.
    pub fn format_iso(&self) -> Result<String> {
        Ok(self.to_datetime()?.format("%Y-%m-%dT%H:%M:%SZ").to_string())
    }

    /// The instant at which this wall-clock time occurred in `timezone`,
    /// DST-corrected (see [`crate::tz::zoned_time_to_utc`]). Without a
    /// timezone the system zone is used.
    ///
    /// # Errors
    ///
    /// [`CalDateError::InvalidTimezone`] for an unknown zone name or a
    /// failed system-zone lookup, plus the [`CalDate::to_datetime`]
    /// errors.
    pub fn to_timezone(&self, timezone: Option<&str>) -> Result<DateTime<Utc>> {
        match timezone {
            Some(zone) => tz::zoned_time_to_utc(self.to_datetime()?, zone),
            None => tz::zoned_time_to_utc(self.to_datetime()?, &tz::system_timezone()?),
        }
    }

    /// Set the fields to the wall-clock time of `instant` in `timezone`
    /// (or the system zone). Resets `duration` to the default.
    pub fn from_timezone(
        &mut self,
        instant: DateTime<Utc>,
        timezone: Option<&str>,
    ) -> Result<&mut Self> {
        let wall = match timezone {
            Some(zone) => tz::utc_to_zoned_time(instant, zone)?,
            None => tz::utc_to_zoned_time(instant, &tz::system_timezone()?)?,
        };
        Ok(self.set(wall))
    }

    /// Extract a year from a number, numeric string, or instant; an absent
    /// or falsy input (zero, empty string) yields the current system year.
    /// Returns `None` for a string with no leading integer.
    pub fn to_year(input: impl Into<YearInput>) -> Option<i32> {
        match input.into() {
            YearInput::Absent => Some(current_year()),
            YearInput::Number(0) => Some(current_year()),
            YearInput::Number(year) => Some(year),
            YearInput::Instant(instant) => Some(instant.year()),
            YearInput::Text(text) if text.is_empty() => Some(current_year()),
            YearInput::Text(text) => to_int(&text),
        }
    }

    fn assign_datetime(&mut self, instant: NaiveDateTime) {
        self.year = Some(instant.year());
        self.month = instant.month() as i32;
        self.day = instant.day() as i32;
        self.hour = instant.hour() as i32;
        self.minute = instant.minute() as i32;
        self.second = instant.second() as i32;
    }
}

// ── Internal helpers ────────────────────────────────────────────────────────

/// Resolve possibly out-of-range fields to an instant.
///
/// The year/month carry is a constant-width euclidean division; day and
/// clock-time carries go through chrono's checked date arithmetic, which
/// owns days-per-month and leap years.
fn resolve_fields(
    year: i32,
    month: i32,
    day: i32,
    hour: i32,
    minute: i32,
    second: i32,
) -> Result<NaiveDateTime> {
    let months = i64::from(year) * 12 + i64::from(month) - 1;
    let carried_year = i32::try_from(months.div_euclid(12))
        .map_err(|_| out_of_range(year, month, day))?;
    let carried_month = months.rem_euclid(12) as u32 + 1;
    let first = NaiveDate::from_ymd_opt(carried_year, carried_month, 1)
        .ok_or_else(|| out_of_range(year, month, day))?;
    let date = first
        .checked_add_signed(Duration::days(i64::from(day) - 1))
        .ok_or_else(|| out_of_range(year, month, day))?;
    let clock = i64::from(hour) * 3600 + i64::from(minute) * 60 + i64::from(second);
    date.and_time(NaiveTime::MIN)
        .checked_add_signed(Duration::seconds(clock))
        .ok_or_else(|| out_of_range(year, month, day))
}

fn out_of_range(year: i32, month: i32, day: i32) -> CalDateError {
    CalDateError::InvalidDatetime(format!(
        "fields resolve outside the supported range (year {year}, month {month}, day {day})"
    ))
}

fn current_year() -> i32 {
    Local::now().year()
}

/// Parse the leading integer of a string, `parseInt`-style: optional sign,
/// then digits; anything after the digits is ignored. `None` when there is
/// no leading integer or it overflows `i32`.
pub fn to_int(text: &str) -> Option<i32> {
    let trimmed = text.trim_start();
    let (sign, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (-1i64, &trimmed[1..]),
        Some(b'+') => (1, &trimmed[1..]),
        _ => (1, trimmed),
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let value: i64 = rest[..digits].parse().ok()?;
    i32::try_from(sign * value).ok()
}

// ── Tests ───────────────────────────────────────────────────────────────────
