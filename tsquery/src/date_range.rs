//! Partitioning of a `[dateStart, dateEnd]` span into date-range buckets
//!
//! Each bucket is a window of fixed size ending at an interval boundary.
//! Boundaries start at `dateStart` and step by the interval while they stay
//! within `dateEnd`; without an interval (or with `dateStart == dateEnd`)
//! there is a single boundary at `dateEnd`.

use crate::duration::parse_duration;
use crate::error::{Error, Result};
use crate::MAX_INTERVALS;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Inputs to [`get_date_range_info`]
#[derive(Debug, Clone, Copy, Default)]
pub struct DateRangeParams<'a> {
    /// Defaults to `date_end`
    pub date_start: Option<&'a str>,
    /// Defaults to now
    pub date_end: Option<&'a str>,
    /// Window size of each bucket, e.g. `5m`
    pub window: &'a str,
    /// Distance between bucket end points, e.g. `1h`
    pub interval: Option<&'a str>,
}

/// One `[from, to)` bucket, as ISO-8601 UTC timestamps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeInfo {
    /// Start of the first range
    pub date_start: String,
    /// End of the last range
    pub date_end: String,
    pub date_ranges: Vec<DateRange>,
}

/// Partition the requested span, resolving a missing `date_end` to now.
pub fn get_date_range_info(params: &DateRangeParams<'_>) -> Result<DateRangeInfo> {
    get_date_range_info_at(params, Utc::now())
}

/// Same as [`get_date_range_info`] with an explicit value for "now".
pub fn get_date_range_info_at(
    params: &DateRangeParams<'_>,
    now: DateTime<Utc>,
) -> Result<DateRangeInfo> {
    let date_end = match params.date_end {
        Some(s) => parse_date(s)?,
        None => now,
    };
    let date_start = match params.date_start {
        Some(s) => parse_date(s)?,
        None => date_end,
    };

    if date_start > date_end {
        return Err(Error::DateStartAfterDateEnd {
            start: format_date(date_start),
            end: format_date(date_end),
        });
    }

    let window = parse_duration(params.window)?;
    let interval = params.interval.map(parse_duration).transpose()?;

    let ends = match interval {
        Some(interval) if date_start != date_end => {
            let span = (date_end - date_start).num_milliseconds();
            let step = interval.num_milliseconds();
            let count = usize::try_from(span / step).unwrap_or(usize::MAX).saturating_add(1);
            if count > MAX_INTERVALS {
                return Err(Error::TooManyIntervals {
                    count,
                    max: MAX_INTERVALS,
                });
            }

            let mut ends = Vec::with_capacity(count);
            let mut end = date_start;
            while end <= date_end {
                ends.push(end);
                // past the representable range there are no further end points
                match end.checked_add_signed(interval) {
                    Some(next) => end = next,
                    None => break,
                }
            }
            ends
        }
        _ => vec![date_end],
    };

    let date_ranges = ends
        .into_iter()
        .map(|end| {
            let from = end.checked_sub_signed(window).ok_or_else(|| {
                Error::InvalidDuration(format!(
                    "window \"{}\" before {} is out of range",
                    params.window,
                    format_date(end)
                ))
            })?;
            Ok(DateRange {
                from: format_date(from),
                to: format_date(end),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    // ends is never empty, so neither is date_ranges
    let date_start = date_ranges
        .first()
        .map(|r| r.from.clone())
        .unwrap_or_default();
    let date_end = date_ranges.last().map(|r| r.to.clone()).unwrap_or_default();

    Ok(DateRangeInfo {
        date_start,
        date_end,
        date_ranges,
    })
}

/// Parse an RFC 3339 timestamp into UTC
pub fn parse_date(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|e| Error::InvalidDate(format!("\"{}\": {}", s, e)))
}

/// Format as `2020-01-01T00:00:00.000Z`
pub fn format_date(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}
