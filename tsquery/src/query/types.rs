//! Time-series query inputs and results

use crate::date_range::{get_date_range_info, DateRangeInfo, DateRangeParams};
use crate::duration::{is_valid_unit, DURATION_UNITS};
use crate::error::{Error, Result};
use crate::MAX_GROUPS;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Metric computed per date bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggType {
    Count,
    Avg,
    Min,
    Max,
    Sum,
}

impl AggType {
    pub const ALL: [AggType; 5] = [
        AggType::Count,
        AggType::Avg,
        AggType::Min,
        AggType::Max,
        AggType::Sum,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AggType::Count => "count",
            AggType::Avg => "avg",
            AggType::Min => "min",
            AggType::Max => "max",
            AggType::Sum => "sum",
        }
    }
}

impl fmt::Display for AggType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AggType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        AggType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| Error::InvalidQuery(format!("invalid aggType: \"{}\"", s)))
    }
}

/// A declarative time-series query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesQuery {
    /// Index name or pattern to search
    pub index: String,
    /// Date field used for the time filter and the date buckets
    pub time_field: String,
    pub date_start: String,
    pub date_end: String,
    /// Size of each bucket's window, in `time_window_unit`s
    pub time_window_size: u32,
    /// One of `s`, `m`, `h`, `d`
    pub time_window_unit: String,
    /// Distance between bucket end points; a single bucket when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<String>,
    pub agg_type: AggType,
    /// Required unless `agg_type` is `count`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agg_field: Option<String>,
    /// Group results by the terms of this field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term_field: Option<String>,
    /// Number of groups, defaults to [`crate::DEFAULT_GROUPS`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term_size: Option<usize>,
}

impl TimeSeriesQuery {
    /// Window literal, e.g. `5m`
    pub fn window(&self) -> String {
        format!("{}{}", self.time_window_size, self.time_window_unit)
    }

    pub fn is_count_agg(&self) -> bool {
        self.agg_type == AggType::Count
    }

    /// The grouping field, ignoring an empty string
    pub fn group_field(&self) -> Option<&str> {
        self.term_field.as_deref().filter(|f| !f.is_empty())
    }

    pub fn is_group_agg(&self) -> bool {
        self.group_field().is_some()
    }

    /// Partition `[date_start, date_end]` into the buckets of this query
    pub fn date_range_info(&self) -> Result<DateRangeInfo> {
        let window = self.window();
        get_date_range_info(&DateRangeParams {
            date_start: Some(&self.date_start),
            date_end: Some(&self.date_end),
            window: &window,
            interval: self.interval.as_deref(),
        })
    }

    /// Check the query is complete and consistent before it is sent.
    pub fn validate(&self) -> Result<()> {
        if self.index.trim().is_empty() {
            return Err(Error::InvalidQuery("[index]: must not be empty".to_string()));
        }
        if self.time_field.trim().is_empty() {
            return Err(Error::InvalidQuery(
                "[timeField]: must not be empty".to_string(),
            ));
        }
        if self.time_window_size < 1 {
            return Err(Error::InvalidQuery(
                "[timeWindowSize]: must be at least 1".to_string(),
            ));
        }
        if !is_valid_unit(&self.time_window_unit) {
            return Err(Error::InvalidQuery(format!(
                "[timeWindowUnit]: invalid unit \"{}\", expected one of {}",
                self.time_window_unit,
                DURATION_UNITS.join(", ")
            )));
        }
        if !self.is_count_agg() && self.agg_field.as_deref().is_none_or(str::is_empty) {
            return Err(Error::InvalidQuery(format!(
                "[aggField]: must have a value when [aggType] is \"{}\"",
                self.agg_type
            )));
        }
        if let Some(size) = self.term_size {
            if !(1..=MAX_GROUPS).contains(&size) {
                return Err(Error::InvalidQuery(format!(
                    "[termSize]: must be between 1 and {}",
                    MAX_GROUPS
                )));
            }
        }

        self.date_range_info().map(|_| ())
    }
}

/// One `[timestamp, value]` pair; the value is absent when the metric
/// aggregation reported none (e.g. `avg` over an empty bucket)
pub type MetricPoint = (String, Option<f64>);

/// Metrics of a single group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesResultRow {
    pub group: String,
    pub metrics: Vec<MetricPoint>,
}

impl TimeSeriesResultRow {
    /// The point of the most recent date bucket
    pub fn latest(&self) -> Option<&MetricPoint> {
        self.metrics.last()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesResult {
    pub results: Vec<TimeSeriesResultRow>,
}

impl TimeSeriesResult {
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
