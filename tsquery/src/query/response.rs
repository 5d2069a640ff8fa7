//! Reshaping of raw aggregation responses
//!
//! This is the only place that reads the search engine's response. Every
//! lookup is lenient: a missing or structurally unexpected field is treated
//! as absent, so a malformed response yields fewer rows or points rather than
//! an error.

use crate::query::builder::{DATE_AGG, GROUP_AGG, METRIC_AGG};
use crate::query::types::{MetricPoint, TimeSeriesResult, TimeSeriesResultRow};
use serde_json::Value;

/// Group name used when no grouping field was requested
pub const ALL_DOCUMENTS: &str = "all documents";

/// Map a raw search response into per-group metrics.
///
/// Without grouping, the top-level date buckets are reported as a single
/// [`ALL_DOCUMENTS`] row. Groups and points keep the order of the response.
pub fn parse_time_series_result(
    response: &Value,
    is_count_agg: bool,
    is_group_agg: bool,
) -> TimeSeriesResult {
    let aggregations = response.get("aggregations");

    let results = if is_group_agg {
        buckets(aggregations.and_then(|a| a.get(GROUP_AGG)))
            .iter()
            .map(|bucket| {
                parse_row(
                    group_name(bucket.get("key")),
                    bucket.get(DATE_AGG),
                    is_count_agg,
                )
            })
            .collect()
    } else {
        vec![parse_row(
            ALL_DOCUMENTS.to_string(),
            aggregations.and_then(|a| a.get(DATE_AGG)),
            is_count_agg,
        )]
    };

    TimeSeriesResult { results }
}

fn parse_row(group: String, date_agg: Option<&Value>, is_count_agg: bool) -> TimeSeriesResultRow {
    let metrics = buckets(date_agg)
        .iter()
        .map(|bucket| parse_point(bucket, is_count_agg))
        .collect();

    TimeSeriesResultRow { group, metrics }
}

fn parse_point(bucket: &Value, is_count_agg: bool) -> MetricPoint {
    let date = bucket
        .get("to_as_string")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let value = if is_count_agg {
        bucket.get("doc_count").and_then(Value::as_f64)
    } else {
        bucket
            .get(METRIC_AGG)
            .and_then(|m| m.get("value"))
            .and_then(Value::as_f64)
    };

    (date, value)
}

/// The `buckets` array of an aggregation, empty when absent
fn buckets(agg: Option<&Value>) -> &[Value] {
    agg.and_then(|a| a.get("buckets"))
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// Terms keys may be strings, numbers or booleans; integral numbers are
/// rendered without a fractional part.
fn group_name(key: Option<&Value>) -> String {
    match key {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => match n.as_f64() {
            Some(f)
                if n.is_f64()
                    && f.fract() == 0.0
                    && f >= i64::MIN as f64
                    && f < i64::MAX as f64 =>
            {
                format!("{}", f as i64)
            }
            _ => n.to_string(),
        },
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}
