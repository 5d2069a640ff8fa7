//! Search request construction for time-series queries

use crate::date_range::DateRangeInfo;
use crate::error::{Error, Result};
use crate::query::dsl::{
    AggregationKind, Aggregations, DateRangeAgg, EsAggregation, EsQuery, RangeParams,
    SearchBody, SearchRequest, SortOrder, TermsAgg,
};
use crate::query::types::{AggType, TimeSeriesQuery};
use crate::DEFAULT_GROUPS;
use std::collections::BTreeMap;

/// Terms aggregation over the grouping field
pub const GROUP_AGG: &str = "groupAgg";
/// Date-range aggregation over the time field
pub const DATE_AGG: &str = "dateAgg";
/// Metric that orders the groups
pub const SORT_VALUE_AGG: &str = "sortValueAgg";
/// Metric reported for each date bucket
pub const METRIC_AGG: &str = "metricAgg";

pub const DATE_FORMAT: &str = "strict_date_time";

/// Statuses returned as empty responses instead of errors
pub const IGNORED_STATUSES: [u16; 1] = [404];

/// Build the search request for `query` over the partitioned date ranges.
///
/// Fails only when a metric aggregation has no field to aggregate.
pub fn build_search_request(
    query: &TimeSeriesQuery,
    date_range_info: &DateRangeInfo,
) -> Result<SearchRequest> {
    let metric = match query.agg_type {
        AggType::Count => None,
        agg_type => {
            let field = query
                .agg_field
                .as_deref()
                .filter(|f| !f.is_empty())
                .ok_or_else(|| {
                    Error::InvalidQuery(format!(
                        "[aggField]: must have a value when [aggType] is \"{}\"",
                        agg_type
                    ))
                })?;
            AggregationKind::metric(agg_type, field)
        }
    };

    let mut date_agg = EsAggregation::new(AggregationKind::DateRange(DateRangeAgg {
        field: query.time_field.clone(),
        format: Some(DATE_FORMAT.to_string()),
        ranges: date_range_info.date_ranges.clone(),
    }));
    if let Some(metric) = &metric {
        date_agg = date_agg.with_agg(METRIC_AGG, EsAggregation::new(metric.clone()));
    }

    let aggs = match query.group_field() {
        Some(term_field) => {
            let mut group_level = Aggregations::from([(DATE_AGG.to_string(), date_agg)]);
            let order = metric.map(|metric| {
                group_level.insert(SORT_VALUE_AGG.to_string(), EsAggregation::new(metric));
                BTreeMap::from([(SORT_VALUE_AGG.to_string(), sort_order(query.agg_type))])
            });

            let group_agg = EsAggregation::new(AggregationKind::Terms(TermsAgg {
                field: term_field.to_string(),
                size: query.term_size.unwrap_or(DEFAULT_GROUPS),
                order,
            }))
            .with_aggs(group_level);

            Aggregations::from([(GROUP_AGG.to_string(), group_agg)])
        }
        None => Aggregations::from([(DATE_AGG.to_string(), date_agg)]),
    };

    let filter = EsQuery::filter(EsQuery::range(
        query.time_field.clone(),
        RangeParams {
            gte: Some(date_range_info.date_start.clone()),
            lt: Some(date_range_info.date_end.clone()),
            format: Some(DATE_FORMAT.to_string()),
        },
    ));

    Ok(SearchRequest {
        index: query.index.clone(),
        body: SearchBody {
            size: 0,
            query: filter,
            aggs,
        },
        ignore_unavailable: true,
        allow_no_indices: true,
        ignore: IGNORED_STATUSES.to_vec(),
    })
}

/// Smallest values first for `min`, largest first for everything else
fn sort_order(agg_type: AggType) -> SortOrder {
    match agg_type {
        AggType::Min => SortOrder::Asc,
        _ => SortOrder::Desc,
    }
}

impl TimeSeriesQuery {
    /// Validate, partition and build the request this query would send.
    pub fn to_search_request(&self) -> Result<SearchRequest> {
        self.validate()?;
        let date_range_info = self.date_range_info()?;
        build_search_request(self, &date_range_info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date_range::DateRange;
    use serde_json::{json, Value};

    fn info() -> DateRangeInfo {
        DateRangeInfo {
            date_start: "2020-01-01T00:00:00.000Z".to_string(),
            date_end: "2020-01-01T03:00:00.000Z".to_string(),
            date_ranges: vec![
                DateRange {
                    from: "2020-01-01T00:00:00.000Z".to_string(),
                    to: "2020-01-01T01:00:00.000Z".to_string(),
                },
                DateRange {
                    from: "2020-01-01T01:00:00.000Z".to_string(),
                    to: "2020-01-01T02:00:00.000Z".to_string(),
                },
                DateRange {
                    from: "2020-01-01T02:00:00.000Z".to_string(),
                    to: "2020-01-01T03:00:00.000Z".to_string(),
                },
            ],
        }
    }

    fn query(agg_type: AggType, agg_field: Option<&str>, term_field: Option<&str>) -> TimeSeriesQuery {
        TimeSeriesQuery {
            index: "index-name".to_string(),
            time_field: "time-field".to_string(),
            date_start: "2020-01-01T01:00:00.000Z".to_string(),
            date_end: "2020-01-01T03:00:00.000Z".to_string(),
            time_window_size: 1,
            time_window_unit: "h".to_string(),
            interval: Some("1h".to_string()),
            agg_type,
            agg_field: agg_field.map(String::from),
            term_field: term_field.map(String::from),
            term_size: None,
        }
    }

    fn request_json(q: &TimeSeriesQuery) -> Value {
        serde_json::to_value(build_search_request(q, &info()).unwrap()).unwrap()
    }

    #[test]
    fn test_count_ungrouped_request() {
        let json = request_json(&query(AggType::Count, None, None));
        assert_eq!(
            json,
            json!({
                "index": "index-name",
                "body": {
                    "size": 0,
                    "query": {
                        "bool": {
                            "filter": {
                                "range": {
                                    "time-field": {
                                        "gte": "2020-01-01T00:00:00.000Z",
                                        "lt": "2020-01-01T03:00:00.000Z",
                                        "format": "strict_date_time"
                                    }
                                }
                            }
                        }
                    },
                    "aggs": {
                        "dateAgg": {
                            "date_range": {
                                "field": "time-field",
                                "format": "strict_date_time",
                                "ranges": [
                                    {"from": "2020-01-01T00:00:00.000Z", "to": "2020-01-01T01:00:00.000Z"},
                                    {"from": "2020-01-01T01:00:00.000Z", "to": "2020-01-01T02:00:00.000Z"},
                                    {"from": "2020-01-01T02:00:00.000Z", "to": "2020-01-01T03:00:00.000Z"}
                                ]
                            }
                        }
                    }
                },
                "ignore_unavailable": true,
                "allow_no_indices": true,
                "ignore": [404]
            })
        );
    }

    #[test]
    fn test_avg_ungrouped_request_nests_metric_in_date_agg() {
        let json = request_json(&query(AggType::Avg, Some("duration"), None));
        let aggs = &json["body"]["aggs"];
        assert_eq!(
            aggs["dateAgg"]["aggs"]["metricAgg"],
            json!({"avg": {"field": "duration"}})
        );
        assert!(aggs.get("groupAgg").is_none());
        assert!(aggs.get("sortValueAgg").is_none());
    }

    #[test]
    fn test_count_grouped_request_has_no_order() {
        let json = request_json(&query(AggType::Count, None, Some("host")));
        let group_agg = &json["body"]["aggs"]["groupAgg"];
        assert_eq!(group_agg["terms"], json!({"field": "host", "size": 100}));
        assert!(group_agg["aggs"]["dateAgg"].is_object());
        assert!(group_agg["aggs"].get("sortValueAgg").is_none());
        assert!(group_agg["aggs"]["dateAgg"].get("aggs").is_none());
        assert!(json["body"]["aggs"].get("dateAgg").is_none());
    }

    #[test]
    fn test_grouped_min_sorts_ascending() {
        let json = request_json(&query(AggType::Min, Some("latency"), Some("host")));
        let group_agg = &json["body"]["aggs"]["groupAgg"];
        assert_eq!(group_agg["terms"]["order"], json!({"sortValueAgg": "asc"}));
        assert_eq!(
            group_agg["aggs"]["sortValueAgg"],
            json!({"min": {"field": "latency"}})
        );
        assert_eq!(
            group_agg["aggs"]["dateAgg"]["aggs"]["metricAgg"],
            json!({"min": {"field": "latency"}})
        );
    }

    #[test]
    fn test_grouped_other_metrics_sort_descending() {
        for agg_type in [AggType::Max, AggType::Avg, AggType::Sum] {
            let json = request_json(&query(agg_type, Some("latency"), Some("host")));
            assert_eq!(
                json["body"]["aggs"]["groupAgg"]["terms"]["order"],
                json!({"sortValueAgg": "desc"}),
                "{}",
                agg_type
            );
        }
    }

    #[test]
    fn test_term_size_overrides_default() {
        let mut q = query(AggType::Count, None, Some("host"));
        q.term_size = Some(7);
        let json = request_json(&q);
        assert_eq!(json["body"]["aggs"]["groupAgg"]["terms"]["size"], 7);
    }

    #[test]
    fn test_missing_agg_field_is_rejected() {
        let err = build_search_request(&query(AggType::Max, None, None), &info()).unwrap_err();
        assert!(matches!(err, Error::InvalidQuery(_)));
    }

    #[test]
    fn test_to_search_request_partitions_dates() {
        let request = query(AggType::Count, None, None).to_search_request().unwrap();
        match &request.body.aggs[DATE_AGG].kind {
            AggregationKind::DateRange(d) => {
                assert_eq!(d.ranges.len(), 3);
                assert_eq!(d.ranges[0].from, "2020-01-01T00:00:00.000Z");
                assert_eq!(d.ranges[2].to, "2020-01-01T03:00:00.000Z");
            }
            other => panic!("Expected DateRange, got {:?}", other),
        }
    }
}
