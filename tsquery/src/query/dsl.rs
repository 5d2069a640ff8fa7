//! Elasticsearch Query DSL types
//!
//! The subset of the DSL a time-series query sends: a bool filter with a
//! range clause, terms and date-range bucket aggregations, and single-value
//! metric aggregations. Aggregations form an explicit tree; serializing the
//! root yields the request body in one pass.

use crate::date_range::DateRange;
use crate::query::types::AggType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Named sub-aggregations of a request body or bucket aggregation
pub type Aggregations = BTreeMap<String, EsAggregation>;

/// A search request: target index, body and request options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub index: String,
    pub body: SearchBody,
    /// Ignore missing or closed indices
    pub ignore_unavailable: bool,
    /// Succeed when the index pattern matches nothing
    pub allow_no_indices: bool,
    /// HTTP statuses that return their body instead of failing
    #[serde(default)]
    pub ignore: Vec<u16>,
}

/// Root ES search request body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchBody {
    /// Number of hits to return; 0 for aggregations only
    pub size: usize,
    pub query: EsQuery,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub aggs: Aggregations,
}

/// ES Query types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EsQuery {
    /// Bool query (filter context only)
    Bool(BoolQuery),

    /// Range query
    Range(BTreeMap<String, RangeParams>),
}

impl EsQuery {
    /// `{"bool": {"filter": <query>}}`
    pub fn filter(query: EsQuery) -> Self {
        EsQuery::Bool(BoolQuery {
            filter: Some(Box::new(query)),
        })
    }

    /// `{"range": {<field>: <params>}}`
    pub fn range(field: impl Into<String>, params: RangeParams) -> Self {
        EsQuery::Range(BTreeMap::from([(field.into(), params)]))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoolQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Box<EsQuery>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RangeParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gte: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

/// An aggregation node and its sub-aggregations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EsAggregation {
    #[serde(flatten)]
    pub kind: AggregationKind,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub aggs: Aggregations,
}

impl EsAggregation {
    pub fn new(kind: AggregationKind) -> Self {
        Self {
            kind,
            aggs: Aggregations::new(),
        }
    }

    pub fn with_aggs(mut self, aggs: Aggregations) -> Self {
        self.aggs = aggs;
        self
    }

    pub fn with_agg(mut self, name: impl Into<String>, agg: EsAggregation) -> Self {
        self.aggs.insert(name.into(), agg);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationKind {
    // Bucket aggregations
    Terms(TermsAgg),
    DateRange(DateRangeAgg),

    // Metric aggregations
    Avg(FieldAgg),
    Min(FieldAgg),
    Max(FieldAgg),
    Sum(FieldAgg),
}

impl AggregationKind {
    /// The single-value metric for `agg_type`; `None` for `count`, which
    /// reads bucket document counts instead.
    pub fn metric(agg_type: AggType, field: &str) -> Option<Self> {
        let field = FieldAgg {
            field: field.to_string(),
        };
        match agg_type {
            AggType::Count => None,
            AggType::Avg => Some(AggregationKind::Avg(field)),
            AggType::Min => Some(AggregationKind::Min(field)),
            AggType::Max => Some(AggregationKind::Max(field)),
            AggType::Sum => Some(AggregationKind::Sum(field)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldAgg {
    pub field: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermsAgg {
    pub field: String,
    pub size: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<BTreeMap<String, SortOrder>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateRangeAgg {
    pub field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    pub ranges: Vec<DateRange>,
}
