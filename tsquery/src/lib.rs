//! Time-series queries over Elasticsearch-compatible indices
//!
//! Turns a declarative [`TimeSeriesQuery`] into a search request built from
//! date-range buckets (optionally grouped by a terms aggregation), executes
//! it through a [`SearchClient`], and reshapes the aggregation response into
//! a [`TimeSeriesResult`] of per-group metrics.
//!
//! # Example
//!
//! ```no_run
//! use tsquery::{time_series_query, AggType, HttpSearchClient, TimeSeriesQuery};
//!
//! # async fn run() -> tsquery::Result<()> {
//! let client = HttpSearchClient::new("http://localhost:9200")?;
//! let query = TimeSeriesQuery {
//!     index: "logs-*".to_string(),
//!     time_field: "@timestamp".to_string(),
//!     date_start: "2020-01-01T00:00:00.000Z".to_string(),
//!     date_end: "2020-01-01T01:00:00.000Z".to_string(),
//!     time_window_size: 5,
//!     time_window_unit: "m".to_string(),
//!     interval: Some("15m".to_string()),
//!     agg_type: AggType::Avg,
//!     agg_field: Some("duration".to_string()),
//!     term_field: Some("host.name".to_string()),
//!     term_size: None,
//! };
//! let result = time_series_query(&client, &query).await;
//! for row in result.results {
//!     println!("{}: {:?}", row.group, row.metrics);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod date_range;
pub mod duration;
pub mod error;
pub mod query;
pub mod threshold;

pub use client::{HttpSearchClient, SearchClient};
pub use config::Config;
pub use date_range::{get_date_range_info, DateRange, DateRangeInfo, DateRangeParams};
pub use error::{Error, Result};
pub use query::{
    build_search_request, parse_time_series_result, time_series_query, AggType, SearchRequest,
    TimeSeriesQuery, TimeSeriesResult, TimeSeriesResultRow,
};
pub use threshold::{Comparator, ThresholdMatch};

/// Number of groups returned when a query does not set `term_size`
pub const DEFAULT_GROUPS: usize = 100;

/// Upper bound accepted for `term_size`
pub const MAX_GROUPS: usize = 1000;

/// Upper bound on the number of date ranges a single query may produce
pub const MAX_INTERVALS: usize = 1000;
