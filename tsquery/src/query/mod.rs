//! Time-series query builder
//!
//! - [`types`]: the query description and its grouped-metrics result
//! - [`dsl`]: the typed search request tree
//! - [`builder`]: query → request
//! - [`response`]: raw response → result
//! - [`executor`]: build, search, reshape

pub mod builder;
pub mod dsl;
pub mod executor;
pub mod response;
pub mod types;

pub use builder::build_search_request;
pub use dsl::SearchRequest;
pub use executor::time_series_query;
pub use response::{parse_time_series_result, ALL_DOCUMENTS};
pub use types::{AggType, MetricPoint, TimeSeriesQuery, TimeSeriesResult, TimeSeriesResultRow};
