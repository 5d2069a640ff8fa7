//! Time-series query execution

use crate::client::SearchClient;
use crate::query::response::parse_time_series_result;
use crate::query::types::{TimeSeriesQuery, TimeSeriesResult};
use tracing::{debug, warn};

const LOG_PREFIX: &str = "time_series_query: search";

/// Run `query` against `client` and reshape the response.
///
/// Never fails: an invalid query or a failed search is logged as a warning
/// and reported as an empty result, which callers treat as "no data".
pub async fn time_series_query<C>(client: &C, query: &TimeSeriesQuery) -> TimeSeriesResult
where
    C: SearchClient + ?Sized,
{
    let request = match query.to_search_request() {
        Ok(request) => request,
        Err(e) => {
            warn!("{} invalid query: {}", LOG_PREFIX, e);
            return TimeSeriesResult::default();
        }
    };

    debug!(
        "{} call: {}",
        LOG_PREFIX,
        serde_json::to_string(&request).unwrap_or_default()
    );

    let response = match client.search(&request).await {
        Ok(response) => response,
        Err(e) => {
            warn!("{} error: {}", LOG_PREFIX, e);
            return TimeSeriesResult::default();
        }
    };

    debug!("{} result: {}", LOG_PREFIX, response);

    parse_time_series_result(&response, query.is_count_agg(), query.is_group_agg())
}
