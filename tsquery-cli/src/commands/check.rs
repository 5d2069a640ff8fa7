use super::query::print_json;
use super::QueryArgs;
use anyhow::Result;
use tsquery::threshold::evaluate;
use tsquery::{time_series_query, Comparator, SearchClient};

/// Run the query and report the groups whose latest value crosses the threshold.
///
/// Returns the number of matching groups.
pub async fn run_check(
    client: &dyn SearchClient,
    args: QueryArgs,
    comparator: Comparator,
    threshold: &[f64],
    pretty: bool,
) -> Result<usize> {
    comparator.validate_threshold(threshold)?;
    let query = args.into_query()?;
    query.validate()?;

    let result = time_series_query(client, &query).await;
    let matches = evaluate(&result, comparator, threshold)?;

    tracing::info!(
        "{} of {} group(s) matched {} {:?}",
        matches.len(),
        result.results.len(),
        comparator,
        threshold
    );

    print_json(&matches, pretty)?;
    Ok(matches.len())
}
