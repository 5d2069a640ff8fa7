use super::QueryArgs;
use anyhow::Result;
use tsquery::{time_series_query, SearchClient};

/// Run the query and print the grouped metrics as JSON
pub async fn run_query(client: &dyn SearchClient, args: QueryArgs, pretty: bool) -> Result<()> {
    let query = args.into_query()?;
    query.validate()?;

    tracing::info!(
        "Querying {} ({} over {} windows)",
        query.index,
        query.agg_type,
        query.window()
    );

    let result = time_series_query(client, &query).await;
    tracing::info!("{} group(s) returned", result.results.len());

    print_json(&result, pretty)
}

/// Print the search request the query would send, without sending it
pub fn run_explain(args: QueryArgs, pretty: bool) -> Result<()> {
    let query = args.into_query()?;
    let request = query.to_search_request()?;
    print_json(&request, pretty)
}

pub(crate) fn print_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", out);
    Ok(())
}
