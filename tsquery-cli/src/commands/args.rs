use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use tsquery::date_range::format_date;
use tsquery::{AggType, TimeSeriesQuery};

/// Time-series query, from flags or from a JSON file
#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    /// Read the query from a JSON file (camelCase fields) instead of flags
    #[arg(long, conflicts_with_all = ["index", "agg_field", "term_field", "term_size", "interval"])]
    pub file: Option<PathBuf>,

    /// Index name or pattern
    #[arg(short, long, required_unless_present = "file")]
    pub index: Option<String>,

    /// Date field to filter and bucket on
    #[arg(long, default_value = "@timestamp")]
    pub time_field: String,

    /// Start of the queried span (RFC 3339), defaults to the end
    #[arg(long)]
    pub date_start: Option<String>,

    /// End of the queried span (RFC 3339), defaults to now
    #[arg(long)]
    pub date_end: Option<String>,

    /// Size of each bucket's window
    #[arg(long, default_value_t = 5)]
    pub window_size: u32,

    /// Window unit: s, m, h or d
    #[arg(long, default_value = "m")]
    pub window_unit: String,

    /// Distance between bucket end points, e.g. 1h
    #[arg(long)]
    pub interval: Option<String>,

    /// count, avg, min, max or sum
    #[arg(long, default_value = "count")]
    pub agg_type: AggType,

    /// Field to aggregate, required unless agg_type is count
    #[arg(long)]
    pub agg_field: Option<String>,

    /// Group by the terms of this field
    #[arg(long)]
    pub term_field: Option<String>,

    /// Number of groups to return
    #[arg(long)]
    pub term_size: Option<usize>,
}

impl QueryArgs {
    pub fn into_query(self) -> Result<TimeSeriesQuery> {
        if let Some(path) = self.file {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read query file {:?}", path))?;
            return serde_json::from_str(&content)
                .with_context(|| format!("Invalid query file {:?}", path));
        }

        let date_end = self
            .date_end
            .unwrap_or_else(|| format_date(chrono::Utc::now()));
        let date_start = self.date_start.unwrap_or_else(|| date_end.clone());

        Ok(TimeSeriesQuery {
            index: self.index.unwrap_or_default(),
            time_field: self.time_field,
            date_start,
            date_end,
            time_window_size: self.window_size,
            time_window_unit: self.window_unit,
            interval: self.interval,
            agg_type: self.agg_type,
            agg_field: self.agg_field,
            term_field: self.term_field,
            term_size: self.term_size,
        })
    }
}
