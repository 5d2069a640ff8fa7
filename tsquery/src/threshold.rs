//! Threshold evaluation over time-series results
//!
//! Compares the most recent value of each group against one threshold (for
//! `>`, `<`, `>=`, `<=`) or a pair of bounds (for `between`, `notBetween`,
//! both inclusive of the bounds for `between`).

use crate::error::{Error, Result};
use crate::query::TimeSeriesResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparator {
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Lte,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Gte,
    #[serde(rename = "between")]
    Between,
    #[serde(rename = "notBetween")]
    NotBetween,
}

impl Comparator {
    pub const ALL: [Comparator; 6] = [
        Comparator::Lt,
        Comparator::Lte,
        Comparator::Gt,
        Comparator::Gte,
        Comparator::Between,
        Comparator::NotBetween,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Comparator::Lt => "<",
            Comparator::Lte => "<=",
            Comparator::Gt => ">",
            Comparator::Gte => ">=",
            Comparator::Between => "between",
            Comparator::NotBetween => "notBetween",
        }
    }

    /// Number of threshold values the comparator takes
    pub fn arity(&self) -> usize {
        match self {
            Comparator::Between | Comparator::NotBetween => 2,
            _ => 1,
        }
    }

    pub fn validate_threshold(&self, threshold: &[f64]) -> Result<()> {
        if threshold.len() != self.arity() {
            return Err(Error::InvalidThreshold(format!(
                "comparator \"{}\" takes {} threshold value(s), got {}",
                self,
                self.arity(),
                threshold.len()
            )));
        }
        if threshold.iter().any(|t| t.is_nan()) {
            return Err(Error::InvalidThreshold("threshold must not be NaN".to_string()));
        }
        Ok(())
    }

    /// Compare `value` against an already validated `threshold`
    fn compare(&self, value: f64, threshold: &[f64]) -> bool {
        match (self, threshold) {
            (Comparator::Lt, [t]) => value < *t,
            (Comparator::Lte, [t]) => value <= *t,
            (Comparator::Gt, [t]) => value > *t,
            (Comparator::Gte, [t]) => value >= *t,
            (Comparator::Between, [lo, hi]) => value >= *lo && value <= *hi,
            (Comparator::NotBetween, [lo, hi]) => value < *lo || value > *hi,
            _ => false,
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Comparator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Comparator::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| Error::InvalidThreshold(format!("invalid comparator: \"{}\"", s)))
    }
}

/// A group whose latest value satisfied the threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdMatch {
    pub group: String,
    pub value: f64,
    /// End of the date bucket the value came from
    pub date: String,
}

/// Groups of `result` whose latest value matches `comparator` and `threshold`.
///
/// Groups with no points, or whose latest point has no value, never match.
pub fn evaluate(
    result: &TimeSeriesResult,
    comparator: Comparator,
    threshold: &[f64],
) -> Result<Vec<ThresholdMatch>> {
    comparator.validate_threshold(threshold)?;

    let matches = result
        .results
        .iter()
        .filter_map(|row| {
            let (date, value) = row.latest()?;
            let value = (*value)?;
            comparator
                .compare(value, threshold)
                .then(|| ThresholdMatch {
                    group: row.group.clone(),
                    value,
                    date: date.clone(),
                })
        })
        .collect();

    Ok(matches)
}
