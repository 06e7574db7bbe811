//! Feature transformations
//!
//! A transformation describes how a feature value is computed from the
//! records of its source: either a row-level SQL-like expression or a
//! sliding-window aggregation.

use crate::error::{DefinitionError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a feature's value is computed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Transformation {
    /// Row-level expression
    Expression(ExpressionTransformation),

    /// Aggregation over a trailing time window
    WindowAgg(WindowAggTransformation),
}

impl Transformation {
    pub fn expression(expr: impl Into<String>) -> Self {
        Transformation::Expression(ExpressionTransformation::new(expr))
    }

    pub fn is_window_agg(&self) -> bool {
        matches!(self, Transformation::WindowAgg(_))
    }
}

impl From<&str> for Transformation {
    fn from(expr: &str) -> Self {
        Transformation::expression(expr)
    }
}

impl From<String> for Transformation {
    fn from(expr: String) -> Self {
        Transformation::expression(expr)
    }
}

impl From<ExpressionTransformation> for Transformation {
    fn from(t: ExpressionTransformation) -> Self {
        Transformation::Expression(t)
    }
}

impl From<WindowAggTransformation> for Transformation {
    fn from(t: WindowAggTransformation) -> Self {
        Transformation::WindowAgg(t)
    }
}

/// Row-level expression, e.g. `cast_float(trip_distance) > 30`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpressionTransformation {
    pub expr: String,
}

impl ExpressionTransformation {
    pub fn new(expr: impl Into<String>) -> Self {
        Self { expr: expr.into() }
    }
}

/// Aggregation functions understood by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AggregationFunction {
    Sum,
    Count,
    Max,
    Min,
    Avg,
    MaxPooling,
    MinPooling,
    AvgPooling,
    Latest,
}

impl AggregationFunction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AggregationFunction::Sum => "SUM",
            AggregationFunction::Count => "COUNT",
            AggregationFunction::Max => "MAX",
            AggregationFunction::Min => "MIN",
            AggregationFunction::Avg => "AVG",
            AggregationFunction::MaxPooling => "MAX_POOLING",
            AggregationFunction::MinPooling => "MIN_POOLING",
            AggregationFunction::AvgPooling => "AVG_POOLING",
            AggregationFunction::Latest => "LATEST",
        }
    }
}

impl fmt::Display for AggregationFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AggregationFunction {
    type Err = DefinitionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "SUM" => Ok(AggregationFunction::Sum),
            "COUNT" => Ok(AggregationFunction::Count),
            "MAX" => Ok(AggregationFunction::Max),
            "MIN" => Ok(AggregationFunction::Min),
            "AVG" => Ok(AggregationFunction::Avg),
            "MAX_POOLING" => Ok(AggregationFunction::MaxPooling),
            "MIN_POOLING" => Ok(AggregationFunction::MinPooling),
            "AVG_POOLING" => Ok(AggregationFunction::AvgPooling),
            "LATEST" => Ok(AggregationFunction::Latest),
            _ => Err(DefinitionError::InvalidAggregation(s.to_string())),
        }
    }
}

/// Sliding-window aggregation: `agg_func(agg_expr)` over the trailing
/// `window` ending at each observation's timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowAggTransformation {
    /// Expression evaluated per record before aggregating
    pub agg_expr: String,

    pub agg_func: AggregationFunction,

    /// Window length as written, e.g. `90d`
    pub window: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_by: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl WindowAggTransformation {
    /// Create a window aggregation.
    ///
    /// Fails on an unknown aggregation function or a window that is not a
    /// positive integer followed by one of `d`, `h`, `m`, `s`.
    pub fn new(agg_expr: impl Into<String>, agg_func: &str, window: impl Into<String>) -> Result<Self> {
        let window = window.into();
        validate_window(&window)?;

        Ok(Self {
            agg_expr: agg_expr.into(),
            agg_func: agg_func.parse()?,
            window,
            group_by: None,
            filter: None,
            limit: None,
        })
    }

    pub fn with_group_by(mut self, group_by: impl Into<String>) -> Self {
        self.group_by = Some(group_by.into());
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

fn validate_window(window: &str) -> Result<()> {
    let invalid = |message: &str| DefinitionError::InvalidWindow {
        window: window.to_string(),
        message: message.to_string(),
    };

    let unit = window.chars().last().ok_or_else(|| invalid("window cannot be empty"))?;
    if !matches!(unit, 'd' | 'h' | 'm' | 's') {
        return Err(invalid("unit must be one of d, h, m, s"));
    }

    let amount = &window[..window.len() - 1];
    match amount.parse::<u64>() {
        Ok(n) if n > 0 && amount.chars().all(|c| c.is_ascii_digit()) => Ok(()),
        _ => Err(invalid("length must be a positive integer")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_becomes_expression() {
        let t: Transformation = "trip_distance".into();
        assert_eq!(t, Transformation::expression("trip_distance"));
        assert!(!t.is_window_agg());
    }

    #[test]
    fn test_window_agg_keeps_window_verbatim() {
        let agg = WindowAggTransformation::new("cast_float(fare_amount)", "AVG", "90d").unwrap();
        assert_eq!(agg.agg_func, AggregationFunction::Avg);
        assert_eq!(agg.window, "90d");
        assert!(agg.group_by.is_none());
    }

    #[test]
    fn test_aggregation_function_is_case_insensitive() {
        assert_eq!("max_pooling".parse::<AggregationFunction>(), Ok(AggregationFunction::MaxPooling));
        assert_eq!(AggregationFunction::MaxPooling.to_string(), "MAX_POOLING");
    }

    #[test]
    fn test_unknown_aggregation_rejected() {
        let err = WindowAggTransformation::new("x", "MEDIAN", "1d").unwrap_err();
        assert_eq!(err, DefinitionError::InvalidAggregation("MEDIAN".to_string()));
    }

    #[test]
    fn test_malformed_windows_rejected() {
        for window in ["", "d", "90", "0d", "-3h", "1w", "1.5h", "+2m"] {
            let result = WindowAggTransformation::new("x", "SUM", window);
            assert!(
                matches!(result, Err(DefinitionError::InvalidWindow { .. })),
                "window {:?} should be rejected",
                window
            );
        }
    }

    #[test]
    fn test_optional_window_fields() {
        let agg = WindowAggTransformation::new("amount", "SUM", "7d")
            .unwrap()
            .with_group_by("category")
            .with_filter("amount > 0")
            .with_limit(10);

        assert_eq!(agg.group_by.as_deref(), Some("category"));
        assert_eq!(agg.filter.as_deref(), Some("amount > 0"));
        assert_eq!(agg.limit, Some(10));
    }
}
