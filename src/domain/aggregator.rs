//! Runs the provider query for each classified category, in order.

use chrono::NaiveDate;
use serde_json::Value as JsonValue;

use super::classifier::Classification;
use super::{AggregatedResult, Category, QueryParams};
use crate::clients::DataProvider;
use crate::core::error::ToolError;

pub struct Aggregator<'a> {
    provider: &'a dyn DataProvider,
    today: NaiveDate,
}

impl<'a> Aggregator<'a> {
    pub fn new(provider: &'a dyn DataProvider) -> Self {
        Self { provider, today: chrono::Local::now().date_naive() }
    }

    /// Pin the reference date used for default lookback windows.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// One provider call with explicit arguments; missing ones get the
    /// category defaults.
    pub async fn execute(&self, category: Category, params: QueryParams) -> Result<JsonValue, ToolError> {
        let params = params.resolve(category, self.today);
        self.provider.execute_query(category, &params).await
    }

    /// Sequentially query every category of `classification`. The first
    /// provider failure aborts the whole aggregation.
    pub async fn aggregate(&self, classification: &Classification) -> Result<AggregatedResult, ToolError> {
        let mut result = AggregatedResult::default();
        for &category in &classification.categories {
            let params = QueryParams {
                min_amount: classification.min_amount.map(f64::from),
                ..Default::default()
            };
            tracing::debug!(%category, "executing category query");
            let output = self.execute(category, params).await.map_err(|e| {
                tracing::warn!(%category, error = %e, "aggregation aborted");
                e
            })?;
            if !result.executed.contains(&category) {
                result.executed.push(category);
            }
            result.data.insert(category.as_str().to_owned(), output);
        }
        tracing::debug!(executed = ?result.executed_names(), "aggregation complete");
        Ok(result)
    }
}
