use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::json;
use std::sync::Arc;

use crate::clients::DataProvider;
use crate::core::error::ToolError;
use crate::core::tool::{opt_f64, opt_str, JsonObject, Tool, ToolSpec};
use crate::domain::aggregator::Aggregator;
use crate::domain::{Category, QueryParams};
use crate::infra::http::json::to_pretty_text;

/// Direct metric lookup: structured arguments go straight to the provider
/// entry point for one category; the raw output is returned as JSON text.
#[derive(Clone)]
pub struct MetricTool {
    category: Category,
    provider: Arc<dyn DataProvider>,
}

impl MetricTool {
    pub fn new(category: Category, provider: Arc<dyn DataProvider>) -> Self {
        Self { category, provider }
    }

    /// One tool per category, in category order.
    pub fn all(provider: Arc<dyn DataProvider>) -> Vec<MetricTool> {
        Category::ALL
            .into_iter()
            .map(|c| MetricTool::new(c, provider.clone()))
            .collect()
    }

    fn params(&self, arguments: &JsonObject) -> Result<QueryParams, ToolError> {
        let start_date = opt_str(arguments, "start_date")?
            .map(|s| {
                NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| {
                    ToolError::InvalidArguments(format!("start_date '{s}' is not YYYY-MM-DD"))
                })
            })
            .transpose()?;
        let mut params = QueryParams { start_date, ..Default::default() };
        match self.category {
            Category::Revenue => {}
            // empty category and zero amount mean "no filter"
            Category::Product => {
                params.category = opt_str(arguments, "category")?
                    .filter(|c| !c.is_empty())
                    .map(str::to_owned)
            }
            Category::Customer => {
                params.min_amount = opt_f64(arguments, "min_amount")?.filter(|m| *m != 0.0)
            }
        }
        Ok(params)
    }
}

fn start_date_schema() -> serde_json::Value {
    json!({
        "type": "string",
        "description": "Start date in YYYY-MM-DD format",
        "format": "date"
    })
}

impl ToolSpec for MetricTool {
    fn name(&self) -> &'static str {
        match self.category {
            Category::Revenue => "get_revenue_summary",
            Category::Product => "get_product_performance",
            Category::Customer => "get_customer_orders",
        }
    }

    fn description(&self) -> &'static str {
        match self.category {
            Category::Revenue => "Get revenue summary for a specific time period",
            Category::Product => "Get product sales performance data",
            Category::Customer => "Get customer order data",
        }
    }

    fn input_schema(&self) -> serde_json::Value {
        let mut properties = serde_json::Map::new();
        properties.insert("start_date".into(), start_date_schema());
        match self.category {
            Category::Revenue => {}
            Category::Product => {
                properties.insert(
                    "category".into(),
                    json!({ "type": "string", "description": "Product category to filter by" }),
                );
            }
            Category::Customer => {
                properties.insert(
                    "min_amount".into(),
                    json!({ "type": "number", "description": "Minimum order amount to filter by" }),
                );
            }
        }
        json!({ "type": "object", "properties": properties })
    }
}

#[async_trait]
impl Tool for MetricTool {
    async fn call(&self, arguments: &JsonObject) -> Result<String, ToolError> {
        let params = self.params(arguments)?;
        let data = Aggregator::new(self.provider.as_ref())
            .execute(self.category, params)
            .await?;
        Ok(to_pretty_text(&data))
    }
}
