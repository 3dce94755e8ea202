//! Business-query domain: categories, per-query parameters and the
//! aggregated result handed to narration.

pub mod aggregator;
pub mod classifier;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Canonical query buckets. Declaration order is the classifier's rule order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Revenue,
    Product,
    Customer,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Revenue, Category::Product, Category::Customer];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Revenue => "revenue",
            Category::Product => "product",
            Category::Customer => "customer",
        }
    }

    /// Default lookback window applied when the caller gives no start date.
    pub fn lookback_days(&self) -> i64 {
        match self {
            Category::Revenue => 30,
            Category::Product => 90,
            Category::Customer => 60,
        }
    }

    /// Data-provider entry point bound to this category.
    pub fn entry_point(&self) -> &'static str {
        match self {
            Category::Revenue => "revenue_summary",
            Category::Product => "product_sales",
            Category::Customer => "customer_orders",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filters for one provider call. Unset fields fall back to category defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_amount: Option<f64>,
}

impl QueryParams {
    /// Fill the default start date and drop filters the category does not
    /// accept (category name is product-only, minimum amount customer-only).
    pub fn resolve(self, category: Category, today: NaiveDate) -> QueryParams {
        let start_date = self
            .start_date
            .unwrap_or_else(|| today - Duration::days(category.lookback_days()));
        QueryParams {
            start_date: Some(start_date),
            category: self.category.filter(|_| category == Category::Product),
            min_amount: self.min_amount.filter(|_| category == Category::Customer),
        }
    }
}

/// Outputs of every executed category, in classifier order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregatedResult {
    pub executed: Vec<Category>,
    pub data: serde_json::Map<String, JsonValue>,
}

impl AggregatedResult {
    pub fn get(&self, category: Category) -> Option<&JsonValue> {
        self.data.get(category.as_str())
    }

    pub fn executed_names(&self) -> Vec<&'static str> {
        self.executed.iter().map(Category::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn resolve_applies_category_lookback() {
        let today = day("2024-03-31");
        let rev = QueryParams::default().resolve(Category::Revenue, today);
        let prod = QueryParams::default().resolve(Category::Product, today);
        let cust = QueryParams::default().resolve(Category::Customer, today);
        assert_eq!(rev.start_date, Some(day("2024-03-01")));
        assert_eq!(prod.start_date, Some(day("2024-01-01")));
        assert_eq!(cust.start_date, Some(day("2024-01-31")));
    }

    #[test]
    fn resolve_keeps_explicit_date_and_drops_foreign_filters() {
        let params = QueryParams {
            start_date: Some(day("2023-06-01")),
            category: Some("Books".into()),
            min_amount: Some(200.0),
        };
        let rev = params.clone().resolve(Category::Revenue, day("2024-01-01"));
        assert_eq!(rev.start_date, Some(day("2023-06-01")));
        assert!(rev.category.is_none());
        assert!(rev.min_amount.is_none());

        let prod = params.clone().resolve(Category::Product, day("2024-01-01"));
        assert_eq!(prod.category.as_deref(), Some("Books"));
        assert!(prod.min_amount.is_none());

        let cust = params.resolve(Category::Customer, day("2024-01-01"));
        assert_eq!(cust.min_amount, Some(200.0));
        assert!(cust.category.is_none());
    }

    #[test]
    fn params_serialize_iso_dates_and_skip_unset_filters() {
        let p = QueryParams { start_date: Some(day("2024-02-29")), ..Default::default() };
        let v = serde_json::to_value(&p).unwrap();
        assert_eq!(v, serde_json::json!({"start_date": "2024-02-29"}));
    }

    #[test]
    fn categories_serialize_lowercase() {
        let v = serde_json::to_value(Category::ALL).unwrap();
        assert_eq!(v, serde_json::json!(["revenue", "product", "customer"]));
    }
}
