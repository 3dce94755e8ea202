//! Free-text classification into query categories.

use super::Category;

/// Ordered (category, keywords) rules. Output order follows this table.
const RULES: &[(Category, &[&str])] = &[
    (
        Category::Revenue,
        &["revenue", "sales", "performance", "trends", "summary", "business"],
    ),
    (
        Category::Product,
        &["product", "bestseller", "category", "inventory", "items"],
    ),
    (
        Category::Customer,
        &["customer", "order", "high value", "vip", "spending"],
    ),
];

/// Used when no rule matches ("general overview").
const FALLBACK: [Category; 2] = [Category::Revenue, Category::Product];

/// Amount literals recognised in customer queries, in priority order.
///
/// This only knows these two values. It is a placeholder and not a numeric
/// parser: "over $350" yields no minimum.
const AMOUNT_LITERALS: &[(&str, u32)] = &[("200", 200), ("500", 500)];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub categories: Vec<Category>,
    pub min_amount: Option<u32>,
}

impl Classification {
    pub fn contains(&self, category: Category) -> bool {
        self.categories.contains(&category)
    }
}

pub fn classify(text: &str) -> Classification {
    let lowered = text.to_lowercase();

    let categories: Vec<Category> = RULES
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|k| lowered.contains(k)))
        .map(|(category, _)| *category)
        .collect();

    if categories.is_empty() {
        tracing::debug!("no category keywords matched; using general overview");
        return Classification { categories: FALLBACK.to_vec(), min_amount: None };
    }

    let min_amount = if categories.contains(&Category::Customer) {
        min_amount(text, &lowered)
    } else {
        None
    };

    tracing::debug!(?categories, ?min_amount, "classified query");
    Classification { categories, min_amount }
}

fn min_amount(raw: &str, lowered: &str) -> Option<u32> {
    if !(raw.contains('$') || lowered.contains("over")) {
        return None;
    }
    AMOUNT_LITERALS
        .iter()
        .find(|(literal, _)| raw.contains(literal))
        .map(|(_, amount)| *amount)
}
