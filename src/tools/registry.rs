use std::collections::HashMap;
use std::sync::Arc;

use crate::clients::{
    DataProvider, NarrativeGenerator, OpenAiNarrator, QueryServiceRemote, UnconfiguredNarrator,
    UnconfiguredProvider, UnconfiguredWeatherAgent, WeatherAgent, WeatherAgentRemote,
};
use crate::core::tool::{Tool, ToolDescriptor};
use crate::infra::config::{AppConfig, Toolset};
use crate::tools::business::BusinessQueryTool;
use crate::tools::direct::MetricTool;
use crate::tools::weather::WeatherTool;

/// Read-only tool catalogue, fixed at construction and cheap to clone.
#[derive(Clone)]
pub struct ToolRegistry {
    tools: Arc<Vec<Arc<dyn Tool>>>,
    descriptors: Arc<Vec<ToolDescriptor>>,
    by_name: Arc<HashMap<&'static str, usize>>,
}

impl ToolRegistry {
    /// Registration order is listing order. A repeated name keeps the first tool.
    pub fn with_tools<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn Tool>>,
    {
        let mut tools: Vec<Arc<dyn Tool>> = Vec::new();
        let mut by_name = HashMap::new();
        for t in iter {
            if by_name.contains_key(t.name()) {
                tracing::warn!(tool = t.name(), "duplicate tool name ignored");
                continue;
            }
            by_name.insert(t.name(), tools.len());
            tools.push(t);
        }
        let descriptors = tools.iter().map(|t| ToolDescriptor::of(t.as_ref())).collect();
        Self {
            tools: Arc::new(tools),
            descriptors: Arc::new(descriptors),
            by_name: Arc::new(by_name),
        }
    }

    pub fn list(&self) -> &[ToolDescriptor] {
        &self.descriptors
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.by_name.get(name).map(|&i| &self.tools[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// External collaborators shared by the tools.
#[derive(Clone)]
pub struct Collaborators {
    pub provider: Arc<dyn DataProvider>,
    pub narrator: Arc<dyn NarrativeGenerator>,
    pub weather: Arc<dyn WeatherAgent>,
}

impl Collaborators {
    /// Missing or broken settings fall back to collaborators that report the
    /// problem per call instead of failing boot.
    pub fn from_config(cfg: &AppConfig) -> Self {
        let provider: Arc<dyn DataProvider> = match QueryServiceRemote::from_config(&cfg.data_provider) {
            Ok(p) => Arc::new(p),
            Err(e) => {
                tracing::warn!(error = %e, "data provider unavailable");
                Arc::new(UnconfiguredProvider)
            }
        };
        let narrator: Arc<dyn NarrativeGenerator> = match OpenAiNarrator::from_config(&cfg.narrative) {
            Ok(n) => Arc::new(n),
            Err(e) => {
                tracing::warn!(error = %e, "narrative generator unavailable");
                Arc::new(UnconfiguredNarrator)
            }
        };
        let weather: Arc<dyn WeatherAgent> = match WeatherAgentRemote::from_config(&cfg.weather) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                tracing::warn!(error = %e, "weather agent unavailable");
                Arc::new(UnconfiguredWeatherAgent)
            }
        };
        Self { provider, narrator, weather }
    }
}

pub fn business_tool(c: &Collaborators) -> BusinessQueryTool {
    BusinessQueryTool::new(c.provider.clone(), c.narrator.clone())
}

pub fn build_registry(toolset: Toolset, c: &Collaborators) -> ToolRegistry {
    let mut tools: Vec<Arc<dyn Tool>> = Vec::new();
    if toolset.has_business() {
        tools.push(Arc::new(business_tool(c)));
        for t in MetricTool::all(c.provider.clone()) {
            tools.push(Arc::new(t));
        }
    }
    if toolset.has_weather() {
        tools.push(Arc::new(WeatherTool::new(c.weather.clone())));
    }
    ToolRegistry::with_tools(tools)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ToolError;
    use crate::core::tool::{JsonObject, ToolSpec};
    use async_trait::async_trait;

    struct Echo;

    impl ToolSpec for Echo {
        fn name(&self) -> &'static str {
            "test.echo"
        }
        fn description(&self) -> &'static str {
            "echo tool"
        }
        fn input_schema(&self) -> serde_json::Value {
            serde_json::json!({"type":"object"})
        }
    }

    #[async_trait]
    impl Tool for Echo {
        async fn call(&self, _: &JsonObject) -> Result<String, ToolError> {
            Ok("echo".into())
        }
    }

    fn unconfigured() -> Collaborators {
        Collaborators {
            provider: Arc::new(UnconfiguredProvider),
            narrator: Arc::new(UnconfiguredNarrator),
            weather: Arc::new(UnconfiguredWeatherAgent),
        }
    }

    fn names(reg: &ToolRegistry) -> Vec<&'static str> {
        reg.list().iter().map(|d| d.name).collect()
    }

    #[tokio::test]
    async fn registry_registers_lists_and_resolves() {
        let reg = ToolRegistry::with_tools([Arc::new(Echo) as Arc<dyn Tool>]);
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.list()[0].name, "test.echo");
        let out = reg.get("test.echo").unwrap().call(&JsonObject::new()).await.unwrap();
        assert_eq!(out, "echo");
        assert!(reg.get("nope").is_none());
    }

    #[test]
    fn duplicate_names_keep_first() {
        let reg = ToolRegistry::with_tools([
            Arc::new(Echo) as Arc<dyn Tool>,
            Arc::new(Echo) as Arc<dyn Tool>,
        ]);
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn toolsets_select_catalogue() {
        let c = unconfigured();
        assert_eq!(
            names(&build_registry(Toolset::Business, &c)),
            vec![
                "query_business_data",
                "get_revenue_summary",
                "get_product_performance",
                "get_customer_orders"
            ]
        );
        assert_eq!(names(&build_registry(Toolset::Weather, &c)), vec!["get_weather_forecast"]);
        let all = build_registry(Toolset::All, &c);
        assert_eq!(all.len(), 5);
        assert_eq!(all.list().last().unwrap().name, "get_weather_forecast");
    }

    #[test]
    fn listing_is_stable_across_calls() {
        let reg = build_registry(Toolset::All, &unconfigured());
        assert_eq!(reg.list(), reg.clone().list());
    }

    #[test]
    fn collaborators_fall_back_when_unconfigured() {
        let cfg = AppConfig::default();
        let c = Collaborators::from_config(&cfg);
        let reg = build_registry(cfg.toolset, &c);
        assert!(reg.contains("query_business_data"));
        assert!(reg.contains("get_weather_forecast"));
    }
}
