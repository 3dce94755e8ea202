use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

use crate::clients::WeatherAgent;
use crate::core::error::ToolError;
use crate::core::tool::{opt_str, JsonObject, Tool, ToolSpec};

#[derive(Clone)]
pub struct WeatherTool {
    agent: Arc<dyn WeatherAgent>,
}

impl WeatherTool {
    pub fn new(agent: Arc<dyn WeatherAgent>) -> Self {
        Self { agent }
    }
}

impl ToolSpec for WeatherTool {
    fn name(&self) -> &'static str {
        "get_weather_forecast"
    }
    fn description(&self) -> &'static str {
        "Get weather forecast for a specific location"
    }
    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "location": {
                    "type": "string",
                    "description": "Location for weather forecast (city, zip code, etc.)"
                }
            },
            "required": ["location"]
        })
    }
}

#[async_trait]
impl Tool for WeatherTool {
    async fn call(&self, arguments: &JsonObject) -> Result<String, ToolError> {
        let Some(location) = opt_str(arguments, "location")? else {
            return Err(ToolError::InvalidArguments("missing 'location'".into()));
        };
        self.agent
            .forecast(&format!("Get weather forecast for {location}"))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Echo(Mutex<Vec<String>>);

    #[async_trait]
    impl WeatherAgent for Echo {
        async fn forecast(&self, prompt: &str) -> Result<String, ToolError> {
            self.0.lock().unwrap().push(prompt.to_owned());
            Ok("  Sunny spells, 18°C  ".into())
        }
    }

    #[tokio::test]
    async fn it_forwards_location_prompt_and_keeps_text_unmodified() {
        let agent = Arc::new(Echo::default());
        let tool = WeatherTool::new(agent.clone());
        let args = json!({"location": "Cork"}).as_object().cloned().unwrap();
        let out = tool.call(&args).await.unwrap();
        assert_eq!(out, "  Sunny spells, 18°C  ");
        assert_eq!(agent.0.lock().unwrap()[0], "Get weather forecast for Cork");
    }

    #[tokio::test]
    async fn it_validates_missing_location() {
        let tool = WeatherTool::new(Arc::new(Echo::default()));
        let err = tool.call(&JsonObject::new()).await.unwrap_err();
        assert!(err.to_string().contains("missing 'location'"));
    }
}
