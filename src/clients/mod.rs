//! Outbound collaborators: data provider, narrative generator, weather agent.

pub mod openai;
pub mod query_service;
pub mod weather_agent;

pub use openai::{NarrativeGenerator, OpenAiNarrator, UnconfiguredNarrator};
pub use query_service::{DataProvider, QueryServiceRemote, UnconfiguredProvider};
pub use weather_agent::{UnconfiguredWeatherAgent, WeatherAgent, WeatherAgentRemote};
