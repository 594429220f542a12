//! External API integrations

pub mod prediction;
pub mod weather;

pub use prediction::PredictionClient;
pub use weather::{WeatherClient, WeatherGateway};
