//! Simulated environmental sensor feed.
//!
//! - [`WeatherModel`] — stateful random-walk weather generator
//! - [`GatewayClient`] — HTTP client for the stream gateway (topic
//!   creation and batch record publishing)
//! - [`WeatherProducer`] — ties the two together, provisioning its
//!   output channel on first use

pub mod config;
pub mod error;
pub mod gateway;
pub mod model;
pub mod producer;

pub use config::WeatherConfig;
pub use error::{Result, WeatherError};
pub use gateway::GatewayClient;
pub use model::{SkyStatus, WeatherModel, WeatherReading};
pub use producer::WeatherProducer;
