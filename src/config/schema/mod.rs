mod core;
mod engine;
mod gateway;
mod reliability;
mod rubric;

pub use self::core::{Config, DEFAULT_MODEL, DEFAULT_PROVIDER};
pub use engine::EngineConfig;
pub use gateway::{GatewayConfig, body_limit_for};
pub use reliability::ReliabilityConfig;
pub use rubric::RubricConfig;
