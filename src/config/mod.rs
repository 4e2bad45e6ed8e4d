pub mod schema;

pub use schema::{
    Config, DEFAULT_MODEL, DEFAULT_PROVIDER, EngineConfig, GatewayConfig, ReliabilityConfig,
    RubricConfig, body_limit_for,
};
