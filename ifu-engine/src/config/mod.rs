pub mod default_config;
pub mod engine_config;

pub use engine_config::EngineConfig;
