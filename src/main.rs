use std::error::Error;

use ifu_engine::telemetry::{self, Scope};
use ifu_engine::{EngineConfig, IfuEngine};
use tracing::{Level, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod render;
mod repl;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // A missing .env is fine; the engine has defaults for everything.
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(telemetry::env_filter_with_level("warn,ifu_scout=info", Level::INFO))
        .with(telemetry::layer(Scope::Engine))
        .with(telemetry::layer(Scope::Others))
        .try_init()?;

    let cfg = EngineConfig::from_env()?;
    info!(backend = %cfg.backend_url, "starting IFU scout");

    let engine = IfuEngine::from_config(&cfg)?;
    repl::run(&engine).await?;

    Ok(())
}
