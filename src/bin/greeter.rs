use anyhow::Result;
use ducs_bots::{
    app::greeter::GreeterApp,
    config,
    infrastructure::{directories, latch, logging},
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = config::load_config()?;
    let paths = directories::ensure_directories(&config.directories)?;
    logging::init_tracing(&config, &paths, "greeter")?;

    let shutdown = latch::Shutdown::new();
    latch::install_signal_handlers(shutdown.clone());

    let app = GreeterApp::initialize(config, paths, shutdown).await?;
    app.run().await
}
