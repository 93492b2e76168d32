use anyhow::{Context, Result};
use img2video::config::Config;
use img2video::generator::run_status_flow;
use std::path::Path;

const CONFIG_FILE: &str = "config.env";

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cfg = Config::load(CONFIG_FILE)
        .await
        .with_context(|| format!("Failed to load {}", CONFIG_FILE))?;

    let outcome = run_status_flow(&cfg, Path::new(".")).await?;
    println!("{}", outcome);

    std::process::exit(if outcome.is_success() { 0 } else { 1 });
}
