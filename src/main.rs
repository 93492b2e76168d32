use anyhow::{Context, Result};
use img2video::config::Config;
use img2video::generator::run_submit_flow;
use img2video::init;
use std::path::Path;

const CONFIG_FILE: &str = "config.env";

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let work_dir = Path::new(".");
    let cfg = Config::load(CONFIG_FILE)
        .await
        .with_context(|| format!("Failed to load {}", CONFIG_FILE))?;
    let image_path = init::find_input_image(work_dir).await?;

    let outcome = run_submit_flow(&cfg, &image_path, work_dir).await?;
    println!("{}", outcome);

    std::process::exit(if outcome.is_success() { 0 } else { 1 });
}
