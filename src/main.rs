#[cfg(not(target_arch = "wasm32"))]
use story_series::core::config::Config;

#[cfg(not(target_arch = "wasm32"))]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = match Config::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            eprintln!("Please check 'config.yml' (see config.example.yml).");
            return Err(e);
        }
    };

    story_series::cli::run(config).await
}

// Trunk builds this binary for the browser.
#[cfg(target_arch = "wasm32")]
fn main() {
    story_series::start();
}
