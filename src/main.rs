use account::AccountRegistry;
use config::Config;
use display::TerminalDashboard;
use logger::init_default_logger;
use scheduler::Scheduler;
use utils::{read_proxies, read_tokens};

mod account;
mod api;
mod config;
mod constants;
mod display;
mod errors;
mod logger;
mod proxy;
mod scheduler;
mod utils;

async fn load_registry(config: &Config) -> errors::Result<AccountRegistry> {
    let tokens = read_tokens(&config.tokens_file_path).await?;
    let proxies = read_proxies(&config.proxies_file_path).await?;

    let registry = AccountRegistry::new(tokens, &proxies)?;
    tracing::info!(
        "Loaded {} accounts, {} proxies",
        registry.len(),
        proxies.len()
    );

    Ok(registry)
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let _guard = init_default_logger();

    let config = Config::read_default()
        .await
        .inspect_err(|e| tracing::error!("{e:#}"))?;

    let registry = load_registry(&config)
        .await
        .inspect_err(|e| tracing::error!("{e}"))?;

    Scheduler::new(&config, registry, TerminalDashboard)
        .run()
        .await;

    Ok(())
}
