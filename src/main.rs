mod api;
mod config;
mod display;
mod errors;
mod exchanges;
mod models;
mod pipeline;
mod presenter;
mod scheduler;

use api::ApiServer;
use config::Config;
use exchanges::binance::BinanceFutures;
use presenter::{ConsolePresenter, Presenter};
use scheduler::PollingScheduler;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;

    tracing::info!(
        "BinanceWatch starting: min volume {} every {:?}, quotes {:?}, port {}",
        config.min_volume,
        config.refresh_interval,
        config.eligible_quotes,
        config.api_port
    );

    // ── 1. Pipeline source + scheduler ─────────────────────────────
    let source = Arc::new(BinanceFutures::new(&config)?);
    let (scheduler, handle) = PollingScheduler::new(source, &config);

    // ── 2. Presentation: console menu + HTTP surface ───────────────
    let console: Arc<dyn Presenter> = Arc::new(ConsolePresenter::new(handle.clone(), 25));
    // installs the metrics recorder, so it must exist before the first cycle
    let api = ApiServer::new(handle.clone(), Arc::clone(&console));
    let render_task = presenter::spawn_render_loop(console, &handle);

    let api_port = config.api_port;
    tokio::spawn(async move {
        if let Err(e) = api.run(api_port).await {
            tracing::error!("API server failed: {}", e);
        }
    });

    // ── 3. Poll until Ctrl+C ───────────────────────────────────────
    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
    let scheduler_task = tokio::spawn(scheduler.run_until(async {
        let _ = stop_rx.await;
    }));

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down...");

    let _ = stop_tx.send(());
    if let Err(e) = scheduler_task.await {
        tracing::error!("scheduler task failed: {}", e);
    }
    render_task.abort();

    Ok(())
}
