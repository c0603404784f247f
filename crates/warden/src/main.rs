use std::sync::Arc;

use warden_core::config::Config;

mod liveness;

// One cooperative event loop for the bot. The liveness endpoint runs on its
// own thread so a stalled handler never blocks health checks.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), warden_core::Error> {
    warden_core::logging::init("warden")?;

    let cfg = Arc::new(Config::load()?);

    liveness::spawn(cfg.health_addr)?;
    tracing::info!(addr = %cfg.health_addr, "liveness endpoint listening");

    warden_telegram::router::run_polling(cfg)
        .await
        .map_err(|e| warden_core::Error::External(format!("telegram bot failed: {e}")))?;

    Ok(())
}
