use tokio::signal;

/// Resolves on Ctrl+C so axum can drain in-flight requests before exiting.
pub async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!("unable to listen for Ctrl+C: {e}");
        std::future::pending::<()>().await;
    }

    #[cfg(not(windows))]
    println!();
    tracing::info!("Ctrl+C received, shutting down. Open draft sessions that were not saved are lost.");
}
