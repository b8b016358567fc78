use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use corelog_core::{CommitLog, Log};
use corelog_server::config::ServerConfig;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("corelog_server=info".parse().unwrap())
                .add_directive("corelog_core=info".parse().unwrap()),
        )
        .init();

    let config = ServerConfig::from_env();
    info!(data_dir = %config.data_dir.display(), "opening commit log");

    let log = Log::open(&config.data_dir, config.log_config).expect("failed to open commit log");
    let log: Arc<dyn CommitLog> = Arc::new(log);
    let app = corelog_server::router(log);

    let addr = format!("{}:{}", config.host, config.port);
    info!(%addr, "starting server");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind listener");
    axum::serve(listener, app)
        .await
        .expect("server failed");
}
