//! # HTTP Server Example
//!
//! Runs the pre-authorized code exchange behind an HTTP server, backed by the
//! in-memory provider.

use issuer::Config;
use test_utils::issuer::ProviderImpl;
use tokio::net::TcpListener;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() {
    let config = Config::from_env();

    let subscriber = FmtSubscriber::builder().with_max_level(config.log_level).finish();
    tracing::subscriber::set_global_default(subscriber).expect("set subscriber");

    let router = issuer::router(config.clone(), ProviderImpl::new());

    let listener = TcpListener::bind(config.bind_addr()).await.expect("should bind");
    tracing::info!(
        endpoint = %config.endpoint,
        "listening on {}",
        listener.local_addr().expect("should have addr")
    );
    axum::serve(listener, router).await.expect("server should run");
}
