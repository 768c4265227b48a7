use std::sync::Arc;

use apikit_crypto::AuthKeys;

#[tokio::main]
async fn main() {
    apikit_log::init();

    let keys = match AuthKeys::from_env() {
        Ok(keys) => keys,
        Err(error) => {
            tracing::warn!(%error, "auth keys not found in env; using ephemeral dev keys");
            AuthKeys::generate().expect("failed to generate ephemeral keys")
        }
    };

    let port = std::env::var("PORT")
        .ok()
        .and_then(|port| port.parse::<u16>().ok())
        .unwrap_or(3333);

    let app = apikit_app::app::build_app(Arc::new(keys));

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .expect("failed to bind");

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}
