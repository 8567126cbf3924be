mod routes;

pub use routes::ApiState;

use std::sync::Arc;

use axum::{Extension, Router};
use tower_http::cors::{Any, CorsLayer};
use vigil_core::VigilError;

pub async fn start_server(port: u16, state: ApiState) -> Result<(), VigilError> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .merge(routes::router())
        .layer(Extension(Arc::new(state)))
        .layer(cors);

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(VigilError::Io)?;

    eprintln!("[vigil-api] Listening on http://{addr}");

    axum::serve(listener, app).await.map_err(VigilError::Io)
}
