use crate::agent::{ RelayAgent, RelayError };
use crate::models::chat::{ ErrorResponse, RelayRequest, RelayResponse };
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use axum::{
    body::Bytes,
    routing::{ get, post },
    Router,
    extract::State,
    response::{ Html, IntoResponse, Response },
    http::StatusCode,
    Json,
};
use tower_http::cors::{ Any, CorsLayer };
use log::{ info, warn };

const CHAT_PAGE: &str = include_str!("../../static/index.html");

#[derive(Clone)]
struct AppState {
    agent: Arc<RelayAgent>,
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = match self {
            RelayError::InvalidMessages => StatusCode::BAD_REQUEST,
            RelayError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(ErrorResponse { error: self.to_string() })).into_response()
    }
}

pub fn router(agent: Arc<RelayAgent>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(chat_page_handler))
        .route("/api/chat", post(chat_handler))
        .layer(cors)
        .with_state(AppState { agent })
}

pub struct TlsPaths {
    pub cert_path: String,
    pub key_path: String,
}

pub async fn start_http_server(
    addr: SocketAddr,
    agent: Arc<RelayAgent>,
    tls: Option<TlsPaths>,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let app = router(agent);

    match tls {
        Some(paths) => {
            info!(
                "TLS enabled. Loading certificate from '{}' and key from '{}'",
                paths.cert_path,
                paths.key_path
            );
            let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(
                &paths.cert_path,
                &paths.key_path
            ).await?;

            info!("HTTPS server listening on: https://{}", addr);
            axum_server::bind_rustls(addr, tls_config)
                .serve(app.into_make_service())
                .await?;
        }
        None => {
            let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e|
                format!("Failed to bind HTTP server to {}: {}. Try a different port.", addr, e)
            )?;
            info!("HTTP server listening on: http://{}", addr);
            axum::serve(listener, app.into_make_service()).await?;
        }
    }

    Ok(())
}

async fn chat_page_handler() -> Html<&'static str> {
    Html(CHAT_PAGE)
}

async fn chat_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<RelayResponse>, RelayError> {
    let req = RelayRequest::from_slice(&body).map_err(|e| {
        warn!("Rejected chat request body: {}", e);
        RelayError::InvalidMessages
    })?;

    let message = state.agent.relay(req.messages).await?;
    Ok(Json(RelayResponse { message }))
}
