use axum::http::{
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    HeaderName, HeaderValue, Method,
};
use domain::youtube::LifecycleManager;
use log::*;
use sea_orm::DatabaseConnection;
use service::config::{ApiVersion, Config};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

mod controller;
mod error;
mod extractors;
mod params;
mod router;

pub use error::{Error, Result};

/// Everything a request handler needs: the shared infrastructure from `service`
/// plus the lifecycle manager, built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub service_state: service::AppState,
    pub youtube: Arc<LifecycleManager>,
}

impl AppState {
    pub fn new(service_state: service::AppState, youtube: &Arc<LifecycleManager>) -> Self {
        Self {
            service_state,
            youtube: Arc::clone(youtube),
        }
    }

    pub fn db_conn_ref(&self) -> &DatabaseConnection {
        self.service_state.db_conn_ref()
    }

    pub fn config(&self) -> &Config {
        &self.service_state.config
    }
}

pub async fn init_server(app_state: AppState) -> std::io::Result<()> {
    let config = app_state.config().clone();
    let host = config.interface.as_deref().unwrap_or("127.0.0.1");
    let server_url = format!("{host}:{}", config.port);

    let listen_addr = format!("http://{server_url}");
    info!("Server starting... listening for connections on {listen_addr}");

    let listener = TcpListener::bind(server_url).await?;

    let allowed_origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(origin) => Some(origin),
            Err(e) => {
                warn!("Ignoring invalid CORS origin {origin}: {e}");
                None
            }
        })
        .collect();
    info!("Allowed CORS origins: {:?}", config.allowed_origins);

    let cors_layer = CorsLayer::new()
        .allow_methods([Method::DELETE, Method::GET, Method::POST, Method::PUT])
        .allow_credentials(true)
        .allow_headers([
            AUTHORIZATION,
            ACCEPT,
            CONTENT_TYPE,
            HeaderName::from_static(ApiVersion::field_name()),
        ])
        .allow_origin(allowed_origins);

    axum::serve(listener, router::define_routes(app_state).layer(cors_layer)).await
}
