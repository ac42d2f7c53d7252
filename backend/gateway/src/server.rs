//! Main HTTP server.

use std::future::Future;
use std::io::ErrorKind;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tracing::{error, info, instrument};
use wabot_channels::ChannelAdapter;

use crate::health_api::{self, HEALTH_PATH};

/// State shared by the gateway's own routes.
#[derive(Clone)]
pub struct GatewayState {
    pub version: Arc<str>,
    pub webhook_path: Arc<str>,
}

impl GatewayState {
    pub fn new(version: &str, webhook_path: &str) -> Self {
        Self {
            version: Arc::from(version),
            webhook_path: Arc::from(webhook_path),
        }
    }
}

/// Build the full application: `/`, `/health` and every adapter's routes.
pub fn build_app(state: GatewayState, adapters: &[Arc<dyn ChannelAdapter>]) -> Router {
    let mut app = Router::new()
        .route("/", get(health_api::get_descriptor))
        .route(HEALTH_PATH, get(health_api::get_health))
        .with_state(state);

    for adapter in adapters {
        info!(adapter = adapter.name(), "Mounting channel adapter");
        app = app.merge(adapter.build_router());
    }
    app
}

/// Bind the listener, turning "address in use" into an actionable message.
pub async fn bind_listener(addr: &str) -> Result<TcpListener> {
    match TcpListener::bind(addr).await {
        Ok(listener) => Ok(listener),
        Err(e) if e.kind() == ErrorKind::AddrInUse => {
            let port = addr.rsplit(':').next().unwrap_or(addr);
            error!(addr, "Port {port} is already in use");
            Err(anyhow!(
                "port {port} is already in use; stop the existing process (kill $(lsof -ti:{port})) or set a different PORT"
            ))
        }
        Err(e) => Err(e).with_context(|| format!("Failed to bind {addr}")),
    }
}

/// Serve `app` until `shutdown` resolves, then let in-flight requests finish.
#[instrument(skip_all)]
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr().context("listener has no local address")?;
    info!(%addr, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server error")?;

    info!("HTTP server closed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health_api::{HEALTH_MESSAGE, HealthReport, SERVICE_MESSAGE, ServiceDescriptor};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    struct PingAdapter;

    impl ChannelAdapter for PingAdapter {
        fn name(&self) -> &str {
            "ping"
        }

        fn build_router(&self) -> Router {
            Router::new().route("/ping", get(|| async { "pong" }))
        }
    }

    fn app() -> Router {
        let adapters: Vec<Arc<dyn ChannelAdapter>> = vec![Arc::new(PingAdapter)];
        build_app(GatewayState::new("1.0.0", "/webhook"), &adapters)
    }

    async fn get_body(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let res = app
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = res.status();
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        (status, bytes.to_vec())
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let (status, body) = get_body(app(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        let report: HealthReport = serde_json::from_slice(&body).unwrap();
        assert_eq!(report.status, "OK");
        assert_eq!(report.message, HEALTH_MESSAGE);
    }

    #[tokio::test]
    async fn root_describes_service() {
        let (status, body) = get_body(app(), "/").await;
        assert_eq!(status, StatusCode::OK);
        let descriptor: ServiceDescriptor = serde_json::from_slice(&body).unwrap();
        assert_eq!(descriptor.message, SERVICE_MESSAGE);
        assert_eq!(descriptor.status, "running");
        assert_eq!(descriptor.version, "1.0.0");
        assert_eq!(descriptor.endpoints.health, "/health");
        assert_eq!(descriptor.endpoints.webhook, "/webhook");
    }

    #[tokio::test]
    async fn adapter_routes_are_mounted() {
        let (status, body) = get_body(app(), "/ping").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"pong");
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let (status, _) = get_body(app(), "/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn port_in_use_is_explained() {
        let held = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = held.local_addr().unwrap().to_string();
        let err = bind_listener(&addr).await.unwrap_err();
        assert!(err.to_string().contains("already in use"));
    }

    #[tokio::test]
    async fn serve_stops_on_shutdown() {
        let listener = bind_listener("127.0.0.1:0").await.unwrap();
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let handle = tokio::spawn(serve(listener, app(), async {
            let _ = rx.await;
        }));
        tx.send(()).unwrap();
        tokio::time::timeout(std::time::Duration::from_secs(2), handle)
            .await
            .unwrap()
            .unwrap()
            .unwrap();
    }
}
