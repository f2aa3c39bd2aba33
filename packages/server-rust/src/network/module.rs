//! Network module with deferred startup lifecycle.
//!
//! `new()` wires the application state, `start()` binds the TCP listener, and
//! `serve()` accepts connections until the shutdown future resolves. Binding separately
//! lets callers learn the OS-assigned port before traffic starts.

use std::future::Future;
use std::sync::Arc;

use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tracing::{info, warn};

use super::config::{NetworkConfig, TlsConfig};
use super::handlers::{
    conformance_handler, constraints_handler, create_order_handler, get_order_handler,
    get_order_statuses_handler, get_orders_handler, get_product_handler, get_products_handler,
    health_handler, liveness_handler, order_parameters_handler, readiness_handler, root_handler,
    search_opportunities_handler, AppState,
};
use super::middleware::{build_http_layers, track_in_flight};
use super::shutdown::ShutdownController;
use crate::service::{ProductRegistry, ServerConfig};
use crate::traits::OrderBackend;

/// Assembles the full router: health probes plus the tasking API.
///
/// API routes:
/// - `GET /`, `GET /conformance`
/// - `GET /products`, `GET /products/{product_id}`
/// - `GET /products/{product_id}/constraints`, `GET /products/{product_id}/order-parameters`
/// - `POST /products/{product_id}/opportunities`
/// - `POST /products/{product_id}/orders`
/// - `GET /orders`, `GET /orders/{order_id}`, `GET /orders/{order_id}/statuses`
///
/// API routes count toward in-flight tracking and answer `503` while draining; the
/// health routes always answer.
pub fn build_router(state: AppState, config: &NetworkConfig) -> Router {
    let api = Router::new()
        .route("/", get(root_handler))
        .route("/conformance", get(conformance_handler))
        .route("/products", get(get_products_handler))
        .route("/products/{product_id}", get(get_product_handler))
        .route(
            "/products/{product_id}/constraints",
            get(constraints_handler),
        )
        .route(
            "/products/{product_id}/order-parameters",
            get(order_parameters_handler),
        )
        .route(
            "/products/{product_id}/opportunities",
            post(search_opportunities_handler),
        )
        .route("/products/{product_id}/orders", post(create_order_handler))
        .route("/orders", get(get_orders_handler))
        .route("/orders/{order_id}", get(get_order_handler))
        .route(
            "/orders/{order_id}/statuses",
            get(get_order_statuses_handler),
        )
        .route_layer(from_fn_with_state(state.clone(), track_in_flight));

    Router::new()
        .route("/health", get(health_handler))
        .route("/health/live", get(liveness_handler))
        .route("/health/ready", get(readiness_handler))
        .merge(api)
        .layer(build_http_layers(config))
        .with_state(state)
}

/// Manages the HTTP server lifecycle.
pub struct NetworkModule {
    config: NetworkConfig,
    listener: Option<TcpListener>,
    state: AppState,
}

impl NetworkModule {
    /// Creates the module without binding any port.
    ///
    /// The registry is frozen here: it is moved behind an `Arc` and never mutated again.
    pub fn new(
        config: NetworkConfig,
        products: ProductRegistry,
        orders: Arc<dyn OrderBackend>,
        server: ServerConfig,
    ) -> Self {
        let state = AppState::new(
            Arc::new(products),
            orders,
            Arc::new(server),
            Arc::new(ShutdownController::new()),
        );
        Self {
            config,
            listener: None,
            state,
        }
    }

    /// Shared shutdown controller, for callers that trigger or observe shutdown.
    #[must_use]
    pub fn shutdown_controller(&self) -> Arc<ShutdownController> {
        Arc::clone(&self.state.shutdown)
    }

    #[must_use]
    pub fn build_router(&self) -> Router {
        build_router(self.state.clone(), &self.config)
    }

    /// Binds the TCP listener to the configured host and port.
    ///
    /// Returns the bound port, which differs from the configured one when port 0 is used.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound.
    pub async fn start(&mut self) -> anyhow::Result<u16> {
        let listener = TcpListener::bind(self.config.bind_address()).await?;
        let port = listener.local_addr()?.port();

        info!(host = %self.config.host, port, "TCP listener bound");

        self.listener = Some(listener);
        Ok(port)
    }

    /// Serves until `shutdown` resolves.
    ///
    /// When it does, the health state moves to `Draining` (new API requests get `503`),
    /// the server stops accepting connections, and in-flight requests get up to
    /// `drain_timeout` to finish.
    ///
    /// # Errors
    ///
    /// Returns an error if `start()` was not called first or the server hits a fatal
    /// I/O error.
    pub async fn serve(
        self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> anyhow::Result<()> {
        let Some(listener) = self.listener else {
            anyhow::bail!("start() must be called before serve()");
        };
        let shutdown_ctrl = Arc::clone(&self.state.shutdown);
        let router = build_router(self.state, &self.config);

        let ctrl = Arc::clone(&shutdown_ctrl);
        let signal = async move {
            shutdown.await;
            info!("shutdown signal received; draining");
            ctrl.trigger_shutdown();
        };

        shutdown_ctrl.set_ready();

        if let Some(tls) = &self.config.tls {
            serve_tls(listener, router, tls, signal).await?;
        } else {
            info!("serving plain HTTP");
            axum::serve(listener, router)
                .with_graceful_shutdown(signal)
                .await?;
        }

        if shutdown_ctrl
            .wait_for_drain(self.config.drain_timeout)
            .await
        {
            info!("all in-flight requests drained");
        } else {
            warn!(
                in_flight = shutdown_ctrl.in_flight_count(),
                "drain timeout expired with requests still in flight"
            );
        }
        Ok(())
    }
}

/// Serves TLS connections using `axum-server` with rustls on the pre-bound listener.
async fn serve_tls(
    listener: TcpListener,
    router: Router,
    tls: &TlsConfig,
    signal: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    use axum_server::tls_rustls::RustlsConfig;

    let rustls_config = RustlsConfig::from_pem_file(&tls.cert_path, &tls.key_path)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load TLS certificates: {e}"))?;

    let addr = listener.local_addr()?;
    let std_listener = listener.into_std()?;
    let handle = axum_server::Handle::new();
    let shutdown_handle = handle.clone();

    tokio::spawn(async move {
        signal.await;
        shutdown_handle.graceful_shutdown(None);
    });

    info!(%addr, "serving TLS");

    axum_server::from_tcp_rustls(std_listener, rustls_config)
        .handle(handle)
        .serve(router.into_make_service())
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    use super::*;
    use crate::backend::InMemoryBackend;
    use crate::network::HealthState;

    fn module() -> NetworkModule {
        NetworkModule::new(
            NetworkConfig {
                host: "127.0.0.1".to_string(),
                ..NetworkConfig::default()
            },
            ProductRegistry::new(),
            Arc::new(InMemoryBackend::new()),
            ServerConfig::default(),
        )
    }

    #[test]
    fn new_does_not_bind() {
        let module = module();
        assert!(module.listener.is_none());
        assert_eq!(
            module.shutdown_controller().health_state(),
            HealthState::Starting
        );
    }

    #[test]
    fn router_builds() {
        let _router = module().build_router();
    }

    #[tokio::test]
    async fn start_binds_os_assigned_port() {
        let mut module = module();
        let port = module.start().await.unwrap();
        assert!(port > 0);
        assert!(module.listener.is_some());
    }

    #[tokio::test]
    async fn serve_without_start_is_an_error() {
        let err = module()
            .serve(std::future::pending::<()>())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("start()"));
    }

    #[tokio::test]
    async fn serves_then_drains_on_signal() {
        let mut module = module();
        let port = module.start().await.unwrap();
        let controller = module.shutdown_controller();
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();

        let server = tokio::spawn(module.serve(async move {
            let _ = rx.await;
        }));

        let mut stream = TcpStream::connect(("127.0.0.1", port)).await.unwrap();
        stream
            .write_all(b"GET /health/live HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        assert!(response.starts_with("HTTP/1.1 200"));
        assert_eq!(controller.health_state(), HealthState::Ready);

        tx.send(()).unwrap();
        server.await.unwrap().unwrap();
        assert_eq!(controller.health_state(), HealthState::Stopped);
    }
}
