pub mod handlers;
pub mod models;
pub mod router;

use crate::presenter::Presenter;
use crate::scheduler::SchedulerHandle;
use axum::routing::get;
use axum_prometheus::PrometheusMetricLayer;
use axum_prometheus::metrics_exporter_prometheus::PrometheusHandle;
use std::net::SocketAddr;
use std::sync::Arc;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub handle: SchedulerHandle,
    pub presenter: Arc<dyn Presenter>,
}

pub struct ApiServer {
    state: AppState,
    metric_layer: PrometheusMetricLayer<'static>,
    metric_handle: PrometheusHandle,
}

impl ApiServer {
    /// Installs the global Prometheus recorder, so build this before the
    /// scheduler starts recording.
    pub fn new(handle: SchedulerHandle, presenter: Arc<dyn Presenter>) -> Self {
        let (metric_layer, metric_handle) = PrometheusMetricLayer::pair();
        Self {
            state: AppState { handle, presenter },
            metric_layer,
            metric_handle,
        }
    }

    /// Binds to localhost on the given port and starts serving.
    pub async fn run(self, port: u16) -> anyhow::Result<()> {
        let metric_handle = self.metric_handle;
        let app = router::build(self.state)
            .route("/metrics", get(move || async move { metric_handle.render() }))
            .layer(self.metric_layer);
        let addr = SocketAddr::from(([127, 0, 0, 1], port));

        tracing::info!("API server listening on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}
