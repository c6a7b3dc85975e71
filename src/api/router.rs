use super::{AppState, handlers};
use axum::Router;
use axum::routing::{get, post, put};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Builds the Axum router with all routes and shared state.
/// `/metrics` is added by the server, which owns the recorder.
pub fn build(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/snapshot", get(handlers::get_snapshot))
        .route("/entries/{asset}", get(handlers::get_entry))
        .route("/entries/{asset}/open", post(handlers::open_entry))
        .route("/thresholds", get(handlers::get_thresholds))
        .route("/threshold", put(handlers::put_threshold))
        .route("/refresh", post(handlers::post_refresh))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::errors::PresenterError;
    use crate::models::{PipelineSnapshot, RankedEntry, VolumeThreshold};
    use crate::presenter::Presenter;
    use crate::scheduler::tests::{FakeSource, market};
    use crate::scheduler::{PollingScheduler, SchedulerHandle};
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tower::ServiceExt;

    #[derive(Default)]
    struct SelectRecorder {
        opened: Mutex<Vec<String>>,
    }

    impl Presenter for SelectRecorder {
        fn render(&self, _snapshot: &PipelineSnapshot) {}

        fn on_select(&self, entry: &RankedEntry) -> Result<(), PresenterError> {
            self.opened.lock().unwrap().push(entry.chart_url.clone());
            Ok(())
        }
    }

    /// Runs one cycle against the fake market, then stops the scheduler.
    async fn populated() -> (SchedulerHandle, Arc<SelectRecorder>, Router) {
        let (scheduler, handle) =
            PollingScheduler::new(Arc::new(FakeSource::new(market())), &Config::default());
        let mut snapshots = handle.subscribe();
        let task = tokio::spawn(scheduler.run_until(async move {
            let _ = snapshots.changed().await;
        }));
        task.await.unwrap();

        let presenter = Arc::new(SelectRecorder::default());
        let state = AppState {
            handle: handle.clone(),
            presenter: presenter.clone(),
        };
        (handle, presenter, build(state))
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_is_ok() {
        let (_, _, app) = populated().await;
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn snapshot_lists_ranked_entries() {
        let (_, _, app) = populated().await;
        let response = app
            .oneshot(Request::get("/snapshot").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["count"], 1);
        assert_eq!(json["threshold"], "1B");
        assert_eq!(json["entries"][0]["asset"], "BTC");
        assert_eq!(json["entries"][0]["tier"], "2B");
    }

    #[tokio::test]
    async fn entry_lookup_and_missing_entry() {
        let (_, _, app) = populated().await;
        let response = app
            .clone()
            .oneshot(Request::get("/entries/btc").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["symbol"], "BTCUSDT");

        let response = app
            .oneshot(Request::get("/entries/ETH").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn open_entry_goes_through_presenter() {
        let (_, presenter, app) = populated().await;
        let response = app
            .oneshot(
                Request::post("/entries/BTC/open")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(
            *presenter.opened.lock().unwrap(),
            vec!["https://www.tradingview.com/chart/?symbol=BINANCE:BTCUSDT.P".to_string()]
        );
    }

    #[tokio::test]
    async fn valid_threshold_is_applied() {
        let (handle, _, app) = populated().await;
        let response = app
            .oneshot(
                Request::put("/threshold")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"threshold":"500M"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(handle.threshold(), VolumeThreshold::M500);
    }

    #[tokio::test]
    async fn unknown_threshold_is_rejected() {
        let (handle, _, app) = populated().await;
        let response = app
            .oneshot(
                Request::put("/threshold")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"threshold":"750M"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert!(json["error"].as_str().unwrap().contains("750M"));
        assert_eq!(handle.threshold(), VolumeThreshold::B1);
    }

    #[tokio::test]
    async fn thresholds_mark_the_current_one() {
        let (_, _, app) = populated().await;
        let response = app
            .oneshot(Request::get("/thresholds").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["current"], "1B");
        let selected: Vec<_> = json["options"]
            .as_array()
            .unwrap()
            .iter()
            .filter(|o| o["selected"] == true)
            .map(|o| o["value"].clone())
            .collect();
        assert_eq!(selected, vec![Value::from("1B")]);
    }

    #[tokio::test(start_paused = true)]
    async fn refresh_triggers_a_cycle() {
        let source = Arc::new(FakeSource::new(market()));
        let (scheduler, handle) = PollingScheduler::new(source.clone(), &Config::default());
        let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
        let task = tokio::spawn(scheduler.run_until(async {
            let _ = stop_rx.await;
        }));
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(source.calls(), 1);

        let app = build(AppState {
            handle,
            presenter: Arc::new(SelectRecorder::default()),
        });
        let response = app
            .oneshot(Request::post("/refresh").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(source.calls(), 2);

        stop_tx.send(()).unwrap();
        task.await.unwrap();
    }
}
