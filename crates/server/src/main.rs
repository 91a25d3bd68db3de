use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Html,
    routing::get,
    Json, Router,
};
use dashboard_api::{county_snapshot, list_counties, list_states, ApiContext};
use echo_client::EchoClient;
use reference::ReferenceTable;
use serde::Deserialize;
use shared::{
    error::{ApiError, RetrievalError},
    protocol::{CountyViewResponse, INVALID_SELECTION_WARNING},
};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

mod config;

use config::load_settings;

const DASHBOARD_PAGE: &str = include_str!("../assets/index.html");

#[derive(Clone)]
struct AppState {
    api: ApiContext,
}

#[derive(Debug, Deserialize)]
struct CountiesQuery {
    state: String,
}

#[derive(Debug, Deserialize)]
struct ViewQuery {
    state: String,
    county: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let settings = load_settings();
    let reference = ReferenceTable::load(&settings.reference_csv).map_err(|error| {
        error!(
            path = %settings.reference_csv,
            %error,
            "failed to load reference table; the dashboard cannot start without it"
        );
        error
    })?;
    info!(rows = reference.len(), "reference table loaded");

    let services = EchoClient::new(&settings.echo_data_url, &settings.echo_spatial_url)?;
    let api = ApiContext {
        reference: Arc::new(reference),
        services: Arc::new(services),
    };

    let app = build_router(Arc::new(AppState { api }));

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "dashboard listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(dashboard_page))
        .route("/healthz", get(healthz))
        .route("/api/states", get(http_list_states))
        .route("/api/counties", get(http_list_counties))
        .route("/api/view", get(http_county_view))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn dashboard_page() -> Html<&'static str> {
    Html(DASHBOARD_PAGE)
}

async fn http_list_states(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(list_states(&state.api))
}

async fn http_list_counties(
    State(state): State<Arc<AppState>>,
    Query(q): Query<CountiesQuery>,
) -> Result<Json<Vec<String>>, (StatusCode, Json<ApiError>)> {
    let counties =
        list_counties(&state.api, &q.state).map_err(|e| (StatusCode::NOT_FOUND, Json(e)))?;
    Ok(Json(counties))
}

/// The whole selection pipeline sits behind one recovery boundary: whatever
/// failed, the page gets the same generic warning and no partial data. The
/// log stream is where the causes stay distinguishable.
async fn http_county_view(
    State(state): State<Arc<AppState>>,
    Query(q): Query<ViewQuery>,
) -> Json<CountyViewResponse> {
    match county_snapshot(&state.api, &q.state, &q.county).await {
        Ok(snapshot) => Json(CountyViewResponse::Ready {
            snapshot: Box::new(snapshot),
        }),
        Err(err) => {
            log_retrieval_failure(&q.state, &q.county, &err);
            Json(CountyViewResponse::Invalid {
                warning: INVALID_SELECTION_WARNING.to_string(),
            })
        }
    }
}

fn log_retrieval_failure(state: &str, county: &str, err: &RetrievalError) {
    match err {
        RetrievalError::EmptyBoundary { .. } => {
            warn!(
                target: "retrieval::empty_boundary",
                state, county, "no boundary geometry for selection"
            );
        }
        RetrievalError::ServiceUnavailable(detail) => {
            error!(
                target: "retrieval::service",
                state, county, %detail, "upstream service unavailable"
            );
        }
        RetrievalError::MalformedResponse(detail) => {
            error!(
                target: "retrieval::malformed",
                state, county, %detail, "malformed upstream response"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use echo_client::{EchoServices, SpatialData};
    use reference::ReferenceRow;
    use shared::domain::{CountyBoundary, FacilityRecord, Geoid, ScreeningTable};
    use tower::ServiceExt;

    struct StaticEcho {
        counties: Vec<CountyBoundary>,
        spatial_down: bool,
    }

    #[async_trait]
    impl EchoServices for StaticEcho {
        async fn active_facilities(
            &self,
            state: &str,
            county: &str,
        ) -> Result<Vec<FacilityRecord>, RetrievalError> {
            Ok(vec![FacilityRecord {
                name: "NORLITE LLC".into(),
                county: county.to_uppercase(),
                state: state.to_string(),
                lat: Some(42.78),
                long: Some(-73.70),
                registry_id: None,
                street: None,
                city: None,
                extra: BTreeMap::new(),
            }])
        }

        async fn spatial_data(
            &self,
            _state: &str,
            _county: &str,
        ) -> Result<SpatialData, RetrievalError> {
            if self.spatial_down {
                return Err(RetrievalError::unavailable("warehouse answered 503"));
            }
            Ok(SpatialData {
                counties: self.counties.clone(),
                state_geometry: None,
            })
        }

        async fn echo_data(&self, _sql: &str) -> Result<ScreeningTable, RetrievalError> {
            Ok(ScreeningTable {
                columns: vec!["ID".into()],
                rows: Vec::new(),
            })
        }
    }

    fn test_app(spatial_down: bool) -> Router {
        let reference = ReferenceTable::from_rows([
            ReferenceRow {
                state: "NY".into(),
                county: "Albany".into(),
            },
            ReferenceRow {
                state: "CA".into(),
                county: "Kern".into(),
            },
        ]);
        let services = StaticEcho {
            counties: vec![CountyBoundary {
                geoid: Geoid("36001".into()),
                name: "Albany".into(),
                geometry: serde_json::json!({
                    "type": "Polygon",
                    "coordinates": [[[-74.3, 42.4], [-73.7, 42.4], [-73.7, 42.8], [-74.3, 42.4]]]
                }),
            }],
            spatial_down,
        };
        let api = ApiContext {
            reference: Arc::new(reference),
            services: Arc::new(services),
        };
        build_router(Arc::new(AppState { api }))
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn states_endpoint_lists_sorted_states() {
        let response = test_app(false)
            .oneshot(Request::get("/api/states").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, serde_json::json!(["CA", "NY"]));
    }

    #[tokio::test]
    async fn counties_endpoint_rejects_unknown_states() {
        let response = test_app(false)
            .oneshot(
                Request::get("/api/counties?state=ZZ")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn view_endpoint_returns_a_ready_snapshot() {
        let response = test_app(false)
            .oneshot(
                Request::get("/api/view?state=NY&county=Albany")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "ready");
        assert_eq!(json["snapshot"]["facilities"]["rows"][0][0], "NORLITE LLC");
        assert_eq!(json["snapshot"]["map"]["markers"][0]["style"]["radius"], 8);
    }

    #[tokio::test]
    async fn failed_retrieval_collapses_to_the_generic_warning() {
        let response = test_app(true)
            .oneshot(
                Request::get("/api/view?state=NY&county=Albany")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "invalid");
        assert_eq!(json["warning"], INVALID_SELECTION_WARNING);
        assert!(json.get("snapshot").is_none(), "no partial data is shown");
    }

    #[tokio::test]
    async fn dashboard_page_is_served_at_the_root() {
        let response = test_app(false)
            .oneshot(Request::get("/").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
    }
}
