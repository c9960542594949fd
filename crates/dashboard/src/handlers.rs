// =============================================================================
// GangaWatch Dashboard - HTTP Handlers
// =============================================================================
// Endpoints for the dashboard page, chart images and the JSON API
// =============================================================================

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{Html, IntoResponse},
    Json,
};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};

use crate::artifacts::{Availability, ChartKind, TableStatus};
use crate::catalog::{self, Scenario, Selection};
use crate::error::{AppError, AppResult};
use crate::forecast::ForecastTable;
use crate::page::{self, DashboardPage};
use crate::AppState;

// =============================================================================
// Request/Response Types
// =============================================================================

/// Raw form values; every field is optional.
#[derive(Debug, Default, Deserialize)]
pub struct SelectionQuery {
    pub city: Option<String>,
    pub scenario: Option<String>,
    pub parameter: Option<String>,
}

impl SelectionQuery {
    fn resolve(&self) -> Result<Selection, catalog::SelectionError> {
        Selection::resolve(
            non_empty(&self.city),
            non_empty(&self.scenario),
            non_empty(&self.parameter),
        )
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Query extractor whose rejections are reported as JSON errors.
type SelectionParams = WithRejection<Query<SelectionQuery>, AppError>;

#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub cities: &'static [&'static str],
    pub scenarios: &'static [Scenario],
}

#[derive(Debug, Serialize)]
pub struct ForecastResponse {
    pub city: &'static str,
    pub scenario: &'static str,
    pub parameter: &'static str,
    pub effect: &'static str,
    pub availability: Availability,
    pub table: Option<ForecastTable>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_error: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// GET / - Render the dashboard for the selected city, scenario and parameter.
pub async fn dashboard(
    State(state): State<AppState>,
    WithRejection(Query(query), _): SelectionParams,
) -> AppResult<Html<String>> {
    let selection = query.resolve()?;
    let (availability, table) = load(&state, &selection).await;

    tracing::info!(
        city = selection.city,
        scenario = selection.scenario.name,
        parameter = selection.parameter,
        table = availability.forecast_table,
        forecast_chart = availability.forecast_chart,
        predictions_chart = availability.predictions_chart,
        "Dashboard requested"
    );

    Ok(Html(page::render(&DashboardPage {
        selection,
        availability,
        table,
    })))
}

/// GET /charts/{kind} - Serve a pre-rendered chart image.
pub async fn chart(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    WithRejection(Query(query), _): SelectionParams,
) -> AppResult<impl IntoResponse> {
    let kind: ChartKind = kind.parse()?;
    let selection = query.resolve()?;
    let bytes = state.store.read_bytes(&selection, kind.into()).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "image/png"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        bytes,
    ))
}

/// GET /api/catalog - Cities and scenarios with their expected effects.
pub async fn get_catalog() -> Json<CatalogResponse> {
    Json(CatalogResponse {
        cities: catalog::cities(),
        scenarios: catalog::scenarios(),
    })
}

/// GET /api/forecast - Artifact availability and the forecast table as JSON.
pub async fn get_forecast(
    State(state): State<AppState>,
    WithRejection(Query(query), _): SelectionParams,
) -> AppResult<Json<ForecastResponse>> {
    let selection = query.resolve()?;
    let (availability, table) = load(&state, &selection).await;

    let (table, table_error) = match table {
        TableStatus::Loaded(table) => (Some(table), None),
        TableStatus::Missing => (None, None),
        TableStatus::Unreadable(detail) => (None, Some(detail)),
    };

    Ok(Json(ForecastResponse {
        city: selection.city,
        scenario: selection.scenario.name,
        parameter: selection.parameter,
        effect: selection.effect(),
        availability,
        table,
        table_error,
    }))
}

async fn load(state: &AppState, selection: &Selection) -> (Availability, TableStatus) {
    let availability = state.store.availability(selection).await;
    let table = if availability.forecast_table {
        state
            .store
            .load_table(selection, state.config.max_table_rows)
            .await
    } else {
        TableStatus::Missing
    };
    (availability, table)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::tests::write_artifact;
    use crate::artifacts::ArtifactKind;
    use crate::config::Config;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        Router,
    };
    use tower::ServiceExt;

    fn app(root: &std::path::Path) -> Router {
        let config = Config {
            data_root: root.to_path_buf(),
            max_table_rows: 2,
            ..Config::default()
        };
        crate::create_router(AppState::new(config))
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    fn howrah_sewage() -> Selection {
        Selection::resolve(
            Some("Howrah"),
            Some("Sewage Overflow"),
            Some("Fecal Coliform"),
        )
        .unwrap()
    }

    const HOWRAH_QUERY: &str =
        "city=Howrah&scenario=Sewage%20Overflow&parameter=Fecal%20Coliform";

    #[tokio::test]
    async fn test_health() {
        let dir = tempfile::tempdir().unwrap();
        let (status, body) = get(app(dir.path()), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"OK");
    }

    #[tokio::test]
    async fn test_dashboard_defaults_with_no_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let (status, body) = get(app(dir.path()), "/").await;
        let html = String::from_utf8(body).unwrap();

        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("Water Quality Forecasting for Kanpur"));
        assert!(html.contains("No forecast data available for Dissolved Oxygen in Algal Bloom."));
        assert!(html.contains(
            "No forecast visualization available for Dissolved Oxygen in Algal Bloom."
        ));
        assert!(html.contains(
            "No Actual vs Predicted graph available for Dissolved Oxygen in Algal Bloom."
        ));
    }

    #[tokio::test]
    async fn test_dashboard_shows_existing_artifacts_only() {
        let dir = tempfile::tempdir().unwrap();
        let selection = howrah_sewage();
        write_artifact(
            dir.path(),
            &selection,
            ArtifactKind::ForecastTable,
            b"ds,yhat\n2024-01-01,1200\n2024-01-02,1350\n2024-01-03,1410\n",
        );
        write_artifact(dir.path(), &selection, ArtifactKind::PredictionsChart, b"\x89PNG");

        let (status, body) = get(app(dir.path()), &format!("/?{HOWRAH_QUERY}")).await;
        let html = String::from_utf8(body).unwrap();

        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("<h3>Forecast Data for Fecal Coliform</h3>"));
        assert!(html.contains("<td>2024-01-02</td><td>1350</td>"));
        assert!(!html.contains("2024-01-03"));
        assert!(html.contains("Showing 2 of 3 rows."));
        assert!(html.contains(
            "No forecast visualization available for Fecal Coliform in Sewage Overflow."
        ));
        assert!(html.contains(
            "<figcaption>Fecal Coliform Actual vs Predicted Graph</figcaption>"
        ));
    }

    #[tokio::test]
    async fn test_empty_values_use_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let (status, body) = get(app(dir.path()), "/?city=&scenario=&parameter=").await;
        assert_eq!(status, StatusCode::OK);
        let html = String::from_utf8(body).unwrap();
        assert!(html.contains("Water Quality Forecasting for Kanpur"));
    }

    #[tokio::test]
    async fn test_unknown_city_is_bad_request() {
        let dir = tempfile::tempdir().unwrap();
        let (status, body) = get(app(dir.path()), "/?city=..%2F..%2Fetc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Unknown city: ../../etc");
    }

    #[tokio::test]
    async fn test_chart_served_when_present() {
        let dir = tempfile::tempdir().unwrap();
        let selection = howrah_sewage();
        write_artifact(dir.path(), &selection, ArtifactKind::ForecastChart, b"\x89PNG\r\n");

        let response = app(dir.path())
            .oneshot(
                Request::builder()
                    .uri(format!("/charts/forecast?{HOWRAH_QUERY}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"\x89PNG\r\n");
    }

    #[tokio::test]
    async fn test_chart_missing_or_unknown_kind_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let uri = format!("/charts/predictions?{HOWRAH_QUERY}");
        let (status, _) = get(app(dir.path()), &uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = get(app(dir.path()), &format!("/charts/table?{HOWRAH_QUERY}")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_chart_directory_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::new(Config {
            data_root: dir.path().to_path_buf(),
            ..Config::default()
        });
        let selection = Selection::default();
        let chart_path = state.store.path(&selection, ArtifactKind::ForecastChart);
        std::fs::create_dir_all(&chart_path).unwrap();
        assert!(!state.store.exists(&selection, ArtifactKind::ForecastChart).await);

        let (status, body) = get(crate::create_router(state), "/charts/forecast").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(json["error"].as_str().unwrap().starts_with("No artifact for Kanpur"));
    }

    #[tokio::test]
    async fn test_malformed_query_is_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let response = app(dir.path())
            .oneshot(
                Request::builder()
                    .uri("/?city=Kanpur&city=Howrah")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(json["error"].as_str().unwrap().contains("duplicate field"));
    }

    #[tokio::test]
    async fn test_catalog_json() {
        let dir = tempfile::tempdir().unwrap();
        let (status, body) = get(app(dir.path()), "/api/catalog").await;
        assert_eq!(status, StatusCode::OK);

        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["cities"].as_array().unwrap().len(), 12);
        assert_eq!(json["scenarios"].as_array().unwrap().len(), 10);
        assert_eq!(json["scenarios"][0]["name"], "Algal Bloom");
    }

    #[tokio::test]
    async fn test_forecast_json() {
        let dir = tempfile::tempdir().unwrap();
        let selection = howrah_sewage();
        let csv = b"ds,yhat\n2024-01-01,1200\n";
        write_artifact(dir.path(), &selection, ArtifactKind::ForecastTable, csv);

        let uri = format!("/api/forecast?{HOWRAH_QUERY}");
        let (status, body) = get(app(dir.path()), &uri).await;
        assert_eq!(status, StatusCode::OK);

        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["city"], "Howrah");
        assert_eq!(json["effect"], "+70%");
        assert_eq!(json["availability"]["forecast_table"], true);
        assert_eq!(json["availability"]["forecast_chart"], false);
        assert_eq!(json["table"]["rows"][0][1], "1200");
        assert!(json.get("table_error").is_none());
    }

    #[tokio::test]
    async fn test_forecast_json_without_table() {
        let dir = tempfile::tempdir().unwrap();
        let uri = "/api/forecast?scenario=Algal%20Bloom&parameter=Nitrate";
        let (_, body) = get(app(dir.path()), uri).await;

        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["parameter"], "Nitrate");
        assert!(json["table"].is_null());
    }
}
