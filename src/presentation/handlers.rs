// HTTP request handlers
use std::sync::Arc;

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::application::error::ServiceError;
use crate::domain::comparison::RouteComparison;
use crate::domain::metrics::{DEFAULT_VIBRATION_THRESHOLD, RouteMetrics};
use crate::domain::route::{NewRoute, RouteRecord};
use crate::presentation::app_state::AppState;
use crate::presentation::auth::AuthUser;
use crate::presentation::error::{ApiError, ApiResult};

// ---------------------------------------------------------------------------
// Query parameter and body structs
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ThresholdQuery {
    pub threshold: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct CompareQuery {
    /// Comma-separated route ids, e.g. `ids=1,2,3`.
    pub ids: Option<String>,
    pub threshold: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct GeocodeQuery {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct CredentialsBody {
    pub username: String,
    pub password: String,
}

// ---------------------------------------------------------------------------
// Response payloads
// ---------------------------------------------------------------------------

/// Chart consumers key the channel series by their original
/// datalogger names; the wire keys are part of the contract.
#[derive(Debug, Serialize)]
pub struct ChannelSeriesPayload {
    pub temperatura: Vec<f64>,
    pub vibracao: Vec<f64>,
    pub umidade: Vec<f64>,
    pub coordenadas: Vec<[f64; 2]>,
}

#[derive(Debug, Serialize)]
pub struct KpiPayload {
    pub distance: f64,
    pub impacts: usize,
    pub max_vibration: f64,
}

impl KpiPayload {
    fn from_metrics(metrics: &RouteMetrics) -> Self {
        Self {
            distance: round2(metrics.total_distance_km),
            impacts: metrics.impact_count,
            max_vibration: round2(metrics.max_vibration),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RouteListItem {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub supplier: Option<String>,
    pub product: Option<String>,
    pub route_info: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RouteDashboardPayload {
    pub details: RouteRecord,
    pub labels: Vec<usize>,
    pub datasets: ChannelSeriesPayload,
    pub kpis: KpiPayload,
}

#[derive(Debug, Serialize)]
pub struct ComparisonDatasetPayload {
    pub name: String,
    pub temperatura: Vec<f64>,
    pub vibracao: Vec<f64>,
    pub umidade: Vec<f64>,
    pub kpis: KpiPayload,
}

#[derive(Debug, Serialize)]
pub struct ComparisonPayload {
    pub labels: Option<Vec<usize>>,
    pub datasets: Vec<ComparisonDatasetPayload>,
    pub all_coords: Vec<Vec<[f64; 2]>>,
}

impl ComparisonPayload {
    fn from_comparison(comparison: RouteComparison) -> Self {
        let mut datasets = Vec::with_capacity(comparison.entries.len());
        let mut all_coords = Vec::with_capacity(comparison.entries.len());

        for entry in comparison.entries {
            all_coords.push(to_coordinate_pairs(&entry.analysis.coordinates));
            datasets.push(ComparisonDatasetPayload {
                name: entry.name,
                kpis: KpiPayload::from_metrics(&entry.analysis.metrics),
                temperatura: entry.analysis.temperature,
                vibracao: entry.analysis.vibration,
                umidade: entry.analysis.humidity,
            });
        }

        Self {
            labels: comparison.labels,
            datasets,
            all_coords,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginPayload {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
    pub user: UserInfoPayload,
}

#[derive(Debug, Serialize)]
pub struct UserInfoPayload {
    pub id: i64,
    pub username: String,
}

/// KPI values are rounded to two decimals at this boundary only;
/// internal computation keeps full precision.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn to_coordinate_pairs(coords: &[(f64, f64)]) -> Vec<[f64; 2]> {
    coords.iter().map(|&(lat, lon)| [lat, lon]).collect()
}

/// Decode the `ids=1,2,3` query form.
fn parse_id_list(raw: Option<&str>) -> Result<Vec<i64>, ApiError> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::BadRequest("no route ids provided".to_string()))?;

    raw.split(',')
        .map(|part| {
            let part = part.trim();
            part.parse::<i64>()
                .map_err(|_| ApiError::BadRequest(format!("invalid route id '{part}'")))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// POST /auth/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CredentialsBody>,
) -> ApiResult<impl IntoResponse> {
    state
        .auth_service
        .register(&body.username, &body.password)
        .await?;
    Ok((StatusCode::CREATED, Json(json!({ "success": true }))))
}

/// POST /auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CredentialsBody>,
) -> ApiResult<Json<LoginPayload>> {
    let auth = state
        .auth_service
        .login(&body.username, &body.password)
        .await?;

    Ok(Json(LoginPayload {
        access_token: auth.token,
        token_type: "Bearer",
        expires_in: auth.expires_in_secs,
        user: UserInfoPayload {
            id: auth.user_id,
            username: auth.username,
        },
    }))
}

/// GET /routes
pub async fn list_routes(
    _user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<RouteListItem>>> {
    let routes = state.route_service.list_routes().await?;

    let items = routes
        .into_iter()
        .map(|record| RouteListItem {
            id: record.id,
            name: record.name,
            created_at: record.created_at,
            supplier: record.supplier,
            product: record.product,
            route_info: record.route_info,
        })
        .collect();
    Ok(Json(items))
}

/// POST /routes (multipart: name, supplier, product, route_info, file)
pub async fn upload_route(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> ApiResult<impl IntoResponse> {
    let mut name = None;
    let mut supplier = None;
    let mut product = None;
    let mut route_info = None;
    let mut client_filename = None;
    let mut payload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::BadRequest(format!("invalid multipart payload: {err}")))?
    {
        let read_err =
            |err| ApiError::BadRequest(format!("invalid multipart payload: {err}"));
        let field_name = field.name().map(str::to_string);
        match field_name.as_deref() {
            Some("name") => name = Some(field.text().await.map_err(read_err)?),
            Some("supplier") => supplier = Some(field.text().await.map_err(read_err)?),
            Some("product") => product = Some(field.text().await.map_err(read_err)?),
            Some("route_info") => route_info = Some(field.text().await.map_err(read_err)?),
            Some("file") => {
                client_filename = field.file_name().map(str::to_string);
                payload = Some(field.bytes().await.map_err(read_err)?);
            }
            _ => {}
        }
    }

    let (Some(name), Some(supplier), Some(product), Some(route_info), Some(filename), Some(payload)) =
        (name, supplier, product, route_info, client_filename, payload)
    else {
        return Err(ApiError::BadRequest(
            "all metadata fields and the file are required".to_string(),
        ));
    };

    let id = state
        .route_service
        .upload_route(
            NewRoute {
                name,
                supplier,
                product,
                route_info,
            },
            &filename,
            &payload,
        )
        .await?;

    tracing::info!(route_id = id, user_id = user.user_id, uploaded_by = %user.username, "route uploaded");
    Ok((StatusCode::CREATED, Json(json!({ "success": true, "id": id }))))
}

/// GET /routes/:id — recompute the dashboard from the raw samples.
pub async fn get_route_dashboard(
    _user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(route_id): Path<i64>,
    Query(query): Query<ThresholdQuery>,
) -> ApiResult<Json<RouteDashboardPayload>> {
    let threshold = query.threshold.unwrap_or(DEFAULT_VIBRATION_THRESHOLD);
    let dashboard = state
        .route_service
        .route_dashboard(route_id, threshold)
        .await?;

    Ok(Json(RouteDashboardPayload {
        labels: dashboard.analysis.labels(),
        kpis: KpiPayload::from_metrics(&dashboard.analysis.metrics),
        datasets: ChannelSeriesPayload {
            coordenadas: to_coordinate_pairs(&dashboard.analysis.coordinates),
            temperatura: dashboard.analysis.temperature,
            vibracao: dashboard.analysis.vibration,
            umidade: dashboard.analysis.humidity,
        },
        details: dashboard.details,
    }))
}

/// DELETE /routes/:id
pub async fn delete_route(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(route_id): Path<i64>,
) -> ApiResult<Json<serde_json::Value>> {
    state.route_service.delete_route(route_id).await?;
    tracing::info!(route_id, user_id = user.user_id, "route deleted");
    Ok(Json(json!({ "success": true })))
}

/// GET /compare?ids=1,2,3
pub async fn compare_routes(
    _user: AuthUser,
    State(state): State<Arc<AppState>>,
    Query(query): Query<CompareQuery>,
) -> ApiResult<Json<ComparisonPayload>> {
    let ids = parse_id_list(query.ids.as_deref())?;
    let threshold = query.threshold.unwrap_or(DEFAULT_VIBRATION_THRESHOLD);

    let comparison = state.route_service.compare_routes(&ids, threshold).await?;
    Ok(Json(ComparisonPayload::from_comparison(comparison)))
}

/// GET /reverse_geocode?lat=..&lon=..
pub async fn reverse_geocode(
    _user: AuthUser,
    State(state): State<Arc<AppState>>,
    Query(query): Query<GeocodeQuery>,
) -> ApiResult<Json<serde_json::Value>> {
    let (Some(lat), Some(lon)) = (query.lat, query.lon) else {
        return Err(ApiError::BadRequest("lat and lon are required".to_string()));
    };

    let address = state
        .geocode_service
        .reverse_geocode(lat, lon)
        .await
        .map_err(ServiceError::Internal)?;
    Ok(Json(json!({ "address": address })))
}
