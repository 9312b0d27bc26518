use axum::{
    Json, Router,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use weather_core::{AlertError, AlertOutcome, AlertService, NotificationService, NotificationView};

use crate::auth::{ApiKey, require_api_key};

#[derive(Debug, Clone)]
pub struct AppState {
    pub alerts: AlertService,
    pub notifications: NotificationService,
}

/// Errors returned to HTTP clients, each with a fixed status code.
#[derive(Debug)]
pub enum ApiError {
    MissingApiKey,
    InvalidApiKey,
    MissingFields,
    /// Latitude outside ±90 or longitude outside ±180; rejected before any upstream call.
    InvalidCoordinates(String),
    MissingEmailParam,
    NoNotifications(String),
    Alert(AlertError),
}

impl From<AlertError> for ApiError {
    fn from(err: AlertError) -> Self {
        ApiError::Alert(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::MissingApiKey => {
                (StatusCode::UNAUTHORIZED, json!({ "error": "API key requerida" }))
            }
            ApiError::InvalidApiKey => {
                (StatusCode::FORBIDDEN, json!({ "error": "API key inválida" }))
            }
            ApiError::MissingFields => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "latitude, longitude y email son requeridos" }),
            ),
            ApiError::InvalidCoordinates(msg) => {
                (StatusCode::BAD_REQUEST, json!({ "error": msg }))
            }
            ApiError::MissingEmailParam => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "El parámetro email es requerido" }),
            ),
            ApiError::NoNotifications(email) => (
                StatusCode::NOT_FOUND,
                json!({ "message": format!("No se encontraron notificaciones para {email}") }),
            ),
            ApiError::Alert(err) if err.is_upstream() => {
                warn!(error = %err, "alert workflow could not reach an upstream service");
                (StatusCode::BAD_GATEWAY, json!({ "error": err.to_string() }))
            }
            ApiError::Alert(err) => {
                error!(error = %err, "unexpected failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": format!("Error interno: {err}") }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct CheckWeatherRequest {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub email: Option<String>,
}

impl CheckWeatherRequest {
    fn validate(self) -> Result<(f64, f64, String), ApiError> {
        let (Some(latitude), Some(longitude), Some(email)) =
            (self.latitude, self.longitude, self.email)
        else {
            return Err(ApiError::MissingFields);
        };
        if email.trim().is_empty() {
            return Err(ApiError::MissingFields);
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(ApiError::InvalidCoordinates(format!(
                "latitude fuera de rango: {latitude}"
            )));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(ApiError::InvalidCoordinates(format!(
                "longitude fuera de rango: {longitude}"
            )));
        }

        Ok((latitude, longitude, email))
    }
}

#[derive(Debug, Deserialize)]
pub struct NotificationsQuery {
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct NotificationsResponse {
    pub notifications: Vec<NotificationView>,
}

pub fn router(state: AppState, api_key: ApiKey) -> Router {
    let auth = middleware::from_fn_with_state(api_key, require_api_key);

    Router::new()
        .route("/check_weather", post(check_weather).route_layer(auth.clone()))
        .route("/notifications", get(get_notifications).route_layer(auth))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn check_weather(
    State(state): State<AppState>,
    payload: Result<Json<CheckWeatherRequest>, JsonRejection>,
) -> Result<Json<AlertOutcome>, ApiError> {
    let Json(request) = payload.map_err(|_| ApiError::MissingFields)?;
    let (latitude, longitude, email) = request.validate()?;

    let outcome = state.alerts.process_forecast(latitude, longitude, &email).await?;
    Ok(Json(outcome))
}

async fn get_notifications(
    State(state): State<AppState>,
    query: Result<Query<NotificationsQuery>, QueryRejection>,
) -> Result<Json<NotificationsResponse>, ApiError> {
    let email = query
        .ok()
        .and_then(|Query(q)| q.email)
        .filter(|e| !e.is_empty())
        .ok_or(ApiError::MissingEmailParam)?;

    let found = state.notifications.get_by_email(&email).await?;
    if found.is_empty() {
        return Err(ApiError::NoNotifications(email));
    }

    Ok(Json(NotificationsResponse {
        notifications: found.iter().map(NotificationView::from).collect(),
    }))
}
