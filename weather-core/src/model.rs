use chrono::NaiveDateTime;
use serde::Serialize;

/// Format used when notification timestamps are rendered for clients.
pub const SENT_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One day's condition summary for a coordinate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Forecast {
    pub code: i64,
    pub condition: String,
    /// ISO date, e.g. `2025-04-08`.
    pub date: String,
}

/// Result of a single `process_forecast` run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertOutcome {
    pub alert_sent: bool,
    pub message: String,
    pub forecast: Forecast,
}

/// A persisted record of one alert email.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Notification {
    pub id: i64,
    pub email: String,
    pub latitude: f64,
    pub longitude: f64,
    pub condition: String,
    pub code: i64,
    pub sent_at: NaiveDateTime,
}

/// Fields supplied by the workflow; id and `sent_at` are assigned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewNotification {
    pub email: String,
    pub latitude: f64,
    pub longitude: f64,
    pub condition: String,
    pub code: i64,
}

impl NewNotification {
    pub fn for_forecast(email: &str, latitude: f64, longitude: f64, forecast: &Forecast) -> Self {
        Self {
            email: email.to_string(),
            latitude,
            longitude,
            condition: forecast.condition.clone(),
            code: forecast.code,
        }
    }
}

/// Client-facing shape of a stored notification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationView {
    pub sent_at: String,
    pub latitude: f64,
    pub longitude: f64,
    pub condition: String,
    pub code: i64,
}

impl From<&Notification> for NotificationView {
    fn from(n: &Notification) -> Self {
        Self {
            sent_at: n.sent_at.format(SENT_AT_FORMAT).to_string(),
            latitude: n.latitude,
            longitude: n.longitude,
            condition: n.condition.clone(),
            code: n.code,
        }
    }
}
