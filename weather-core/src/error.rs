use thiserror::Error;

/// Failures surfaced by the alert workflow and the notification history.
#[derive(Debug, Error)]
pub enum AlertError {
    /// The forecast could not be fetched, or the alert email could not be delivered.
    /// Both mean the workflow could not complete its external calls.
    #[error("{0}")]
    WeatherApi(String),

    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AlertError {
    pub fn weather_api(msg: impl Into<String>) -> Self {
        AlertError::WeatherApi(msg.into())
    }

    pub fn is_upstream(&self) -> bool {
        matches!(self, AlertError::WeatherApi(_))
    }
}

pub type AlertResult<T> = std::result::Result<T, AlertError>;
