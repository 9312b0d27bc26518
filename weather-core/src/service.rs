use std::sync::Arc;
use tracing::{debug, info};

use crate::{
    codes::is_adverse,
    error::AlertResult,
    mailer::Mailer,
    model::{AlertOutcome, NewNotification, Notification},
    provider::ForecastProvider,
    store::NotificationStore,
};

pub const NO_SEVERE_WEATHER: &str = "No hay clima severo en la zona.";

/// Fetch → classify → (email, persist) → outcome.
#[derive(Debug, Clone)]
pub struct AlertService {
    provider: Arc<dyn ForecastProvider>,
    mailer: Arc<dyn Mailer>,
    store: Arc<dyn NotificationStore>,
}

impl AlertService {
    pub fn new(
        provider: Arc<dyn ForecastProvider>,
        mailer: Arc<dyn Mailer>,
        store: Arc<dyn NotificationStore>,
    ) -> Self {
        Self { provider, mailer, store }
    }

    /// Checks the forecast for a coordinate and alerts `email` if it is adverse.
    ///
    /// The email is sent before the notification is stored; if sending fails nothing is stored.
    pub async fn process_forecast(
        &self,
        latitude: f64,
        longitude: f64,
        email: &str,
    ) -> AlertResult<AlertOutcome> {
        let forecast = self.provider.fetch_forecast(latitude, longitude).await?;

        if !is_adverse(forecast.code) {
            debug!(code = forecast.code, "no adverse weather, skipping alert");
            return Ok(AlertOutcome {
                alert_sent: false,
                message: NO_SEVERE_WEATHER.to_string(),
                forecast,
            });
        }

        self.mailer.send_alert(email, &forecast).await?;

        let stored = self
            .store
            .insert(NewNotification::for_forecast(email, latitude, longitude, &forecast))
            .await?;
        info!(id = stored.id, code = forecast.code, "notification recorded");

        Ok(AlertOutcome {
            alert_sent: true,
            message: format!("Alerta enviada: clima {} en camino.", forecast.condition),
            forecast,
        })
    }
}

/// Read side of the notification history.
#[derive(Debug, Clone)]
pub struct NotificationService {
    store: Arc<dyn NotificationStore>,
}

impl NotificationService {
    pub fn new(store: Arc<dyn NotificationStore>) -> Self {
        Self { store }
    }

    pub async fn get_by_email(&self, email: &str) -> AlertResult<Vec<Notification>> {
        let found = self.store.find_by_email(email).await?;
        debug!(count = found.len(), "notifications queried");
        Ok(found)
    }
}
