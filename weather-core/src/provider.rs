use async_trait::async_trait;
use std::fmt::Debug;

use crate::{error::AlertResult, model::Forecast};

pub mod weatherapi;

pub use weatherapi::WeatherApiProvider;

/// Source of the forecast evaluated by the alert workflow.
#[async_trait]
pub trait ForecastProvider: Send + Sync + Debug {
    async fn fetch_forecast(&self, latitude: f64, longitude: f64) -> AlertResult<Forecast>;
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
