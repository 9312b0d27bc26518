//! Core library for the weather alert service.
//!
//! This crate defines:
//! - Configuration loading (environment or TOML file)
//! - The forecast provider and SMTP mailer used by the alert workflow
//! - The notification store and the services built on top of it
//!
//! It is used by `weather-alert-server`, which exposes the services over HTTP and the command line.

pub mod codes;
pub mod config;
pub mod error;
pub mod mailer;
pub mod model;
pub mod provider;
pub mod service;
pub mod store;
pub mod translate;

pub use config::{Config, MailConfig, WeatherApiConfig};
pub use error::{AlertError, AlertResult};
pub use mailer::{Mailer, SmtpMailer};
pub use model::{AlertOutcome, Forecast, NewNotification, Notification, NotificationView};
pub use provider::{ForecastProvider, WeatherApiProvider};
pub use service::{AlertService, NotificationService};
pub use store::{NotificationStore, SqliteStore};
