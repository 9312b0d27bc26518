use anyhow::Context;
use clap::{Parser, Subcommand};
use std::{path::PathBuf, sync::Arc};
use tracing::info;

use weather_core::{
    AlertService, Config, NotificationService, NotificationStore, NotificationView, SmtpMailer,
    SqliteStore, WeatherApiProvider,
};

use crate::{
    api::{self, AppState},
    auth::ApiKey,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-alert", version, about = "Adverse-weather alert service")]
pub struct Cli {
    /// Read settings from a TOML file instead of environment variables.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP service.
    Serve {
        /// Listen address; overrides BIND_ADDR.
        #[arg(long)]
        bind: Option<String>,
    },

    /// Check the forecast once and alert the recipient if it is adverse.
    Check {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        #[arg(long, allow_negative_numbers = true)]
        lon: f64,

        /// Recipient of the alert email.
        #[arg(long)]
        email: String,
    },

    /// Print alerts previously sent to an address.
    History {
        #[arg(long)]
        email: String,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::from_env()?,
        };

        let store = Arc::new(
            SqliteStore::connect(&config.database_url)
                .await
                .with_context(|| format!("Failed to open database {}", config.database_url))?,
        );

        let result = self.command.execute(&config, store.clone()).await;
        store.close().await;
        result
    }
}

impl Command {
    async fn execute(self, config: &Config, store: Arc<SqliteStore>) -> anyhow::Result<()> {
        let notifications = NotificationService::new(store.clone() as Arc<dyn NotificationStore>);

        match self {
            Command::Serve { bind } => {
                let state = AppState { alerts: alert_service(config, store)?, notifications };
                let app = api::router(state, ApiKey::new(&config.api_key));

                let addr = bind.unwrap_or_else(|| config.bind_addr.clone());
                let listener = tokio::net::TcpListener::bind(&addr)
                    .await
                    .with_context(|| format!("Failed to bind {addr}"))?;
                info!(%addr, "listening");

                axum::serve(listener, app)
                    .with_graceful_shutdown(shutdown_signal()?)
                    .await
                    .context("HTTP server failed")?;
                info!("shut down");
            }
            Command::Check { lat, lon, email } => {
                let outcome =
                    alert_service(config, store)?.process_forecast(lat, lon, &email).await?;
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            }
            Command::History { email } => {
                let found = notifications.get_by_email(&email).await?;
                if found.is_empty() {
                    println!("No notifications for {email}");
                } else {
                    let views: Vec<NotificationView> =
                        found.iter().map(NotificationView::from).collect();
                    println!("{}", serde_json::to_string_pretty(&views)?);
                }
            }
        }

        Ok(())
    }
}

fn alert_service(config: &Config, store: Arc<SqliteStore>) -> anyhow::Result<AlertService> {
    let provider = WeatherApiProvider::new(&config.weather)?;
    let mailer = SmtpMailer::new(config.mail.clone());

    Ok(AlertService::new(Arc::new(provider), Arc::new(mailer), store))
}

/// Resolves on Ctrl-C, or SIGTERM on unix. The SIGTERM handler is installed before returning.
fn shutdown_signal() -> anyhow::Result<impl Future<Output = ()> + Send + 'static> {
    #[cfg(unix)]
    let mut sigterm = {
        use tokio::signal::unix::{SignalKind, signal};
        signal(SignalKind::terminate()).context("Failed to install SIGTERM handler")?
    };

    Ok(async move {
        let ctrl_c = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for Ctrl-C");
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async move {
            sigterm.recv().await;
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => info!("received Ctrl-C, shutting down"),
            _ = terminate => info!("received SIGTERM, shutting down"),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn check_accepts_negative_coordinates() {
        let cli = Cli::try_parse_from([
            "weather-alert",
            "check",
            "--lat",
            "10.0",
            "--lon",
            "-84.0",
            "--email",
            "usuario@correo.com",
        ])
        .expect("arguments parse");

        match cli.command {
            Command::Check { lat, lon, email } => {
                assert_eq!(lat, 10.0);
                assert_eq!(lon, -84.0);
                assert_eq!(email, "usuario@correo.com");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn config_flag_is_global() {
        let cli = Cli::try_parse_from(["weather-alert", "serve", "--config", "alerts.toml"])
            .expect("arguments parse");

        assert_eq!(cli.config, Some(PathBuf::from("alerts.toml")));
        assert!(matches!(cli.command, Command::Serve { bind: None }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn sigterm_resolves_shutdown_signal() {
        let shutdown = shutdown_signal().expect("handler installs");

        let status = std::process::Command::new("kill")
            .args(["-TERM", &std::process::id().to_string()])
            .status()
            .expect("kill runs");
        assert!(status.success());

        tokio::time::timeout(std::time::Duration::from_secs(5), shutdown)
            .await
            .expect("shutdown future resolves after SIGTERM");
    }
}
