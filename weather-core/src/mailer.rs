use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use std::{fmt::Debug, fmt::Display, time::Duration};
use tracing::{info, warn};

use crate::{
    config::MailConfig,
    error::{AlertError, AlertResult},
    model::Forecast,
    translate::translate_condition,
};

pub const ALERT_SUBJECT: &str = "⚠️ Posible retraso en tu entrega por condiciones climáticas";

/// Delivers the adverse-weather alert to a recipient.
#[async_trait]
pub trait Mailer: Send + Sync + Debug {
    async fn send_alert(&self, to: &str, forecast: &Forecast) -> AlertResult<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertEmail {
    pub subject: String,
    pub body: String,
}

pub fn compose_alert(forecast: &Forecast) -> AlertEmail {
    let condition = translate_condition(forecast.code);
    let body = format!(
        "Hola!\n\n\
         Tenemos programada la entrega de tu paquete para mañana, \
         y se espera un clima con {condition} en tu ubicación. \
         Es posible que tengamos retrasos. Haremos todo lo posible para cumplir con tu entrega.\n\n\
         Fecha del clima: {}",
        forecast.date
    );

    AlertEmail { subject: ALERT_SUBJECT.to_string(), body }
}

fn delivery_failed(cause: impl Display) -> AlertError {
    AlertError::weather_api(format!("Error enviando el correo: {cause}"))
}

/// SMTP submission with username/password login. A fresh connection is opened per alert.
#[derive(Debug, Clone)]
pub struct SmtpMailer {
    config: MailConfig,
}

impl SmtpMailer {
    pub fn new(config: MailConfig) -> Self {
        Self { config }
    }

    fn build_message(&self, to: &str, email: AlertEmail) -> AlertResult<Message> {
        let from: Mailbox = self.config.username.parse().map_err(delivery_failed)?;
        let to: Mailbox = to.parse().map_err(delivery_failed)?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(email.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(email.body)
            .map_err(delivery_failed)
    }

    fn transport(&self) -> AlertResult<AsyncSmtpTransport<Tokio1Executor>> {
        let cfg = &self.config;
        let builder = if cfg.use_tls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&cfg.server)
                .map_err(delivery_failed)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&cfg.server)
        };

        Ok(builder
            .port(cfg.port)
            .credentials(Credentials::new(cfg.username.clone(), cfg.password.clone()))
            .timeout(Some(Duration::from_secs(cfg.timeout_secs)))
            .build())
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_alert(&self, to: &str, forecast: &Forecast) -> AlertResult<()> {
        let message = self.build_message(to, compose_alert(forecast))?;
        let transport = self.transport()?;

        transport.send(message).await.map_err(|e| {
            warn!(error = %e, server = %self.config.server, "SMTP delivery failed");
            delivery_failed(e)
        })?;

        info!(recipient = %to, code = forecast.code, "alert email sent");
        Ok(())
    }
}
