use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use std::{fmt, fs, path::Path, str::FromStr};

pub const DEFAULT_WEATHER_API_URL: &str = "https://api.weatherapi.com/v1/forecast.json";
pub const DEFAULT_DATABASE_URL: &str = "sqlite://weather_alerts.db";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";

fn default_weather_url() -> String {
    DEFAULT_WEATHER_API_URL.to_string()
}

fn default_days() -> u8 {
    2
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_mail_port() -> u16 {
    587
}

fn default_use_tls() -> bool {
    true
}

fn default_database_url() -> String {
    DEFAULT_DATABASE_URL.to_string()
}

fn default_bind_addr() -> String {
    DEFAULT_BIND_ADDR.to_string()
}

/// Upstream forecast API settings.
#[derive(Clone, Deserialize)]
pub struct WeatherApiConfig {
    pub api_key: String,
    #[serde(default = "default_weather_url")]
    pub url: String,
    /// Forecast depth requested upstream. The alert date is read from the second day.
    #[serde(default = "default_days")]
    pub days: u8,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Outbound SMTP settings. `username` doubles as the sender address.
#[derive(Clone, Deserialize)]
pub struct MailConfig {
    pub server: String,
    #[serde(default = "default_mail_port")]
    pub port: u16,
    pub username: String,
    pub password: String,
    #[serde(default = "default_use_tls")]
    pub use_tls: bool,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Top-level service configuration.
///
/// Example TOML:
/// ```toml
/// api_key = "inbound-secret"
///
/// [weather]
/// api_key = "..."
///
/// [mail]
/// server = "smtp.example.com"
/// username = "alerts@example.com"
/// password = "..."
/// ```
#[derive(Clone, Deserialize)]
pub struct Config {
    /// Pre-shared key expected in the `x-api-key` header.
    pub api_key: String,
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    pub weather: WeatherApiConfig,
    pub mail: MailConfig,
}

impl Config {
    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        cfg.validate()?;
        Ok(cfg)
    }

    /// Build config from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup using the environment variable names.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| {
            get(key).ok_or_else(|| anyhow!("Missing required environment variable {key}"))
        };

        let timeout_secs = parse_or(&get, "HTTP_TIMEOUT_SECS", default_timeout_secs())?;

        let cfg = Config {
            api_key: required("API_KEY")?,
            database_url: get("DATABASE_URL").unwrap_or_else(default_database_url),
            bind_addr: get("BIND_ADDR").unwrap_or_else(default_bind_addr),
            weather: WeatherApiConfig {
                api_key: required("WEATHER_API_KEY")?,
                url: get("WEATHER_API_URL").unwrap_or_else(default_weather_url),
                days: parse_or(&get, "WEATHER_DAYS", default_days())?,
                timeout_secs,
            },
            mail: MailConfig {
                server: required("MAIL_SERVER")?,
                port: parse_or(&get, "MAIL_PORT", default_mail_port())?,
                username: required("MAIL_USERNAME")?,
                password: required("MAIL_PASSWORD")?,
                use_tls: get("MAIL_USE_TLS")
                    .map(|v| v.trim().eq_ignore_ascii_case("true"))
                    .unwrap_or_else(default_use_tls),
                timeout_secs,
            },
        };

        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<()> {
        if self.weather.days < 2 {
            bail!(
                "WEATHER_DAYS must be at least 2 (got {}); \
                 the alert date comes from the second forecast day",
                self.weather.days
            );
        }
        Ok(())
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid value for {key}: {raw:?}")),
        None => Ok(default),
    }
}

const REDACTED: &str = "<redacted>";

impl fmt::Debug for WeatherApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherApiConfig")
            .field("api_key", &REDACTED)
            .field("url", &self.url)
            .field("days", &self.days)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailConfig")
            .field("server", &self.server)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &REDACTED)
            .field("use_tls", &self.use_tls)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &REDACTED)
            .field("database_url", &self.database_url)
            .field("bind_addr", &self.bind_addr)
            .field("weather", &self.weather)
            .field("mail", &self.mail)
            .finish()
    }
}
