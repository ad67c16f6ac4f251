use lettre::message::Mailbox;
use secrecy::{ExposeSecret, SecretString};
use sqlx::postgres::PgConnectOptions;
use std::{fmt::Display, str::FromStr, time::Duration};

#[derive(Clone, Debug)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub database: DatabaseSettings,
    pub email_client: EmailClientSettings,
}

#[derive(Clone, Debug)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
    pub base_url: String,
}

#[derive(Clone, Debug)]
pub struct DatabaseSettings {
    pub url: SecretString,
    pub service_key: Option<SecretString>,
    pub max_connections: u32,
    pub acquire_timeout_seconds: u64,
}

#[derive(Clone, Debug)]
pub struct EmailClientSettings {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<SecretString>,
    pub tls: SmtpTls,
    pub sender_email: String,
    pub timeout_milliseconds: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SmtpTls {
    StartTls,
    Tls,
    None,
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Reads the settings from the process environment.
pub fn get_configuration() -> Result<Settings, ConfigError> {
    Settings::from_lookup(|key| std::env::var(key).ok())
}

impl Settings {
    pub fn from_lookup<F>(lookup: F) -> Result<Settings, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let application = ApplicationSettings {
            host: var("APP_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_or("APP_PORT", var("APP_PORT"), 8000)?,
            base_url: required("SITE_URL", var("SITE_URL"))?,
        };

        let database = DatabaseSettings {
            url: required("DATABASE_URL", var("DATABASE_URL"))?.into(),
            service_key: var("DATABASE_SERVICE_KEY").map(SecretString::from),
            max_connections: parse_or(
                "DATABASE_MAX_CONNECTIONS",
                var("DATABASE_MAX_CONNECTIONS"),
                10,
            )?,
            acquire_timeout_seconds: parse_or(
                "DATABASE_ACQUIRE_TIMEOUT_SECONDS",
                var("DATABASE_ACQUIRE_TIMEOUT_SECONDS"),
                5,
            )?,
        };

        let email_client = EmailClientSettings {
            host: required("SMTP_HOST", var("SMTP_HOST"))?,
            port: parse_or("SMTP_PORT", var("SMTP_PORT"), 587)?,
            username: var("SMTP_USER"),
            password: var("SMTP_PASSWORD").map(SecretString::from),
            tls: parse_or("SMTP_TLS", var("SMTP_TLS"), SmtpTls::StartTls)?,
            sender_email: required("MAIL_FROM", var("MAIL_FROM"))?,
            timeout_milliseconds: parse_or(
                "SMTP_TIMEOUT_MILLISECONDS",
                var("SMTP_TIMEOUT_MILLISECONDS"),
                10_000,
            )?,
        };
        email_client.sender()?;

        Ok(Settings {
            application,
            database,
            email_client,
        })
    }
}

impl DatabaseSettings {
    pub fn connect_options(&self) -> Result<PgConnectOptions, ConfigError> {
        let options = PgConnectOptions::from_str(self.url.expose_secret()).map_err(|e| {
            ConfigError::Invalid {
                key: "DATABASE_URL",
                reason: e.to_string(),
            }
        })?;
        Ok(match &self.service_key {
            Some(key) => options.password(key.expose_secret()),
            None => options,
        })
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_seconds)
    }
}

impl EmailClientSettings {
    pub fn sender(&self) -> Result<Mailbox, ConfigError> {
        self.sender_email
            .parse()
            .map_err(|e: lettre::address::AddressError| ConfigError::Invalid {
                key: "MAIL_FROM",
                reason: e.to_string(),
            })
    }

    /// Credentials are only used when both the user and the password are set.
    pub fn credentials(&self) -> Option<(String, SecretString)> {
        match (&self.username, &self.password) {
            (Some(user), Some(password)) => Some((user.clone(), password.clone())),
            _ => None,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_milliseconds)
    }
}

impl FromStr for SmtpTls {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "starttls" => Ok(Self::StartTls),
            "tls" => Ok(Self::Tls),
            "none" => Ok(Self::None),
            other => Err(format!(
                "{other} is not a supported TLS mode. Use either `starttls`, `tls` or `none`."
            )),
        }
    }
}

fn required(key: &'static str, value: Option<String>) -> Result<String, ConfigError> {
    value.ok_or(ConfigError::Missing(key))
}

fn parse_or<T>(key: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match value {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        }),
    }
}
