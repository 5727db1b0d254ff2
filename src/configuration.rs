use std::env;
use std::env::current_dir;
use std::fmt::Display;
use std::time::Duration;

use config::Config;
use config::ConfigError;
use secrecy::ExposeSecret;
use secrecy::Secret;
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_bool_from_anything;
use serde_aux::field_attributes::deserialize_number_from_string;
use sqlx::postgres::PgConnectOptions;

/// Global configuration, loaded from the `configuration` directory. See
/// `get_configuration`.
#[derive(Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub waitlist: WaitlistSettings,

    /// Left out entirely when no store has been provisioned; the signup form
    /// then reports a configuration error instead of attempting an insert.
    #[serde(default)]
    pub store: Option<StoreSettings>,
}

/// Server configuration
#[derive(Deserialize, Clone)]
pub struct ApplicationSettings {
    /// Should be localhost on dev machine, 0.0.0.0 on prod
    pub host: String,

    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,

    /// Signs the visitor session cookie. Must be at least 64 bytes.
    pub session_secret: Secret<String>,

    /// Browsers will not send `Secure` cookies over plain http, so this is
    /// off for local development.
    #[serde(deserialize_with = "deserialize_bool_from_anything")]
    pub secure_cookies: bool,
}

/// Behaviour of the signup form itself
#[derive(Deserialize, Clone)]
pub struct WaitlistSettings {
    /// Tag stored alongside every entry, identifying the surface that
    /// produced it
    pub source: String,

    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub submit_timeout_milliseconds: u64,

    /// Visitors idle for longer than this are forgotten by the expiry worker
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub visitor_ttl_seconds: u64,

    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub expiry_interval_seconds: u64,
}

impl WaitlistSettings {
    pub fn submit_timeout(&self) -> Duration { Duration::from_millis(self.submit_timeout_milliseconds) }

    pub fn visitor_ttl(&self) -> Duration { Duration::from_secs(self.visitor_ttl_seconds) }

    pub fn expiry_interval(&self) -> Duration { Duration::from_secs(self.expiry_interval_seconds) }
}

/// Which backend holds the waitlist table. Selected with the `backend` key:
///
/// ```yaml
/// store:
///   backend: rest
///   base_url: https://xyz.supabase.co
///   api_key: ...
///   table: waitlist
///   timeout_milliseconds: 10000
/// ```
#[derive(Deserialize, Clone, Debug)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum StoreSettings {
    Rest(RestStoreSettings),
    Postgres(DatabaseSettings),
}

/// A hosted database exposing its tables over a PostgREST-style HTTP API
#[derive(Deserialize, Clone, Debug)]
pub struct RestStoreSettings {
    pub base_url: String,

    /// Public (anonymous) key; sent as both `apikey` and bearer token
    pub api_key: Secret<String>,

    pub table: String,

    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,
}

impl RestStoreSettings {
    pub fn timeout(&self) -> Duration { Duration::from_millis(self.timeout_milliseconds) }

    /// Both the url and the key must be present for the store to be usable
    pub fn is_complete(&self) -> bool {
        !self.base_url.trim().is_empty() && !self.api_key.expose_secret().trim().is_empty()
    }
}

/// Database configuration
#[derive(Deserialize, Clone, Debug)]
pub struct DatabaseSettings {
    pub username: String,
    pub password: Secret<String>,
    pub host: String,

    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub database_name: String,

    /// Should be `true` in production.
    /// https://www.postgresql.org/docs/current/libpq-ssl.html#LIBPQ-SSL-SSLMODE-STATEMENTS
    #[serde(deserialize_with = "deserialize_bool_from_anything")]
    pub require_ssl: bool,
}

impl DatabaseSettings {
    /// Connection to the named database. The password is concealed.
    pub fn connection(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .username(&self.username)
            .password(self.password.expose_secret())
            .host(&self.host)
            .port(self.port)
            .database(&self.database_name)
            .ssl_mode(match self.require_ssl {
                true => sqlx::postgres::PgSslMode::Require,
                false => sqlx::postgres::PgSslMode::Prefer,
            })
    }
}

pub enum Environment {
    Local,
    Production,
}

impl Display for Environment {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Environment::Local => "local",
                Environment::Production => "production",
            }
        )
    }
}

impl TryFrom<String> for Environment {
    type Error = String;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            e => Err(format!("Invalid environment: {e}")),
        }
    }
}

/// Load yaml configuration files at `<project_root>/configuration`:
/// `base.yaml`, then `{APP_ENVIRONMENT}.yaml` (default `local`), then any
/// `APP_`-prefixed env vars.
///
/// `APP_APPLICATION__PORT=5001` -> `Settings.application.port`
pub fn get_configuration() -> Result<Settings, ConfigError> {
    let cfg_dir = current_dir()
        .map_err(|e| ConfigError::Message(format!("could not get current dir: {e}")))?
        .join("configuration");

    let env: Environment = env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".to_string())
        .try_into()
        .map_err(ConfigError::Message)?;

    let settings = Config::builder()
        .add_source(config::File::from(cfg_dir.join("base.yaml")))
        .add_source(config::File::from(cfg_dir.join(format!("{env}.yaml"))))
        .add_source(
            // env vars are -always- parsed as String, hence `serde-aux` above
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}
