use crate::sessions::CleanupConfig;
use secrecy::Secret;
use std::fmt;

#[derive(Clone, serde::Deserialize)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub database: DatabaseSettings,
    pub session: SessionSettings,
    pub body: BodySettings,
}

#[derive(Clone, serde::Deserialize)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    /// Shared by the cookie parser and the session middleware.
    pub secret: Secret<String>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Test,
    Staging,
    Production,
}

impl Environment {
    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Test => "test",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Handed to routes as application data, never connected to here.
#[derive(Clone, serde::Deserialize)]
pub struct DatabaseSettings {
    pub url: Secret<String>,
}

#[derive(Clone, serde::Deserialize)]
pub struct SessionSettings {
    pub cookie_name: String,
    pub cookie_max_age_seconds: i64,
    pub cookie_secure: bool,
    pub cleanup_enabled: bool,
    pub cleanup_interval_seconds: u64,
}

impl SessionSettings {
    pub fn cookie_max_age(&self) -> time::Duration {
        time::Duration::seconds(self.cookie_max_age_seconds)
    }

    pub fn cleanup_config(&self) -> CleanupConfig {
        CleanupConfig::new(
            self.cleanup_enabled,
            std::time::Duration::from_secs(self.cleanup_interval_seconds),
        )
    }
}

#[derive(Clone, serde::Deserialize)]
pub struct BodySettings {
    pub json_limit_bytes: usize,
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(
            config::File::new("configuration.yml", config::FileFormat::Yaml).required(false),
        )
        .add_source(config::File::new("/etc/backend.yml", config::FileFormat::Yaml).required(false))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}
