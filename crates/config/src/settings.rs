use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub app: AppSettings,
    pub database: DatabaseSettings,
    pub identity: IdentitySettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub name: String,
    pub max_pool_size: Option<u32>,
    pub min_pool_size: Option<u32>,
}

/// Settings for the external identity provider.
///
/// Callers authenticate against the provider; this backend only verifies the
/// provider's HS256 tokens and, when `metadata_endpoint` is set, pushes role
/// metadata back through the provider's admin API.
#[derive(Debug, Deserialize, Clone)]
pub struct IdentitySettings {
    pub jwt_secret: String,
    pub issuer: String,
    pub metadata_endpoint: Option<String>,
    pub api_key: Option<String>,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::default()
                    .separator("__")
                    .prefix("AGENCYHUB"),
            )
            .set_default("app.host", "0.0.0.0")?
            .set_default("app.port", 3000)?
            .set_default("app.cors_origins", Vec::<String>::new())?
            .set_default("database.url", "mongodb://localhost:27017")?
            .set_default("database.name", "agencyhub")?
            .set_default("identity.jwt_secret", "change-me-in-production")?
            .set_default("identity.issuer", "agencyhub-identity")?
            .set_default("identity.metadata_endpoint", None::<String>)?
            .set_default("identity.api_key", None::<String>)?
            .build()?;

        config.try_deserialize()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::load().expect("Failed to load default settings")
    }
}
