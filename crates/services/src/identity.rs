use async_trait::async_trait;
use jsonwebtoken::{DecodingKey, Validation, decode, errors::ErrorKind};
use agencyhub_config::IdentitySettings;
use agencyhub_db::models::Role;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Token expired")]
    TokenExpired,
    #[error("Invalid token: {0}")]
    InvalidToken(String),
    #[error("Metadata sync failed: {0}")]
    SyncFailed(String),
}

/// The authenticated caller as asserted by the external identity provider.
#[derive(Debug, Clone)]
pub struct Caller {
    pub subject: String,
    pub email: String,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub avatar_url: Option<String>,
}

impl Caller {
    /// `"<given> <family>"`. Absent name parts become the literal
    /// "undefined", matching what the provider payload yields upstream.
    pub fn display_name(&self) -> String {
        format!(
            "{} {}",
            self.given_name.as_deref().unwrap_or("undefined"),
            self.family_name.as_deref().unwrap_or("undefined"),
        )
    }
}

/// Claims carried by the provider's HS256 session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallerClaims {
    pub sub: String,
    pub email: String,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub avatar_url: Option<String>,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
}

/// Write side of the provider integration: role metadata pushed back so
/// permission checks outside this backend see the same role.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn set_role_metadata(
        &self,
        subject: &str,
        role: Option<Role>,
    ) -> Result<(), IdentityError>;
}

/// Talks to the provider's admin API.
pub struct HttpIdentityProvider {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpIdentityProvider {
    pub fn new(endpoint: String, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            api_key,
        }
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn set_role_metadata(
        &self,
        subject: &str,
        role: Option<Role>,
    ) -> Result<(), IdentityError> {
        let url = format!("{}/users/{}/metadata", self.endpoint, subject);
        let mut request = self
            .client
            .put(&url)
            .json(&serde_json::json!({ "role": role }));
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| IdentityError::SyncFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(IdentityError::SyncFailed(format!(
                "provider returned {}",
                response.status()
            )));
        }
        Ok(())
    }
}

/// Used when no provider admin endpoint is configured.
pub struct NullIdentityProvider;

#[async_trait]
impl IdentityProvider for NullIdentityProvider {
    async fn set_role_metadata(
        &self,
        subject: &str,
        role: Option<Role>,
    ) -> Result<(), IdentityError> {
        debug!(subject, ?role, "No identity metadata endpoint configured, skipping sync");
        Ok(())
    }
}

pub struct IdentityService {
    decoding_key: DecodingKey,
    issuer: String,
    provider: Box<dyn IdentityProvider>,
}

impl IdentityService {
    pub fn new(settings: &IdentitySettings) -> Self {
        let provider: Box<dyn IdentityProvider> = match &settings.metadata_endpoint {
            Some(endpoint) => Box::new(HttpIdentityProvider::new(
                endpoint.clone(),
                settings.api_key.clone(),
            )),
            None => Box::new(NullIdentityProvider),
        };

        Self {
            decoding_key: DecodingKey::from_secret(settings.jwt_secret.as_bytes()),
            issuer: settings.issuer.clone(),
            provider,
        }
    }

    pub fn verify_token(&self, token: &str) -> Result<Caller, IdentityError> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.issuer]);

        let data = decode::<CallerClaims>(token, &self.decoding_key, &validation).map_err(
            |e| match e.kind() {
                ErrorKind::ExpiredSignature => IdentityError::TokenExpired,
                _ => IdentityError::InvalidToken(e.to_string()),
            },
        )?;

        let claims = data.claims;
        Ok(Caller {
            subject: claims.sub,
            email: claims.email,
            given_name: claims.given_name,
            family_name: claims.family_name,
            avatar_url: claims.avatar_url,
        })
    }

    pub async fn sync_role_metadata(
        &self,
        subject: &str,
        role: Option<Role>,
    ) -> Result<(), IdentityError> {
        self.provider.set_role_metadata(subject, role).await
    }
}
