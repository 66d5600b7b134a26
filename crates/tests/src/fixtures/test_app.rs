use mongodb::{Client, Database, options::ClientOptions};
use agencyhub_api::{build_router, state::AppState};
use agencyhub_config::{AppSettings, DatabaseSettings, IdentitySettings, Settings};
use agencyhub_db::indexes::ensure_indexes;
use agencyhub_services::identity::CallerClaims;
use jsonwebtoken::{EncodingKey, Header, encode};
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// A running test application with its own MongoDB database.
pub struct TestApp {
    pub addr: SocketAddr,
    pub base_url: String,
    pub db: Database,
    pub settings: Settings,
    pub client: reqwest::Client,
}

impl TestApp {
    /// Spawn a new test server connected to the test MongoDB.
    ///
    /// Requires a running MongoDB at localhost:27017.
    /// Set AGENCYHUB__DATABASE__URL env var to override the connection
    /// string. Each test gets a unique database name for isolation.
    pub async fn spawn() -> Self {
        let db_name = format!("agencyhub_test_{}", uuid::Uuid::new_v4().simple());

        let mut settings = Settings::load().unwrap_or_else(|_| test_settings());
        // Allow env var override for database URL
        if let Ok(url) = std::env::var("AGENCYHUB__DATABASE__URL") {
            settings.database.url = url;
        }
        settings.database.name = db_name.clone();

        let client_options = ClientOptions::parse(&settings.database.url)
            .await
            .expect("Failed to parse MongoDB URL");
        let mongo_client =
            Client::with_options(client_options).expect("Failed to create MongoDB client");
        let db = mongo_client.database(&db_name);

        ensure_indexes(&db).await.expect("Failed to create indexes");

        let app_state = AppState::new(db.clone(), settings.clone());
        let app = build_router(app_state);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let base_url = format!("http://{}", addr);
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            addr,
            base_url,
            db,
            settings,
            client,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Signs a session token the way the external identity provider would.
    pub fn mint_token(
        &self,
        subject: &str,
        email: &str,
        given_name: Option<&str>,
        family_name: Option<&str>,
    ) -> String {
        let now = chrono::Utc::now();
        let claims = CallerClaims {
            sub: subject.to_string(),
            email: email.to_string(),
            given_name: given_name.map(str::to_string),
            family_name: family_name.map(str::to_string),
            avatar_url: None,
            iat: now.timestamp(),
            exp: (now + chrono::Duration::hours(1)).timestamp(),
            iss: self.settings.identity.issuer.clone(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.settings.identity.jwt_secret.as_bytes()),
        )
        .expect("Failed to sign test token")
    }

    pub fn auth_get(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.client.get(self.url(path)).bearer_auth(token)
    }

    pub fn auth_post(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.client.post(self.url(path)).bearer_auth(token)
    }

    pub fn auth_put(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.client.put(self.url(path)).bearer_auth(token)
    }

    pub fn auth_delete(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.client.delete(self.url(path)).bearer_auth(token)
    }
}

fn test_settings() -> Settings {
    Settings {
        app: AppSettings {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: Vec::new(),
        },
        database: DatabaseSettings {
            url: "mongodb://localhost:27017".to_string(),
            name: "agencyhub_test".to_string(),
            max_pool_size: None,
            min_pool_size: None,
        },
        identity: IdentitySettings {
            jwt_secret: "test-secret".to_string(),
            issuer: "agencyhub-identity".to_string(),
            metadata_endpoint: None,
            api_key: None,
        },
    }
}
