use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use auth::Authenticator;
use auth::Identity;
use auth::VerificationCode;
use chrono::Duration;
use serde_json::json;
use serde_json::Value;
use storefront_service::domain::user::models::User;
use storefront_service::domain::user::service::UserService;
use storefront_service::inbound::http::router::create_router;
use storefront_service::outbound::repositories::InMemoryUserRepository;
use storefront_service::user::errors::DeliveryError;
use storefront_service::user::ports::VerificationCodeSender;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Code sender that keeps the last code per user so tests can submit it.
#[derive(Default)]
pub struct RecordingCodeSender {
    codes: Mutex<HashMap<u64, String>>,
}

impl RecordingCodeSender {
    pub fn last_code(&self, user_id: u64) -> Option<String> {
        self.codes.lock().unwrap().get(&user_id).cloned()
    }
}

#[async_trait]
impl VerificationCodeSender for RecordingCodeSender {
    async fn send_code(&self, user: &User, code: &VerificationCode) -> Result<(), DeliveryError> {
        self.codes
            .lock()
            .unwrap()
            .insert(user.id.0, code.as_str().to_string());
        Ok(())
    }
}

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub api_client: reqwest::Client,
    pub authenticator: Arc<Authenticator>,
    pub code_sender: Arc<RecordingCodeSender>,
}

/// A registered account as seen by the tests.
pub struct Account {
    pub user_id: u64,
    pub token: String,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        Self::spawn_with_code_ttl(Duration::minutes(10)).await
    }

    pub async fn spawn_with_code_ttl(code_ttl: Duration) -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let authenticator = Arc::new(Authenticator::new(TEST_SECRET).unwrap());
        let user_repository = Arc::new(InMemoryUserRepository::new());
        let code_sender = Arc::new(RecordingCodeSender::default());

        let user_service = Arc::new(
            UserService::new(
                user_repository,
                Arc::clone(&code_sender),
                Arc::clone(&authenticator),
            )
            .with_code_ttl(code_ttl),
        );

        let router = create_router(user_service, &authenticator);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            api_client: reqwest::Client::new(),
            authenticator,
            code_sender,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// Register an account and return its id and session token.
    pub async fn register(&self, email: &str, password: &str) -> Account {
        let response = self
            .post("/api/auth/register")
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let body: Value = response.json().await.expect("Failed to parse response");
        Account {
            user_id: body["data"]["user"]["id"].as_u64().unwrap(),
            token: body["data"]["token"].as_str().unwrap().to_string(),
        }
    }

    /// Register, request a code and confirm it.
    pub async fn register_verified(&self, email: &str, password: &str) -> Account {
        let account = self.register(email, password).await;

        let response = self
            .get_authenticated("/api/users/verify", &account.token)
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::ACCEPTED);

        let code = self.code_sender.last_code(account.user_id).unwrap();
        let response = self
            .post_authenticated("/api/users/verify", &account.token)
            .json(&json!({ "code": code }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        account
    }

    /// Sign a token for an arbitrary identity with the server's secret.
    pub fn token_for(&self, identity: &Identity) -> String {
        self.authenticator.issue_token(identity).unwrap().access_token
    }
}
