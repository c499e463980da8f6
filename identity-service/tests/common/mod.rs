use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use chrono::Duration;
use identity_service::domain::account::events::ConfirmationRequestedEvent;
use identity_service::domain::account::ports::ConfirmationNotifier;
use identity_service::domain::errors::EventPublisherError;
use identity_service::domain::session::service::SessionManager;
use identity_service::domain::session::service::SessionPolicy;
use identity_service::inbound::http::router::create_router;
use identity_service::outbound::repositories::InMemoryAccountRepository;
use identity_service::outbound::repositories::InMemorySessionRepository;
use serde_json::json;
use tokio::sync::Mutex;

pub const TEST_JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Notifier that keeps every published event, or fails every publish.
#[derive(Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<ConfirmationRequestedEvent>>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub async fn events(&self) -> Vec<ConfirmationRequestedEvent> {
        self.events.lock().await.clone()
    }

    /// Wait for the background publish of `email`'s confirmation request.
    pub async fn wait_for(&self, email: &str) -> Option<ConfirmationRequestedEvent> {
        for _ in 0..100 {
            if let Some(event) = self.events().await.into_iter().find(|e| e.email == email) {
                return Some(event);
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        None
    }
}

#[async_trait]
impl ConfirmationNotifier for RecordingNotifier {
    async fn publish_confirmation_requested(
        &self,
        event: &ConfirmationRequestedEvent,
    ) -> Result<(), EventPublisherError> {
        if self.fail {
            return Err(EventPublisherError::PublishFailed(
                "broker unreachable".to_string(),
            ));
        }
        self.events.lock().await.push(event.clone());
        Ok(())
    }
}

/// Test application that spawns a real server over in-memory stores
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub accounts: Arc<InMemoryAccountRepository>,
    pub sessions: Arc<InMemorySessionRepository>,
    pub notifier: Arc<RecordingNotifier>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(RecordingNotifier::default(), Duration::minutes(15)).await
    }

    pub async fn spawn_with_failing_notifier() -> Self {
        Self::spawn_with(RecordingNotifier::failing(), Duration::minutes(15)).await
    }

    pub async fn spawn_with_access_ttl(access_token_ttl: Duration) -> Self {
        Self::spawn_with(RecordingNotifier::default(), access_token_ttl).await
    }

    /// Spawn the application in a background task and return TestApp
    async fn spawn_with(notifier: RecordingNotifier, access_token_ttl: Duration) -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let accounts = Arc::new(InMemoryAccountRepository::new());
        let sessions = Arc::new(InMemorySessionRepository::new());
        let notifier = Arc::new(notifier);

        let session_manager = Arc::new(SessionManager::new(
            Arc::clone(&accounts),
            Arc::clone(&sessions),
            Arc::clone(&notifier),
            Arc::new(Authenticator::new(TEST_JWT_SECRET, access_token_ttl)),
            SessionPolicy {
                refresh_token_ttl: Duration::days(15),
                confirmation_url_base: format!("{}/api/accounts/confirm", address),
            },
        ));

        let router = create_router(session_manager);

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            accounts,
            sessions,
            notifier,
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

    pub async fn register(&self, email: &str, password: &str) -> reqwest::Response {
        self.post("/api/accounts")
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Follow the confirmation URL the notifier received for `email`.
    pub async fn confirm(&self, email: &str) -> reqwest::Response {
        let url = self
            .notifier
            .wait_for(email)
            .await
            .map(|e| e.confirmation_url)
            .expect("No confirmation request recorded");

        self.api_client
            .get(url)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> reqwest::Response {
        self.post("/api/auth/signin")
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Register, confirm and sign in; returns the token pair payload.
    pub async fn signed_in(&self, email: &str, password: &str) -> serde_json::Value {
        self.register(email, password).await;
        self.confirm(email).await;

        let body: serde_json::Value = self
            .sign_in(email, password)
            .await
            .json()
            .await
            .expect("Failed to parse response");
        body["data"].clone()
    }
}
