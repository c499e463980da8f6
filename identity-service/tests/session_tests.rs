mod common;

use std::sync::Arc;

use auth::Authenticator;
use chrono::Duration;
use common::RecordingNotifier;
use common::TEST_JWT_SECRET;
use identity_service::domain::account::models::EmailAddress;
use identity_service::domain::account::models::Password;
use identity_service::domain::account::models::RegisterAccountCommand;
use identity_service::domain::session::models::Credentials;
use identity_service::domain::session::ports::SessionManagerPort;
use identity_service::domain::session::service::SessionManager;
use identity_service::domain::session::service::SessionPolicy;
use identity_service::outbound::repositories::InMemoryAccountRepository;
use identity_service::outbound::repositories::InMemorySessionRepository;

fn credentials() -> Credentials {
    Credentials::new(
        EmailAddress::new("a@x.com".to_string()).unwrap(),
        Password::new("pw1".to_string()).unwrap(),
    )
}

#[tokio::test]
async fn test_second_sign_in_stays_in_the_same_session() {
    let authenticator = Arc::new(Authenticator::new(TEST_JWT_SECRET, Duration::minutes(15)));
    let sessions = Arc::new(InMemorySessionRepository::new());
    let manager = SessionManager::new(
        Arc::new(InMemoryAccountRepository::new()),
        Arc::clone(&sessions),
        Arc::new(RecordingNotifier::default()),
        Arc::clone(&authenticator),
        SessionPolicy {
            refresh_token_ttl: Duration::days(15),
            confirmation_url_base: "http://localhost:3000/api/accounts/confirm".to_string(),
        },
    );

    let Credentials { email, password } = credentials();
    manager
        .register(RegisterAccountCommand::new(email.clone(), password))
        .await
        .unwrap();
    manager.confirm_account(&email).await.unwrap();

    let first = manager.authenticate(credentials()).await.unwrap();
    let second = manager.authenticate(credentials()).await.unwrap();

    let first_claims = authenticator.validate_token(&first.access_token).unwrap();
    let second_claims = authenticator.validate_token(&second.access_token).unwrap();

    assert_eq!(first_claims.session, second_claims.session);
    assert_eq!(first.session.id, second.session.id);
    assert_eq!(first_claims.session, first.session.id.to_string());
    assert_ne!(first.refresh_token, second.refresh_token);
    assert_eq!(sessions.count().await, 1);
}
