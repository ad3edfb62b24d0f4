//! Sign-up, sign-in and session.

use std::sync::Arc;

use async_trait::async_trait;
use fruitcart::{
    users::User,
    validation::{SignUpForm, ValidationErrors, email, required},
};
use mockall::automock;
use serde::Serialize;
use tracing::info;

use crate::{
    api::{ApiError, ApiRequest, Endpoint, Transport},
    domain::mutate,
};

/// Email and password sent to sign in.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    /// Sign-in email.
    pub email: String,

    /// Password.
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Both fields present and the email well formed.
    ///
    /// # Errors
    ///
    /// All failing checks.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        errors.check(email("email", &self.email));
        errors.check(required("password", &self.password));

        errors.into_result()
    }
}

/// [`AuthService`] over the HTTP API.
#[derive(Clone)]
pub struct HttpAuthService {
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for HttpAuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpAuthService").finish_non_exhaustive()
    }
}

impl HttpAuthService {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl AuthService for HttpAuthService {
    async fn sign_up(&self, form: SignUpForm) -> Result<String, ApiError> {
        form.validate()?;

        let request = ApiRequest::new(Endpoint::SIGN_UP).with_body(&form)?;

        mutate(self.transport.as_ref(), request, "Account created").await
    }

    async fn sign_in(&self, credentials: Credentials) -> Result<String, ApiError> {
        credentials.validate()?;

        let request = ApiRequest::new(Endpoint::SIGN_IN).with_body(&credentials)?;
        let message = mutate(self.transport.as_ref(), request, "Signed in").await?;

        info!(email = %credentials.email, "signed in");

        Ok(message)
    }

    async fn current_user(&self) -> Result<User, ApiError> {
        self.transport
            .send(ApiRequest::new(Endpoint::CURRENT_USER))
            .await?
            .into_data()
    }

    async fn sign_out(&self) -> Result<String, ApiError> {
        let message = mutate(
            self.transport.as_ref(),
            ApiRequest::new(Endpoint::LOGOUT_USER),
            "Signed out",
        )
        .await?;

        info!("signed out");

        Ok(message)
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create a customer account.
    async fn sign_up(&self, form: SignUpForm) -> Result<String, ApiError>;

    /// Start a session; the transport keeps the session cookie.
    async fn sign_in(&self, credentials: Credentials) -> Result<String, ApiError>;

    /// User the session belongs to.
    async fn current_user(&self) -> Result<User, ApiError>;

    /// End the session.
    async fn sign_out(&self) -> Result<String, ApiError>;
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use crate::{api::MockTransport, domain::test_support::envelope};

    use super::*;

    fn credentials(password: &str) -> Credentials {
        Credentials {
            email: "abebe@example.com".to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn sign_in_posts_credentials() -> TestResult {
        let mut transport = MockTransport::new();

        transport
            .expect_send()
            .once()
            .withf(|request| {
                request.endpoint == Endpoint::SIGN_IN
                    && request.body
                        == Some(json!({"email": "abebe@example.com", "password": "secret1"}))
            })
            .return_once(|_| envelope(json!({"success": true, "message": "Login successfully"})));

        let service = HttpAuthService::new(Arc::new(transport));

        assert_eq!(service.sign_in(credentials("secret1")).await?, "Login successfully");

        Ok(())
    }

    #[tokio::test]
    async fn blank_password_never_reaches_the_backend() {
        let mut transport = MockTransport::new();

        transport.expect_send().never();

        let service = HttpAuthService::new(Arc::new(transport));
        let result = service.sign_in(credentials("")).await;

        assert!(matches!(result, Err(ApiError::Invalid(_))));
    }

    #[tokio::test]
    async fn current_user_decodes_data() -> TestResult {
        let mut transport = MockTransport::new();

        transport
            .expect_send()
            .once()
            .withf(|request| request.endpoint == Endpoint::CURRENT_USER)
            .return_once(|_| {
                envelope(json!({
                    "success": true,
                    "data": {"_id": "u1", "firstName": "Abebe", "lastName": "Kebede",
                             "email": "abebe@example.com", "role": "GENERAL",
                             "createdAt": "2025-01-01T00:00:00Z"}
                }))
            });

        let service = HttpAuthService::new(Arc::new(transport));
        let user = service.current_user().await?;

        assert_eq!(user.full_name(), "Abebe Kebede");

        Ok(())
    }

    #[test]
    fn debug_hides_the_password() {
        let rendered = format!("{:?}", credentials("hunter22"));

        assert!(!rendered.contains("hunter22"));
    }
}
