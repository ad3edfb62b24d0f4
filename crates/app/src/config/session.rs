//! Session Config

use clap::Args;

use crate::domain::auth::Credentials;

/// Sign-in credentials.
#[derive(Args)]
pub struct SessionConfig {
    /// Email to sign in with
    #[arg(long, env = "FRUITCART_EMAIL")]
    pub email: Option<String>,

    /// Password to sign in with
    #[arg(long, env = "FRUITCART_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

impl std::fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConfig")
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl SessionConfig {
    /// Credentials, when both halves are configured.
    #[must_use]
    pub fn credentials(&self) -> Option<Credentials> {
        Some(Credentials {
            email: self.email.clone()?,
            password: self.password.clone()?,
        })
    }
}
