use std::time::Duration;

use async_trait::async_trait;
use homebase_core::user::default_users;
use homebase_core::User;
use tracing::debug;

use crate::ServiceError;

/// Simulated round-trip of a sign-in request.
pub const DEFAULT_LOGIN_DELAY: Duration = Duration::from_millis(500);

/// Resolves an email/password pair to an identity.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, email: &str, password: &str) -> Result<User, ServiceError>;
}

#[derive(Debug, Clone)]
pub struct Credential {
    pub email: String,
    pub password: String,
    pub user: User,
}

/// Placeholder authenticator comparing against a fixed allow-list.
#[derive(Debug, Clone)]
pub struct StaticAuthenticator {
    credentials: Vec<Credential>,
    delay: Duration,
}

impl StaticAuthenticator {
    pub fn new(credentials: Vec<Credential>) -> Self {
        Self {
            credentials,
            delay: DEFAULT_LOGIN_DELAY,
        }
    }

    /// The two seeded accounts with their demo passwords.
    pub fn with_defaults() -> Self {
        let credentials = default_users()
            .into_iter()
            .map(|user| Credential {
                email: user.email.clone(),
                password: if user.is_admin() { "adminpass" } else { "userpass" }.to_string(),
                user,
            })
            .collect();
        Self::new(credentials)
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl Default for StaticAuthenticator {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[async_trait]
impl Authenticator for StaticAuthenticator {
    async fn authenticate(&self, email: &str, password: &str) -> Result<User, ServiceError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let found = self
            .credentials
            .iter()
            .find(|c| c.email == email && c.password == password);
        match found {
            Some(c) => Ok(c.user.clone()),
            None => {
                debug!("rejected sign-in for {email}");
                Err(ServiceError::InvalidCredentials)
            }
        }
    }
}
