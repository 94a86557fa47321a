//! Authentication service: credential verification and registration

use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::gateway::users::UsersGateway;
use crate::models::user::{Credentials, NewUser, User};

use super::session::SessionService;

/// Fixed operator credential pair, honored before any network traffic so an
/// administrator can always get in, backend up or down.
const BOOTSTRAP_EMAIL: &str = "admin@biblioteca.com";
const BOOTSTRAP_PASSWORD: &str = "admin123";

#[derive(Clone)]
pub struct AuthService {
    users: UsersGateway,
    session: SessionService,
}

impl AuthService {
    pub fn new(users: UsersGateway, session: SessionService) -> Self {
        Self { users, session }
    }

    /// Verify credentials and activate the resulting identity.
    ///
    /// The chain: bootstrap pair first (no remote call), then the backend,
    /// then the local registry when the backend is unreachable. A rejection
    /// from the backend is final; the registry is consulted only on
    /// transport failure. Exhausting the chain yields `InvalidCredentials`.
    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<User> {
        let user = self.verify(email, password).await?;
        self.session.login(user.clone()).await?;
        Ok(user)
    }

    async fn verify(&self, email: &str, password: &str) -> AppResult<User> {
        if email == BOOTSTRAP_EMAIL && password == BOOTSTRAP_PASSWORD {
            tracing::info!("Bootstrap operator login");
            return Ok(User::bootstrap_admin());
        }

        let credentials = Credentials {
            email: email.to_string(),
            password: password.to_string(),
        };
        match self.users.login(&credentials).await {
            Ok(user) => {
                tracing::info!("Authenticated {} against backend", user.email);
                Ok(user)
            }
            Err(AppError::RequestFailed { status, message }) => {
                tracing::info!("Login rejected by backend ({}): {}", status, message);
                Err(AppError::InvalidCredentials)
            }
            Err(e) if e.is_transport() => {
                tracing::warn!("Backend unreachable during login, trying local registry: {}", e);
                match self.users.verify_local(email, password)? {
                    Some(user) => {
                        tracing::info!("Authenticated {} against local registry", user.email);
                        Ok(user)
                    }
                    None => Err(AppError::InvalidCredentials),
                }
            }
            Err(e) => Err(e),
        }
    }

    /// Create an account. With the backend unreachable the usuarios gateway
    /// stores it in the local registry, where `authenticate` can find it
    /// later. Registration does not log the new account in.
    pub async fn register(&self, payload: NewUser) -> AppResult<User> {
        payload
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.users.create(&payload).await
    }
}
