//! Session service: durable identity store and authorization predicate
//!
//! Holds the active identity behind a shared lock and mirrors it to the
//! local store so a new process resumes where the last one stopped. The
//! role predicates the rest of the app gates on read the same slot. Every
//! clone shares the same live session.

use std::sync::Arc;

use tokio::sync::RwLock;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::gateway::users::UsersGateway;
use crate::models::enums::Role;
use crate::models::user::{UpdateProfile, User};
use crate::storage::LocalStore;

const SESSION_KEY: &str = "session";

#[derive(Clone)]
pub struct SessionService {
    store: LocalStore,
    users: UsersGateway,
    current: Arc<RwLock<Option<User>>>,
}

impl SessionService {
    pub fn new(store: LocalStore, users: UsersGateway) -> Self {
        Self {
            store,
            users,
            current: Arc::new(RwLock::new(None)),
        }
    }

    /// Restore the persisted identity at process start. With nothing usable
    /// on disk the bootstrap operator account is materialized and persisted
    /// instead, so the app always has an administrative way in. Unreadable
    /// session data is discarded, not fatal: this never fails.
    pub async fn initialize(&self) -> Option<User> {
        let persisted: Option<User> = match self.store.load(SESSION_KEY) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!("Discarding unreadable session data: {}", e);
                let _ = self.store.remove(SESSION_KEY);
                None
            }
        };

        let user = match persisted {
            Some(user) => {
                tracing::debug!("Resuming session for {}", user.email);
                user
            }
            None => {
                let bootstrap = User::bootstrap_admin();
                if let Err(e) = self.store.save(SESSION_KEY, &bootstrap) {
                    tracing::warn!("Could not persist bootstrap identity: {}", e);
                }
                bootstrap
            }
        };

        *self.current.write().await = Some(user.clone());
        Some(user)
    }

    /// Persist and activate an identity. A malformed identity (blank id or
    /// email) is rejected as a logged no-op rather than an error.
    pub async fn login(&self, user: User) -> AppResult<()> {
        if user.id.trim().is_empty() || user.email.trim().is_empty() {
            tracing::warn!("Ignoring login with malformed identity");
            return Ok(());
        }
        self.store.save(SESSION_KEY, &user)?;
        *self.current.write().await = Some(user);
        Ok(())
    }

    /// Clear the active identity and its persisted copy.
    pub async fn logout(&self) -> AppResult<()> {
        self.store.remove(SESSION_KEY)?;
        *self.current.write().await = None;
        Ok(())
    }

    /// Push profile changes to the backend, then swap the local copy to the
    /// remote result. On failure nothing local changes.
    pub async fn update_profile(&self, changes: UpdateProfile) -> AppResult<User> {
        let current = self
            .current()
            .await
            .ok_or(AppError::NotAuthenticated)?;

        changes
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let updated = self.users.update(&current.id, &changes.into()).await?;
        self.store.save(SESSION_KEY, &updated)?;
        *self.current.write().await = Some(updated.clone());
        Ok(updated)
    }

    pub async fn current(&self) -> Option<User> {
        self.current.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.current.read().await.is_some()
    }

    /// True iff the live session identity is an admin; false with no
    /// session. Reads the lock on every call so a login or logout is
    /// reflected immediately.
    pub async fn is_admin(&self) -> bool {
        self.current
            .read()
            .await
            .as_ref()
            .map(User::is_admin)
            .unwrap_or(false)
    }

    /// True iff the live session identity carries `role`; false with no
    /// session.
    pub async fn has_role(&self, role: Role) -> bool {
        self.current
            .read()
            .await
            .as_ref()
            .map(|u| u.has_role(role))
            .unwrap_or(false)
    }
}
