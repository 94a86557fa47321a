//! Users gateway for `/usuarios`, with the offline degrade path.
//!
//! Users are the one resource allowed to fall back to durable local data:
//! when the backend cannot be reached, reads and writes are served from a
//! registry of self-registered accounts kept in the local store. An HTTP
//! error response is an answer from the backend and never degrades; only
//! transport failures do.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::user::{Credentials, LoginResponse, NewUser, StoredUser, UpdateUser, User};
use crate::models::wire::ListEnvelope;
use crate::storage::LocalStore;

use super::http::ApiClient;

const LOCAL_USERS_KEY: &str = "local_users";

#[derive(Clone)]
pub struct UsersGateway {
    api: ApiClient,
    registry: LocalUserRegistry,
}

impl UsersGateway {
    pub fn new(api: ApiClient, store: LocalStore) -> Self {
        Self {
            api,
            registry: LocalUserRegistry::new(store),
        }
    }

    pub async fn list(&self, query: &[(String, String)]) -> AppResult<Vec<User>> {
        match self.api.get_json::<ListEnvelope>("/usuarios", query).await {
            Ok(envelope) => Ok(envelope.into_items("usuarios")),
            Err(e) if e.is_transport() => {
                tracing::warn!("usuarios unreachable, listing local registry: {}", e);
                self.registry.list()
            }
            Err(e) => Err(e),
        }
    }

    pub async fn get(&self, id: &str) -> AppResult<User> {
        match self.api.get_json(&format!("/usuarios/{}", id), &[]).await {
            Ok(user) => Ok(user),
            Err(e) if e.is_transport() => {
                tracing::warn!("usuarios unreachable, reading local registry: {}", e);
                self.registry.get(id)
            }
            Err(e) => Err(e),
        }
    }

    /// Create an account. Offline, the account lands in the local registry
    /// with a generated id and an argon2-hashed password, and can be used to
    /// authenticate later from this same machine.
    pub async fn create(&self, payload: &NewUser) -> AppResult<User> {
        match self.api.post_json("/usuarios", payload).await {
            Ok(user) => Ok(user),
            Err(e) if e.is_transport() => {
                tracing::warn!("usuarios unreachable, registering locally: {}", e);
                self.registry.insert(payload)
            }
            Err(e) => Err(e),
        }
    }

    pub async fn update(&self, id: &str, payload: &UpdateUser) -> AppResult<User> {
        match self.api.put_json(&format!("/usuarios/{}", id), payload).await {
            Ok(user) => Ok(user),
            Err(e) if e.is_transport() => {
                tracing::warn!("usuarios unreachable, updating local registry: {}", e);
                self.registry.update(id, payload)
            }
            Err(e) => Err(e),
        }
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        match self.api.delete(&format!("/usuarios/{}", id)).await {
            Ok(()) => Ok(()),
            Err(e) if e.is_transport() => {
                tracing::warn!("usuarios unreachable, deleting from local registry: {}", e);
                self.registry.remove(id)
            }
            Err(e) => Err(e),
        }
    }

    /// POST `/usuarios/login`. No fallback here: the credential chain that
    /// consults the local registry lives in the auth service.
    pub async fn login(&self, credentials: &Credentials) -> AppResult<User> {
        let response: LoginResponse = self.api.post_json("/usuarios/login", credentials).await?;
        Ok(response.user)
    }

    /// Check credentials against the local registry. `Ok(None)` means no
    /// matching account or a wrong password; hard storage failures surface.
    pub fn verify_local(&self, email: &str, password: &str) -> AppResult<Option<User>> {
        self.registry.verify(email, password)
    }
}

/// Durable registry of accounts created while the backend was unreachable.
/// Passwords are stored only as argon2 hashes.
#[derive(Clone)]
struct LocalUserRegistry {
    store: LocalStore,
}

impl LocalUserRegistry {
    fn new(store: LocalStore) -> Self {
        Self { store }
    }

    fn load_all(&self) -> AppResult<Vec<StoredUser>> {
        Ok(self.store.load(LOCAL_USERS_KEY)?.unwrap_or_default())
    }

    fn save_all(&self, users: &[StoredUser]) -> AppResult<()> {
        self.store.save(LOCAL_USERS_KEY, &users)
    }

    fn list(&self) -> AppResult<Vec<User>> {
        Ok(self.load_all()?.into_iter().map(|s| s.user).collect())
    }

    fn get(&self, id: &str) -> AppResult<User> {
        self.load_all()?
            .into_iter()
            .map(|s| s.user)
            .find(|u| u.id == id)
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))
    }

    fn insert(&self, payload: &NewUser) -> AppResult<User> {
        let mut users = self.load_all()?;
        if users
            .iter()
            .any(|s| s.user.email.eq_ignore_ascii_case(&payload.email))
        {
            return Err(AppError::Conflict(format!(
                "An account with email {} already exists",
                payload.email
            )));
        }

        let user = User {
            id: format!("user_{}", Uuid::new_v4()),
            first_name: payload.first_name.clone(),
            last_name: payload.last_name.clone(),
            email: payload.email.clone(),
            phone: payload.phone.clone(),
            address: payload.address.clone(),
            gender: payload.gender.clone(),
            document_kind: payload.document_kind.clone(),
            document_number: payload.document_number.clone(),
            role: payload.role,
            created_at: Some(Utc::now()),
        };
        users.push(StoredUser {
            user: user.clone(),
            password_hash: hash_password(&payload.password)?,
        });
        self.save_all(&users)?;
        Ok(user)
    }

    fn update(&self, id: &str, payload: &UpdateUser) -> AppResult<User> {
        let mut users = self.load_all()?;
        let stored = users
            .iter_mut()
            .find(|s| s.user.id == id)
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))?;

        let user = &mut stored.user;
        if let Some(first_name) = &payload.first_name {
            user.first_name = first_name.clone();
        }
        if let Some(last_name) = &payload.last_name {
            user.last_name = Some(last_name.clone());
        }
        if let Some(email) = &payload.email {
            user.email = email.clone();
        }
        if let Some(phone) = &payload.phone {
            user.phone = Some(phone.clone());
        }
        if let Some(address) = &payload.address {
            user.address = Some(address.clone());
        }
        if let Some(gender) = &payload.gender {
            user.gender = Some(gender.clone());
        }
        if let Some(document_kind) = &payload.document_kind {
            user.document_kind = Some(document_kind.clone());
        }
        if let Some(document_number) = &payload.document_number {
            user.document_number = Some(document_number.clone());
        }
        if let Some(role) = payload.role {
            user.role = role;
        }

        let updated = user.clone();
        self.save_all(&users)?;
        Ok(updated)
    }

    fn remove(&self, id: &str) -> AppResult<()> {
        let mut users = self.load_all()?;
        let before = users.len();
        users.retain(|s| s.user.id != id);
        if users.len() == before {
            return Err(AppError::NotFound(format!("User {} not found", id)));
        }
        self.save_all(&users)
    }

    fn verify(&self, email: &str, password: &str) -> AppResult<Option<User>> {
        let users = self.load_all()?;
        let Some(stored) = users
            .iter()
            .find(|s| s.user.email.eq_ignore_ascii_case(email))
        else {
            return Ok(None);
        };

        let parsed_hash = PasswordHash::new(&stored.password_hash)
            .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
        if Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
        {
            Ok(Some(stored.user.clone()))
        } else {
            Ok(None)
        }
    }
}

/// Hash a password using Argon2
fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enums::Role;

    fn registry() -> (tempfile::TempDir, LocalUserRegistry) {
        let dir = tempfile::tempdir().unwrap();
        let registry = LocalUserRegistry::new(LocalStore::new(dir.path()));
        (dir, registry)
    }

    fn new_user(email: &str) -> NewUser {
        NewUser {
            first_name: "Ana".to_string(),
            last_name: Some("Reyes".to_string()),
            email: email.to_string(),
            password: "secret1".to_string(),
            phone: None,
            address: None,
            gender: None,
            document_kind: None,
            document_number: None,
            role: Role::User,
        }
    }

    #[test]
    fn test_insert_then_verify_round_trips() {
        let (_dir, registry) = registry();
        let created = registry.insert(&new_user("ana@example.com")).unwrap();

        let verified = registry.verify("ana@example.com", "secret1").unwrap();
        assert_eq!(verified.map(|u| u.id), Some(created.id));

        let wrong = registry.verify("ana@example.com", "nope").unwrap();
        assert!(wrong.is_none());
    }

    #[test]
    fn test_passwords_are_stored_hashed() {
        let (_dir, registry) = registry();
        registry.insert(&new_user("ana@example.com")).unwrap();

        let stored = registry.load_all().unwrap();
        assert_eq!(stored.len(), 1);
        assert!(stored[0].password_hash.starts_with("$argon2"));
        assert!(!stored[0].password_hash.contains("secret1"));
    }

    #[test]
    fn test_duplicate_email_is_a_conflict() {
        let (_dir, registry) = registry();
        registry.insert(&new_user("ana@example.com")).unwrap();
        let err = registry.insert(&new_user("ANA@example.com")).unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn test_update_missing_user_is_not_found() {
        let (_dir, registry) = registry();
        let err = registry
            .update("user_missing", &UpdateUser::default())
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
