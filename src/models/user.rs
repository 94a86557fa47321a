//! User model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::enums::Role;
use super::wire::HasId;

/// User document as served by `/usuarios`. Passwords never travel on this
/// type; credential-bearing payloads are separate structs below.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "nombre")]
    pub first_name: String,
    #[serde(rename = "apellido", skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(rename = "correo")]
    pub email: String,
    #[serde(rename = "telefono", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "direccion", skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(rename = "genero", skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(rename = "tipoIdentificacion", skip_serializing_if = "Option::is_none")]
    pub document_kind: Option<String>,
    #[serde(rename = "numeroIdentificacion", skip_serializing_if = "Option::is_none")]
    pub document_number: Option<String>,
    #[serde(rename = "rol", default)]
    pub role: Role,
    #[serde(rename = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    /// The hardcoded operator account, usable even with the backend down.
    pub fn bootstrap_admin() -> Self {
        Self {
            id: "admin-default-123".to_string(),
            first_name: "Administrador".to_string(),
            last_name: None,
            email: "admin@biblioteca.com".to_string(),
            phone: None,
            address: None,
            gender: None,
            document_kind: None,
            document_number: None,
            role: Role::Admin,
            created_at: Some(Utc::now()),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.role == role
    }

    /// "nombre apellido", or just "nombre" when no last name is on file
    pub fn display_name(&self) -> String {
        match &self.last_name {
            Some(last) => format!("{} {}", self.first_name, last),
            None => self.first_name.clone(),
        }
    }
}

impl HasId for User {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Login request body for POST `/usuarios/login`
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    #[serde(rename = "correo")]
    pub email: String,
    #[serde(rename = "contrasena")]
    pub password: String,
}

/// Login response envelope: `{ "usuario": { ... } }`
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    #[serde(rename = "usuario")]
    pub user: User,
}

/// Create user request (registration and admin-side creation)
#[derive(Debug, Clone, Serialize, Validate)]
pub struct NewUser {
    #[serde(rename = "nombre")]
    #[validate(length(min = 1, message = "Name is required"))]
    pub first_name: String,
    #[serde(rename = "apellido", skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(rename = "correo")]
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[serde(rename = "contrasena")]
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[serde(rename = "telefono", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "direccion", skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(rename = "genero", skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(rename = "tipoIdentificacion", skip_serializing_if = "Option::is_none")]
    pub document_kind: Option<String>,
    #[serde(rename = "numeroIdentificacion", skip_serializing_if = "Option::is_none")]
    pub document_number: Option<String>,
    #[serde(rename = "rol")]
    pub role: Role,
}

/// Update user request (admin-side edit; every field optional)
#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct UpdateUser {
    #[serde(rename = "nombre", skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(rename = "apellido", skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(rename = "correo", skip_serializing_if = "Option::is_none")]
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[serde(rename = "telefono", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "direccion", skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(rename = "genero", skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(rename = "tipoIdentificacion", skip_serializing_if = "Option::is_none")]
    pub document_kind: Option<String>,
    #[serde(rename = "numeroIdentificacion", skip_serializing_if = "Option::is_none")]
    pub document_number: Option<String>,
    #[serde(rename = "rol", skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

/// Update own profile request (for the authenticated user)
#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct UpdateProfile {
    #[serde(rename = "nombre", skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(rename = "apellido", skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(rename = "correo", skip_serializing_if = "Option::is_none")]
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[serde(rename = "telefono", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "direccion", skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(rename = "genero", skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
}

impl From<UpdateProfile> for UpdateUser {
    fn from(profile: UpdateProfile) -> Self {
        UpdateUser {
            first_name: profile.first_name,
            last_name: profile.last_name,
            email: profile.email,
            phone: profile.phone,
            address: profile.address,
            gender: profile.gender,
            ..UpdateUser::default()
        }
    }
}

/// A self-registered account in the durable offline registry. The password
/// is kept only as an argon2 hash; this record never leaves the local store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredUser {
    pub user: User,
    pub password_hash: String,
}
