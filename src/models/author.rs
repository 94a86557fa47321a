//! Author model and related types

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::wire::HasId;

/// Author document as served by `/autores`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Author {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "nacionalidad", skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,
    #[serde(rename = "fechaNacimiento", skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    #[serde(rename = "sitioWeb", skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(rename = "biografia", skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(rename = "imagenUrl", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl HasId for Author {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Create author request
#[derive(Debug, Clone, Serialize, Validate)]
pub struct NewAuthor {
    #[serde(rename = "nombre")]
    #[validate(length(min = 1, message = "Author name is required"))]
    pub name: String,
    #[serde(rename = "nacionalidad", skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,
    #[serde(rename = "fechaNacimiento", skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    #[serde(rename = "sitioWeb", skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(rename = "biografia", skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(rename = "imagenUrl", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Update author request
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateAuthor {
    #[serde(rename = "nombre", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "nacionalidad", skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,
    #[serde(rename = "fechaNacimiento", skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    #[serde(rename = "sitioWeb", skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(rename = "biografia", skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(rename = "imagenUrl", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}
