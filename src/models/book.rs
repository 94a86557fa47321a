//! Book model and related types

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::author::Author;
use super::wire::{DocRef, HasId};

fn default_copies() -> i32 {
    1
}

/// Book document as served by `/libros`. `autor` may come back populated or
/// as a bare id depending on the endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "autor")]
    pub author: DocRef<Author>,
    #[serde(rename = "genero", skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(rename = "anioPublicacion", skip_serializing_if = "Option::is_none")]
    pub publication_year: Option<i32>,
    #[serde(rename = "isbn", skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(rename = "imagenUrl", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(rename = "idiomaOriginal", skip_serializing_if = "Option::is_none")]
    pub original_language: Option<String>,
    #[serde(rename = "existencias", default = "default_copies")]
    pub copies: i32,
}

impl Book {
    pub fn is_available(&self) -> bool {
        self.copies > 0
    }

    /// Author display name, or the bare reference id if unpopulated
    pub fn author_name(&self) -> &str {
        match self.author.as_doc() {
            Some(author) => &author.name,
            None => self.author.id(),
        }
    }
}

impl HasId for Book {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Create book request
#[derive(Debug, Clone, Serialize, Validate)]
pub struct NewBook {
    #[serde(rename = "titulo")]
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    /// Author document id
    #[serde(rename = "autor")]
    #[validate(length(min = 1, message = "Author is required"))]
    pub author_id: String,
    #[serde(rename = "genero", skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(rename = "anioPublicacion", skip_serializing_if = "Option::is_none")]
    pub publication_year: Option<i32>,
    #[serde(rename = "isbn", skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(rename = "imagenUrl", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(rename = "idiomaOriginal", skip_serializing_if = "Option::is_none")]
    pub original_language: Option<String>,
    #[serde(rename = "existencias")]
    pub copies: i32,
}

/// Update book request
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateBook {
    #[serde(rename = "titulo", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "autor", skip_serializing_if = "Option::is_none")]
    pub author_id: Option<String>,
    #[serde(rename = "genero", skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(rename = "anioPublicacion", skip_serializing_if = "Option::is_none")]
    pub publication_year: Option<i32>,
    #[serde(rename = "isbn", skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(rename = "imagenUrl", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(rename = "idiomaOriginal", skip_serializing_if = "Option::is_none")]
    pub original_language: Option<String>,
    #[serde(rename = "existencias", skip_serializing_if = "Option::is_none")]
    pub copies: Option<i32>,
}
