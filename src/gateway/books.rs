//! Books gateway for `/libros`

use crate::error::AppResult;
use crate::models::book::{Book, NewBook, UpdateBook};
use crate::models::wire::ListEnvelope;

use super::http::ApiClient;

#[derive(Clone)]
pub struct BooksGateway {
    api: ApiClient,
}

impl BooksGateway {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self, query: &[(String, String)]) -> AppResult<Vec<Book>> {
        let envelope: ListEnvelope = self.api.get_json("/libros", query).await?;
        Ok(envelope.into_items("libros"))
    }

    /// Books with at least one copy on the shelf
    pub async fn available(&self) -> AppResult<Vec<Book>> {
        let envelope: ListEnvelope = self.api.get_json("/libros/disponibles", &[]).await?;
        Ok(envelope.into_items("libros"))
    }

    pub async fn get(&self, id: &str) -> AppResult<Book> {
        self.api.get_json(&format!("/libros/{}", id), &[]).await
    }

    pub async fn create(&self, payload: &NewBook) -> AppResult<Book> {
        self.api.post_json("/libros", payload).await
    }

    pub async fn update(&self, id: &str, payload: &UpdateBook) -> AppResult<Book> {
        self.api.put_json(&format!("/libros/{}", id), payload).await
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.api.delete(&format!("/libros/{}", id)).await
    }
}
