//! Authors gateway for `/autores`

use crate::error::AppResult;
use crate::models::author::{Author, NewAuthor, UpdateAuthor};
use crate::models::wire::ListEnvelope;

use super::http::ApiClient;

#[derive(Clone)]
pub struct AuthorsGateway {
    api: ApiClient,
}

impl AuthorsGateway {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self, query: &[(String, String)]) -> AppResult<Vec<Author>> {
        let envelope: ListEnvelope = self.api.get_json("/autores", query).await?;
        Ok(envelope.into_items("autores"))
    }

    pub async fn get(&self, id: &str) -> AppResult<Author> {
        self.api.get_json(&format!("/autores/{}", id), &[]).await
    }

    pub async fn create(&self, payload: &NewAuthor) -> AppResult<Author> {
        self.api.post_json("/autores", payload).await
    }

    pub async fn update(&self, id: &str, payload: &UpdateAuthor) -> AppResult<Author> {
        self.api.put_json(&format!("/autores/{}", id), payload).await
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.api.delete(&format!("/autores/{}", id)).await
    }
}
