//! Returns gateway for `/devoluciones`
//!
//! Mutations on this resource are crate-private: a return never changes
//! alone, so creation, amendment, and deletion all go through the lifecycle
//! manager that owns the paired loan update.

use crate::error::AppResult;
use crate::models::returns::{CreateReturnBody, ReturnRecord, UpdateReturnBody};
use crate::models::wire::ListEnvelope;

use super::http::ApiClient;

#[derive(Clone)]
pub struct ReturnsGateway {
    api: ApiClient,
}

impl ReturnsGateway {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self, query: &[(String, String)]) -> AppResult<Vec<ReturnRecord>> {
        let envelope: ListEnvelope = self.api.get_json("/devoluciones", query).await?;
        Ok(envelope.into_items("devoluciones"))
    }

    pub async fn get(&self, id: &str) -> AppResult<ReturnRecord> {
        self.api.get_json(&format!("/devoluciones/{}", id), &[]).await
    }

    pub(crate) async fn create(&self, payload: &CreateReturnBody) -> AppResult<ReturnRecord> {
        self.api.post_json("/devoluciones", payload).await
    }

    pub(crate) async fn update(
        &self,
        id: &str,
        payload: &UpdateReturnBody,
    ) -> AppResult<ReturnRecord> {
        self.api
            .put_json(&format!("/devoluciones/{}", id), payload)
            .await
    }

    pub(crate) async fn delete(&self, id: &str) -> AppResult<()> {
        self.api.delete(&format!("/devoluciones/{}", id)).await
    }
}
