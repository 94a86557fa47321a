//! Reports gateway for `/reportes`
//!
//! Statistics payloads are rendered by the backend and treated as opaque
//! JSON here; document downloads are raw bytes for the caller to write out.

use serde_json::Value;

use crate::error::AppResult;

use super::http::ApiClient;

#[derive(Clone)]
pub struct ReportsGateway {
    api: ApiClient,
}

impl ReportsGateway {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn general_statistics(&self) -> AppResult<Value> {
        self.api.get_json("/reportes/estadisticas-generales", &[]).await
    }

    pub async fn loans_by_month(&self, year: i32) -> AppResult<Value> {
        self.api
            .get_json(
                "/reportes/prestamos-por-mes",
                &[("year".to_string(), year.to_string())],
            )
            .await
    }

    pub async fn users_by_role(&self) -> AppResult<Value> {
        self.api.get_json("/reportes/usuarios-por-rol", &[]).await
    }

    pub async fn books_by_genre(&self) -> AppResult<Value> {
        self.api.get_json("/reportes/libros-por-genero", &[]).await
    }

    pub async fn overdue_loans(&self) -> AppResult<Value> {
        self.api.get_json("/reportes/prestamos-vencidos", &[]).await
    }

    pub async fn admin_dashboard(&self) -> AppResult<Value> {
        self.api.get_json("/reportes/dashboard-admin", &[]).await
    }

    /// Download the PDF rendition of a report collection
    /// (usuarios, libros, prestamos, ...).
    pub async fn download_pdf(&self, collection: &str) -> AppResult<Vec<u8>> {
        self.api.get_bytes(&format!("/reportes/{}/pdf", collection)).await
    }

    /// Download the Excel rendition of a report collection.
    pub async fn download_excel(&self, collection: &str) -> AppResult<Vec<u8>> {
        self.api
            .get_bytes(&format!("/reportes/{}/excel", collection))
            .await
    }
}
