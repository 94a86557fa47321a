//! Loans gateway for `/prestamos`

use chrono::Utc;

use crate::error::AppResult;
use crate::models::enums::LoanStatus;
use crate::models::loan::{CreateLoanBody, Loan, LoanTransition, NewLoan, UpdateLoan};
use crate::models::wire::ListEnvelope;

use super::http::ApiClient;

#[derive(Clone)]
pub struct LoansGateway {
    api: ApiClient,
}

impl LoansGateway {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self, query: &[(String, String)]) -> AppResult<Vec<Loan>> {
        let envelope: ListEnvelope = self.api.get_json("/prestamos", query).await?;
        Ok(envelope.into_items("prestamos"))
    }

    pub async fn get(&self, id: &str) -> AppResult<Loan> {
        self.api.get_json(&format!("/prestamos/{}", id), &[]).await
    }

    /// Open a loan. Status is always active at creation; see `transition`
    /// for everything after that.
    pub async fn create(&self, payload: &NewLoan) -> AppResult<Loan> {
        let body = CreateLoanBody {
            user_id: payload.user_id.clone(),
            book_id: payload.book_id.clone(),
            loan_date: payload.loan_date.unwrap_or_else(Utc::now),
            expected_return_date: payload.expected_return_date,
            status: LoanStatus::Active,
        };
        self.api.post_json("/prestamos", &body).await
    }

    /// Reschedule or reassign a loan. The payload cannot carry a status.
    pub async fn update(&self, id: &str, payload: &UpdateLoan) -> AppResult<Loan> {
        self.api.put_json(&format!("/prestamos/{}", id), payload).await
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.api.delete(&format!("/prestamos/{}", id)).await
    }

    /// Rewrite a loan's status and stored return date. Reserved for the
    /// lifecycle manager, which keeps the loan and its return record in step.
    pub(crate) async fn transition(&self, id: &str, transition: &LoanTransition) -> AppResult<Loan> {
        self.api
            .put_json(&format!("/prestamos/{}", id), transition)
            .await
    }
}
