//! Loan model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::book::Book;
use super::enums::LoanStatus;
use super::user::User;
use super::wire::{DocRef, HasId};

/// Loan document as served by `/prestamos`.
///
/// `fechaDevolucion` is overloaded by the backend: while the loan is active
/// it holds the expected return date, once closed it holds the actual one,
/// and it goes back to null when a return is cancelled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Loan {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "usuario")]
    pub user: DocRef<User>,
    #[serde(rename = "libro")]
    pub book: DocRef<Book>,
    #[serde(rename = "fechaPrestamo")]
    pub loan_date: DateTime<Utc>,
    #[serde(rename = "fechaDevolucion")]
    pub return_date: Option<DateTime<Utc>>,
    #[serde(rename = "estado")]
    pub status: LoanStatus,
    #[serde(rename = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Loan {
    pub fn is_active(&self) -> bool {
        self.status == LoanStatus::Active
    }

    /// Expected return date, defined only while the loan is active
    pub fn expected_return_date(&self) -> Option<DateTime<Utc>> {
        if self.is_active() {
            self.return_date
        } else {
            None
        }
    }
}

impl HasId for Loan {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Checkout request. Carries no status: every loan starts active, and the
/// lifecycle manager owns all later status changes.
#[derive(Debug, Clone)]
pub struct NewLoan {
    pub user_id: String,
    pub book_id: String,
    /// Defaults to now when unset
    pub loan_date: Option<DateTime<Utc>>,
    pub expected_return_date: Option<DateTime<Utc>>,
}

/// Wire body for POST `/prestamos`; built from [`NewLoan`] by the gateway.
#[derive(Debug, Serialize)]
pub(crate) struct CreateLoanBody {
    #[serde(rename = "usuario")]
    pub user_id: String,
    #[serde(rename = "libro")]
    pub book_id: String,
    #[serde(rename = "fechaPrestamo")]
    pub loan_date: DateTime<Utc>,
    #[serde(rename = "fechaDevolucion", skip_serializing_if = "Option::is_none")]
    pub expected_return_date: Option<DateTime<Utc>>,
    #[serde(rename = "estado")]
    pub status: LoanStatus,
}

/// Update loan request (reschedule or reassign). Deliberately has no status
/// field; see [`NewLoan`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateLoan {
    #[serde(rename = "usuario", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(rename = "libro", skip_serializing_if = "Option::is_none")]
    pub book_id: Option<String>,
    #[serde(rename = "fechaPrestamo", skip_serializing_if = "Option::is_none")]
    pub loan_date: Option<DateTime<Utc>>,
    #[serde(rename = "fechaDevolucion", skip_serializing_if = "Option::is_none")]
    pub expected_return_date: Option<DateTime<Utc>>,
}

/// Status transition applied by the lifecycle manager. `return_date: None`
/// serializes as an explicit null so a revert clears the stored date.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct LoanTransition {
    #[serde(rename = "estado")]
    pub status: LoanStatus,
    #[serde(rename = "fechaDevolucion")]
    pub return_date: Option<DateTime<Utc>>,
}

/// A loan-side mutation that could not be applied after its paired return
/// mutation succeeded. Queued durably and replayed until the backend
/// accepts it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanRepair {
    pub loan_id: String,
    pub status: LoanStatus,
    pub return_date: Option<DateTime<Utc>>,
    pub queued_at: DateTime<Utc>,
}
