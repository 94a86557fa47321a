//! Return model and related types
//!
//! A return finalizes exactly one loan. Its `estado` is a fact computed from
//! the two dates it stores, while the paired loan's terminal status is the
//! operator's call; neither field is ever copied from the other.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::book::Book;
use super::enums::{BookCondition, LoanStatus, ReturnStatus};
use super::loan::Loan;
use super::user::User;
use super::wire::{DocRef, HasId};

/// Punctuality of a return: on time when the book came back by the expected
/// date, late otherwise. No expected date means nothing to be late against.
pub fn punctuality(
    actual: DateTime<Utc>,
    expected: Option<DateTime<Utc>>,
) -> ReturnStatus {
    match expected {
        Some(expected) if actual > expected => ReturnStatus::Late,
        _ => ReturnStatus::OnTime,
    }
}

/// Return document as served by `/devoluciones`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnRecord {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "prestamo")]
    pub loan: DocRef<Loan>,
    #[serde(rename = "usuario")]
    pub user: DocRef<User>,
    #[serde(rename = "libro")]
    pub book: DocRef<Book>,
    #[serde(rename = "fechaDevolucionReal")]
    pub actual_return_date: DateTime<Utc>,
    #[serde(rename = "fechaDevolucionEsperada", skip_serializing_if = "Option::is_none")]
    pub expected_return_date: Option<DateTime<Utc>>,
    #[serde(rename = "estado")]
    pub status: ReturnStatus,
    #[serde(rename = "condicionLibro", default)]
    pub condition: BookCondition,
    #[serde(rename = "multa", default)]
    pub fine: Decimal,
    #[serde(rename = "observaciones", default)]
    pub notes: String,
    #[serde(rename = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl HasId for ReturnRecord {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Operator input for recording a return against an active loan
#[derive(Debug, Clone)]
pub struct ReturnSubmission {
    pub loan_id: String,
    /// Defaults to now when unset
    pub actual_return_date: Option<DateTime<Utc>>,
    /// Terminal status the operator picked for the loan
    /// (returned or overdue)
    pub loan_outcome: LoanStatus,
    pub condition: BookCondition,
    pub fine: Option<Decimal>,
    pub notes: Option<String>,
}

/// Wire body for POST `/devoluciones`; assembled by the lifecycle manager,
/// which computes `estado` and snapshots the loan's expected date.
#[derive(Debug, Serialize)]
pub(crate) struct CreateReturnBody {
    #[serde(rename = "prestamo")]
    pub loan_id: String,
    #[serde(rename = "usuario")]
    pub user_id: String,
    #[serde(rename = "libro")]
    pub book_id: String,
    #[serde(rename = "fechaDevolucionReal")]
    pub actual_return_date: DateTime<Utc>,
    #[serde(rename = "fechaDevolucionEsperada", skip_serializing_if = "Option::is_none")]
    pub expected_return_date: Option<DateTime<Utc>>,
    #[serde(rename = "estado")]
    pub status: ReturnStatus,
    #[serde(rename = "condicionLibro")]
    pub condition: BookCondition,
    #[serde(rename = "multa")]
    pub fine: Decimal,
    #[serde(rename = "observaciones")]
    pub notes: String,
}

/// Amendment to an existing return. Touches only the return itself; a
/// changed actual date recomputes the stored punctuality.
#[derive(Debug, Clone, Default)]
pub struct UpdateReturn {
    pub actual_return_date: Option<DateTime<Utc>>,
    pub condition: Option<BookCondition>,
    pub fine: Option<Decimal>,
    pub notes: Option<String>,
}

/// Wire body for PUT `/devoluciones/{id}`
#[derive(Debug, Serialize)]
pub(crate) struct UpdateReturnBody {
    #[serde(rename = "fechaDevolucionReal", skip_serializing_if = "Option::is_none")]
    pub actual_return_date: Option<DateTime<Utc>>,
    #[serde(rename = "estado", skip_serializing_if = "Option::is_none")]
    pub status: Option<ReturnStatus>,
    #[serde(rename = "condicionLibro", skip_serializing_if = "Option::is_none")]
    pub condition: Option<BookCondition>,
    #[serde(rename = "multa", skip_serializing_if = "Option::is_none")]
    pub fine: Option<Decimal>,
    #[serde(rename = "observaciones", skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
