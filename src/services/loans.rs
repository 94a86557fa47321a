//! Loan lifecycle service
//!
//! Owns the loan state machine: a loan opens active at checkout and closes
//! as returned or overdue when a return is recorded; cancelling that return
//! makes it active again. Every closing or reopening touches two documents,
//! so the pair is mutated in two phases. A failing loan-side write gets one
//! retry and then a compensating delete where one is possible; when neither
//! works it lands in a durable repair queue and is replayed later.

use chrono::Utc;

use crate::error::{AppError, AppResult};
use crate::gateway::loans::LoansGateway;
use crate::gateway::returns::ReturnsGateway;
use crate::models::enums::LoanStatus;
use crate::models::loan::{Loan, LoanRepair, LoanTransition, NewLoan};
use crate::models::returns::{
    punctuality, CreateReturnBody, ReturnRecord, ReturnSubmission, UpdateReturn, UpdateReturnBody,
};
use crate::storage::LocalStore;

const REPAIR_QUEUE_KEY: &str = "loan_repairs";

#[derive(Clone)]
pub struct LoanService {
    loans: LoansGateway,
    returns: ReturnsGateway,
    store: LocalStore,
}

impl LoanService {
    pub fn new(loans: LoansGateway, returns: ReturnsGateway, store: LocalStore) -> Self {
        Self {
            loans,
            returns,
            store,
        }
    }

    /// Open a loan. Borrower and book references must be non-empty; the
    /// loan date defaults to now.
    pub async fn checkout(&self, payload: NewLoan) -> AppResult<Loan> {
        if payload.user_id.trim().is_empty() {
            return Err(AppError::Validation("Borrower is required".to_string()));
        }
        if payload.book_id.trim().is_empty() {
            return Err(AppError::Validation("Book is required".to_string()));
        }
        let loan = self.loans.create(&payload).await?;
        tracing::info!("Opened loan {} for user {}", loan.id, loan.user.id());
        Ok(loan)
    }

    /// Loans currently out.
    pub async fn active_loans(&self) -> AppResult<Vec<Loan>> {
        let loans = self.loans.list(&[]).await?;
        Ok(loans.into_iter().filter(Loan::is_active).collect())
    }

    /// Record a return against an active loan, then close the loan.
    ///
    /// The return's punctuality is computed from the dates; the loan takes
    /// the terminal status the operator chose. If the loan-side update
    /// fails after the return was created, the fresh return is rolled back,
    /// and when even that fails a repair is queued so the pair converges
    /// later. The original failure is surfaced either way.
    pub async fn record_return(&self, submission: ReturnSubmission) -> AppResult<ReturnRecord> {
        if !submission.loan_outcome.is_terminal() {
            return Err(AppError::Validation(
                "A return must close its loan as returned or overdue".to_string(),
            ));
        }

        let loan = self.loans.get(&submission.loan_id).await?;
        if !loan.is_active() {
            return Err(AppError::Conflict(format!(
                "Loan {} already has a recorded return",
                loan.id
            )));
        }

        let actual = submission.actual_return_date.unwrap_or_else(Utc::now);
        let expected = loan.expected_return_date();
        let body = CreateReturnBody {
            loan_id: loan.id.clone(),
            user_id: loan.user.id().to_string(),
            book_id: loan.book.id().to_string(),
            actual_return_date: actual,
            expected_return_date: expected,
            status: punctuality(actual, expected),
            condition: submission.condition,
            fine: submission.fine.unwrap_or_default(),
            notes: submission.notes.unwrap_or_default(),
        };
        let record = self.returns.create(&body).await?;

        let transition = LoanTransition {
            status: submission.loan_outcome,
            return_date: Some(actual),
        };
        if let Err(e) = self.apply_transition(&loan.id, &transition).await {
            tracing::error!(
                "Loan {} failed to close after return {} was created: {}",
                loan.id,
                record.id,
                e
            );
            match self.returns.delete(&record.id).await {
                Ok(()) => {
                    tracing::warn!("Rolled back return {} to keep the pair consistent", record.id)
                }
                Err(rollback) => {
                    tracing::error!(
                        "Rollback of return {} failed as well: {}",
                        record.id,
                        rollback
                    );
                    self.queue_repair(&loan.id, &transition);
                }
            }
            return Err(e);
        }

        tracing::info!(
            "Closed loan {} as {} with return {} ({})",
            loan.id,
            transition.status,
            record.id,
            record.status
        );
        Ok(record)
    }

    /// Edit a return in place. The paired loan is never touched; changing
    /// the actual date recomputes the stored punctuality against the
    /// expected date already on the record.
    pub async fn amend_return(&self, id: &str, changes: UpdateReturn) -> AppResult<ReturnRecord> {
        let recomputed = match changes.actual_return_date {
            Some(actual) => {
                let existing = self.returns.get(id).await?;
                Some(punctuality(actual, existing.expected_return_date))
            }
            None => None,
        };
        let body = UpdateReturnBody {
            actual_return_date: changes.actual_return_date,
            status: recomputed,
            condition: changes.condition,
            fine: changes.fine,
            notes: changes.notes,
        };
        self.returns.update(id, &body).await
    }

    /// Delete a return and reopen its loan with the stored date cleared.
    /// The delete cannot be compensated, so a failing reopen is retried and
    /// then queued as a repair while the failure is surfaced.
    pub async fn cancel_return(&self, return_id: &str) -> AppResult<Loan> {
        let record = self.returns.get(return_id).await?;
        let loan_id = record.loan.id().to_string();

        self.returns.delete(return_id).await?;

        let transition = LoanTransition {
            status: LoanStatus::Active,
            return_date: None,
        };
        match self.apply_transition(&loan_id, &transition).await {
            Ok(loan) => {
                tracing::info!("Reopened loan {} after cancelling return {}", loan.id, return_id);
                Ok(loan)
            }
            Err(e) => {
                tracing::error!(
                    "Loan {} failed to reopen after return {} was deleted: {}",
                    loan_id,
                    return_id,
                    e
                );
                self.queue_repair(&loan_id, &transition);
                Err(e)
            }
        }
    }

    pub async fn list_returns(&self) -> AppResult<Vec<ReturnRecord>> {
        self.returns.list(&[]).await
    }

    /// Loan-side writes still waiting to be replayed.
    pub fn pending_repairs(&self) -> AppResult<Vec<LoanRepair>> {
        Ok(self.store.load(REPAIR_QUEUE_KEY)?.unwrap_or_default())
    }

    /// Replay queued loan-side writes. Applied entries leave the queue,
    /// entries whose loan no longer exists are dropped, the rest stay for
    /// the next flush. Returns how many were applied.
    pub async fn flush_repairs(&self) -> AppResult<usize> {
        let queue = self.pending_repairs()?;
        if queue.is_empty() {
            return Ok(0);
        }

        let mut remaining = Vec::new();
        let mut applied = 0;
        for repair in queue {
            let transition = LoanTransition {
                status: repair.status,
                return_date: repair.return_date,
            };
            match self.loans.transition(&repair.loan_id, &transition).await {
                Ok(_) => {
                    applied += 1;
                    tracing::info!("Repaired loan {}", repair.loan_id);
                }
                Err(AppError::RequestFailed { status: 404, .. }) => {
                    tracing::warn!("Dropping repair for deleted loan {}", repair.loan_id);
                }
                Err(e) => {
                    tracing::warn!("Repair for loan {} still failing: {}", repair.loan_id, e);
                    remaining.push(repair);
                }
            }
        }
        self.store.save(REPAIR_QUEUE_KEY, &remaining)?;
        Ok(applied)
    }

    /// One retry before giving up on a loan-side write.
    async fn apply_transition(&self, loan_id: &str, transition: &LoanTransition) -> AppResult<Loan> {
        match self.loans.transition(loan_id, transition).await {
            Ok(loan) => Ok(loan),
            Err(first) => {
                tracing::warn!("Retrying transition of loan {} after: {}", loan_id, first);
                self.loans.transition(loan_id, transition).await
            }
        }
    }

    fn queue_repair(&self, loan_id: &str, transition: &LoanTransition) {
        let repair = LoanRepair {
            loan_id: loan_id.to_string(),
            status: transition.status,
            return_date: transition.return_date,
            queued_at: Utc::now(),
        };
        match self.enqueue(repair) {
            Ok(()) => tracing::warn!("Queued repair for loan {}", loan_id),
            Err(e) => tracing::error!("Could not queue repair for loan {}: {}", loan_id, e),
        }
    }

    fn enqueue(&self, repair: LoanRepair) -> AppResult<()> {
        let mut queue = self.pending_repairs()?;
        queue.push(repair);
        self.store.save(REPAIR_QUEUE_KEY, &queue)
    }
}
