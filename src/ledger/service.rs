//! Loan Ledger
//!
//! Orchestrates the loan aggregate, the store and the notification queue.

use std::sync::Arc;

use crate::aggregate::{Aggregate, Loan};
use crate::domain::{
    ApprovalInfo, DisbursementInfo, DomainError, FundingNotice, Investment, LoanDraft, LoanEvent,
    LoanId, OperationContext,
};
use crate::notify::NotificationQueue;
use crate::store::LoanStore;

/// Registry of loans and their lifecycle operations
pub struct LoanLedger {
    store: Arc<dyn LoanStore>,
    notifications: NotificationQueue,
}

impl LoanLedger {
    pub fn new(store: Arc<dyn LoanStore>, notifications: NotificationQueue) -> Self {
        Self {
            store,
            notifications,
        }
    }

    // =========================================================================
    // Create
    // =========================================================================

    /// Register a new loan in Proposed state
    pub fn create(
        &self,
        draft: LoanDraft,
        context: &OperationContext,
    ) -> Result<Loan, DomainError> {
        let (loan, event) = Loan::propose(LoanId::generate(), draft)?;
        self.store.insert(loan.clone())?;

        tracing::info!(
            loan_id = %event.loan_id(),
            borrower_id = %loan.borrower_id(),
            principal = %loan.principal_amount(),
            event = event.event_type(),
            correlation_id = ?context.correlation_id,
            "Loan proposed"
        );

        Ok(loan)
    }

    /// Current state of a loan
    pub fn get(&self, loan_id: &LoanId) -> Result<Loan, DomainError> {
        self.store
            .get(loan_id)
            .ok_or_else(|| DomainError::LoanNotFound(loan_id.clone()))
    }

    // =========================================================================
    // Approve
    // =========================================================================

    /// Attach approval details and move Proposed -> Approved
    pub fn approve(
        &self,
        loan_id: &LoanId,
        approval: ApprovalInfo,
        context: &OperationContext,
    ) -> Result<Loan, DomainError> {
        let loan = self.store.update(loan_id, &mut |loan: Loan| -> Result<Loan, DomainError> {
            let event = loan.approve(approval.clone())?;
            Ok(loan.apply(event))
        })?;

        tracing::info!(
            loan_id = %loan_id,
            employee_id = %approval.employee_id,
            version = loan.version(),
            correlation_id = ?context.correlation_id,
            "Loan approved"
        );

        Ok(loan)
    }

    // =========================================================================
    // Invest
    // =========================================================================

    /// Record an investment. When it completes the principal the loan moves
    /// to Invested and a funding notice is queued for the investors.
    pub fn invest(
        &self,
        loan_id: &LoanId,
        investment: Investment,
        context: &OperationContext,
    ) -> Result<Loan, DomainError> {
        let mut funded: Option<FundingNotice> = None;

        let loan = self.store.update(loan_id, &mut |loan: Loan| -> Result<Loan, DomainError> {
            let events = loan.invest(investment.clone())?;
            funded = events.iter().find_map(|event| match event {
                LoanEvent::LoanFullyFunded(notice) => Some(notice.clone()),
                _ => None,
            });
            Ok(loan.apply_all(events))
        })?;

        tracing::info!(
            loan_id = %loan_id,
            investor_id = %investment.investor_id,
            amount = %investment.amount,
            total_invested = %loan.total_invested(),
            state = %loan.state(),
            correlation_id = ?context.correlation_id,
            "Investment recorded"
        );

        // Queued after the loan's lock is released
        if let Some(notice) = funded {
            tracing::info!(
                loan_id = %loan_id,
                investors = notice.investors.len(),
                "Loan fully funded, queueing investor notifications"
            );
            self.notifications.enqueue(notice);
        }

        Ok(loan)
    }

    // =========================================================================
    // Disburse
    // =========================================================================

    /// Attach disbursement details and move Invested -> Disbursed
    pub fn disburse(
        &self,
        loan_id: &LoanId,
        disbursement: DisbursementInfo,
        context: &OperationContext,
    ) -> Result<Loan, DomainError> {
        let loan = self.store.update(loan_id, &mut |loan: Loan| -> Result<Loan, DomainError> {
            let event = loan.disburse(disbursement.clone())?;
            Ok(loan.apply(event))
        })?;

        tracing::info!(
            loan_id = %loan_id,
            employee_id = %disbursement.employee_id,
            version = loan.version(),
            correlation_id = ?context.correlation_id,
            "Loan disbursed"
        );

        Ok(loan)
    }

    /// Number of loans in the registry
    pub fn loan_count(&self) -> usize {
        self.store.len()
    }
}
