//! Loan Aggregate
//!
//! Loan is the core aggregate of the ledger. Commands check the lifecycle
//! state and the funding invariant, then return the events to apply.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::{
    Amount, ApprovalInfo, DisbursementInfo, DomainError, FundingNotice, Investment, LoanDraft,
    LoanEvent, LoanId, LoanState,
};

use super::Aggregate;

/// Loan Aggregate
///
/// # Invariants
/// - `state` only moves forward
/// - sum of `investments` never exceeds `principal_amount`
/// - `approval_info` is present iff state >= Approved
/// - `disbursement_info` is present iff state == Disbursed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Loan {
    id: LoanId,
    borrower_id: String,
    principal_amount: Amount,
    rate: Decimal,
    roi: Decimal,
    agreement_letter: String,
    state: LoanState,
    #[serde(skip_serializing_if = "Option::is_none")]
    approval_info: Option<ApprovalInfo>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    investments: Vec<Investment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    disbursement_info: Option<DisbursementInfo>,
    version: i64,
    created_at: DateTime<Utc>,
}

impl Loan {
    // =========================================================================
    // Propose
    // =========================================================================

    /// Propose a new loan and generate the creation event
    pub fn propose(loan_id: LoanId, draft: LoanDraft) -> Result<(Self, LoanEvent), DomainError> {
        draft.validate()?;
        let now = Utc::now();

        let event = LoanEvent::LoanProposed {
            loan_id: loan_id.clone(),
            draft: draft.clone(),
            proposed_at: now,
        };

        let loan = Self {
            id: loan_id,
            borrower_id: draft.borrower_id,
            principal_amount: draft.principal_amount,
            rate: draft.rate,
            roi: draft.roi,
            agreement_letter: draft.agreement_letter,
            state: LoanState::Proposed,
            approval_info: None,
            investments: Vec::new(),
            disbursement_info: None,
            version: 1,
            created_at: now,
        };

        Ok((loan, event))
    }

    // =========================================================================
    // Approve
    // =========================================================================

    /// Approve a proposed loan. Re-approval is rejected.
    pub fn approve(&self, approval: ApprovalInfo) -> Result<LoanEvent, DomainError> {
        self.require_state(LoanState::Proposed)?;

        Ok(LoanEvent::LoanApproved {
            loan_id: self.id.clone(),
            approval,
        })
    }

    // =========================================================================
    // Invest
    // =========================================================================

    /// Record an investment against an approved loan.
    ///
    /// Returns `InvestmentRecorded`, followed by `LoanFullyFunded` when the
    /// new total equals the principal exactly. An investment that would
    /// exceed the principal is rejected whole.
    pub fn invest(&self, investment: Investment) -> Result<Vec<LoanEvent>, DomainError> {
        self.require_state(LoanState::Approved)?;
        investment.validate()?;

        let invested = self.total_invested();
        let total_invested = invested + investment.amount.value();
        let principal = self.principal_amount.value();

        if total_invested > principal {
            return Err(DomainError::over_allocation(
                principal,
                invested,
                investment.amount.value(),
            ));
        }

        let notice = (total_invested == principal).then(|| {
            let mut funded_by = self.investments.clone();
            funded_by.push(investment.clone());
            FundingNotice::new(
                self.id.clone(),
                self.agreement_letter.clone(),
                &funded_by,
                Utc::now(),
            )
        });

        let mut events = vec![LoanEvent::InvestmentRecorded {
            loan_id: self.id.clone(),
            investment,
            total_invested,
        }];
        events.extend(notice.map(LoanEvent::LoanFullyFunded));

        Ok(events)
    }

    // =========================================================================
    // Disburse
    // =========================================================================

    /// Disburse a fully funded loan
    pub fn disburse(&self, disbursement: DisbursementInfo) -> Result<LoanEvent, DomainError> {
        self.require_state(LoanState::Invested)?;

        Ok(LoanEvent::LoanDisbursed {
            loan_id: self.id.clone(),
            disbursement,
        })
    }

    fn require_state(&self, expected: LoanState) -> Result<(), DomainError> {
        if self.state != expected {
            return Err(DomainError::invalid_state(&self.id, expected, self.state));
        }
        Ok(())
    }

    // =========================================================================
    // Getters
    // =========================================================================

    pub fn borrower_id(&self) -> &str {
        &self.borrower_id
    }

    pub fn principal_amount(&self) -> &Amount {
        &self.principal_amount
    }

    pub fn rate(&self) -> Decimal {
        self.rate
    }

    pub fn roi(&self) -> Decimal {
        self.roi
    }

    pub fn agreement_letter(&self) -> &str {
        &self.agreement_letter
    }

    pub fn state(&self) -> LoanState {
        self.state
    }

    pub fn approval_info(&self) -> Option<&ApprovalInfo> {
        self.approval_info.as_ref()
    }

    pub fn investments(&self) -> &[Investment] {
        &self.investments
    }

    pub fn disbursement_info(&self) -> Option<&DisbursementInfo> {
        self.disbursement_info.as_ref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Sum of all recorded investments
    pub fn total_invested(&self) -> Decimal {
        Amount::total(self.investments.iter().map(|i| &i.amount))
    }

    /// Principal still open for investment
    pub fn remaining(&self) -> Decimal {
        self.principal_amount.value() - self.total_invested()
    }
}

impl Aggregate for Loan {
    type Event = LoanEvent;
    type Id = LoanId;

    fn aggregate_type() -> &'static str {
        "Loan"
    }

    fn id(&self) -> &LoanId {
        &self.id
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn apply(mut self, event: Self::Event) -> Self {
        match event {
            LoanEvent::LoanProposed {
                loan_id,
                draft,
                proposed_at,
            } => {
                self.id = loan_id;
                self.borrower_id = draft.borrower_id;
                self.principal_amount = draft.principal_amount;
                self.rate = draft.rate;
                self.roi = draft.roi;
                self.agreement_letter = draft.agreement_letter;
                self.state = LoanState::Proposed;
                self.approval_info = None;
                self.investments.clear();
                self.disbursement_info = None;
                self.created_at = proposed_at;
            }

            LoanEvent::LoanApproved { approval, .. } => {
                self.approval_info = Some(approval);
                self.state = LoanState::Approved;
            }

            LoanEvent::InvestmentRecorded { investment, .. } => {
                self.investments.push(investment);
            }

            LoanEvent::LoanFullyFunded(_) => {
                self.state = LoanState::Invested;
            }

            LoanEvent::LoanDisbursed { disbursement, .. } => {
                self.disbursement_info = Some(disbursement);
                self.state = LoanState::Disbursed;
            }
        }

        self.version += 1;
        self
    }
}
