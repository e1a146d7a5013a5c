//! Domain Events
//!
//! Facts produced by the loan aggregate. The ledger folds them into the
//! aggregate and forwards `LoanFullyFunded` to the notification queue.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{ApprovalInfo, DisbursementInfo, Investment, LoanDraft, LoanId};

/// Loan lifecycle events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LoanEvent {
    /// Borrower proposed a new loan
    LoanProposed {
        loan_id: LoanId,
        draft: LoanDraft,
        proposed_at: DateTime<Utc>,
    },

    /// Field employee approved the loan
    LoanApproved {
        loan_id: LoanId,
        approval: ApprovalInfo,
    },

    /// An investor committed part of the principal
    InvestmentRecorded {
        loan_id: LoanId,
        investment: Investment,
        total_invested: Decimal,
    },

    /// Investments now cover the full principal
    LoanFullyFunded(FundingNotice),

    /// Money was handed to the borrower
    LoanDisbursed {
        loan_id: LoanId,
        disbursement: DisbursementInfo,
    },
}

impl LoanEvent {
    /// Get the event type as a string
    pub fn event_type(&self) -> &'static str {
        match self {
            LoanEvent::LoanProposed { .. } => "LoanProposed",
            LoanEvent::LoanApproved { .. } => "LoanApproved",
            LoanEvent::InvestmentRecorded { .. } => "InvestmentRecorded",
            LoanEvent::LoanFullyFunded(_) => "LoanFullyFunded",
            LoanEvent::LoanDisbursed { .. } => "LoanDisbursed",
        }
    }

    /// Get the loan this event belongs to
    pub fn loan_id(&self) -> &LoanId {
        match self {
            LoanEvent::LoanProposed { loan_id, .. }
            | LoanEvent::LoanApproved { loan_id, .. }
            | LoanEvent::InvestmentRecorded { loan_id, .. }
            | LoanEvent::LoanDisbursed { loan_id, .. } => loan_id,
            LoanEvent::LoanFullyFunded(notice) => &notice.loan_id,
        }
    }
}

/// Payload handed to the notification dispatcher once a loan is fully funded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundingNotice {
    pub loan_id: LoanId,
    pub agreement_letter: String,
    /// Investor address of every recorded investment, in investment order.
    /// Repeat investors appear once per investment.
    pub investors: Vec<String>,
    pub funded_at: DateTime<Utc>,
}

impl FundingNotice {
    /// Build a notice from the loan's investment list, one entry per investment
    pub fn new(
        loan_id: LoanId,
        agreement_letter: String,
        investments: &[Investment],
        funded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            loan_id,
            agreement_letter,
            investors: investments
                .iter()
                .map(|investment| investment.investor_id.clone())
                .collect(),
            funded_at,
        }
    }
}
