//! Domain module
//!
//! Core domain types and business rules.

pub mod amount;
pub mod context;
pub mod error;
pub mod events;
pub mod loan;

pub use amount::{Amount, AmountError};
pub use context::OperationContext;
pub use error::DomainError;
pub use events::{FundingNotice, LoanEvent};
pub use loan::{ApprovalInfo, DisbursementInfo, Investment, LoanDraft, LoanId, LoanState};
