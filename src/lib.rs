//! loan_ledger Library
//!
//! Re-exports modules for integration testing and external use.

pub mod aggregate;
pub mod api;
pub mod domain;
pub mod ledger;
pub mod notify;
pub mod store;

pub mod config;
mod error;

pub use config::Config;
pub use error::{AppError, AppResult, ErrorResponse};
pub use domain::{Amount, AmountError, DomainError, OperationContext};
pub use domain::{FundingNotice, LoanEvent, LoanId, LoanState};
pub use ledger::LoanLedger;
