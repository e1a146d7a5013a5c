//! Loan Ledger module
//!
//! The ledger owns the loan store and runs the four lifecycle operations.
//! Each operation validates and mutates one loan atomically, then returns the
//! updated loan.

mod service;


pub use service::LoanLedger;
