//! Loan Store module
//!
//! Storage abstraction owned by the ledger. Implementations must run each
//! `update` as an atomic read-modify-write on a single loan.

mod memory;

pub use memory::InMemoryLoanStore;

use crate::aggregate::Loan;
use crate::domain::{DomainError, LoanId};

/// A mutation applied to a working copy of a loan. Returning an error
/// discards the copy and leaves the stored loan untouched.
pub type LoanMutation<'a> = dyn FnMut(Loan) -> Result<Loan, DomainError> + 'a;

/// Registry of loans keyed by ID
pub trait LoanStore: Send + Sync {
    /// Register a new loan. Fails with `DuplicateLoan` if the ID is taken.
    fn insert(&self, loan: Loan) -> Result<(), DomainError>;

    /// Snapshot of the current loan state
    fn get(&self, loan_id: &LoanId) -> Option<Loan>;

    /// Run `mutation` while holding the loan's exclusive section and commit
    /// its result. Fails with `LoanNotFound` for unknown IDs.
    fn update(&self, loan_id: &LoanId, mutation: &mut LoanMutation<'_>)
        -> Result<Loan, DomainError>;

    /// Number of registered loans
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
