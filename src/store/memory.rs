//! In-memory Loan Store
//!
//! Process-lifetime registry. The map lock is held only long enough to find
//! or insert an entry; each loan carries its own mutex, so mutations on
//! different loans never wait on each other.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use crate::aggregate::{Aggregate, Loan};
use crate::domain::{DomainError, LoanId};

use super::{LoanMutation, LoanStore};

type LoanEntry = Arc<Mutex<Loan>>;

/// HashMap-backed store with per-loan locking
#[derive(Debug, Default)]
pub struct InMemoryLoanStore {
    loans: RwLock<HashMap<LoanId, LoanEntry>>,
}

impl InMemoryLoanStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&self, loan_id: &LoanId) -> Option<LoanEntry> {
        self.loans
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(loan_id)
            .cloned()
    }
}

impl LoanStore for InMemoryLoanStore {
    fn insert(&self, loan: Loan) -> Result<(), DomainError> {
        let mut loans = self.loans.write().unwrap_or_else(PoisonError::into_inner);

        if loans.contains_key(loan.id()) {
            return Err(DomainError::DuplicateLoan(loan.id().clone()));
        }

        loans.insert(loan.id().clone(), Arc::new(Mutex::new(loan)));
        Ok(())
    }

    fn get(&self, loan_id: &LoanId) -> Option<Loan> {
        let entry = self.entry(loan_id)?;
        let loan = entry.lock().unwrap_or_else(PoisonError::into_inner);
        Some(loan.clone())
    }

    fn update(
        &self,
        loan_id: &LoanId,
        mutation: &mut LoanMutation<'_>,
    ) -> Result<Loan, DomainError> {
        let entry = self
            .entry(loan_id)
            .ok_or_else(|| DomainError::LoanNotFound(loan_id.clone()))?;

        // Mutations run on a copy, so a poisoned guard still holds the last
        // committed state.
        let mut current = entry.lock().unwrap_or_else(PoisonError::into_inner);
        let updated = mutation(current.clone())?;
        *current = updated.clone();

        Ok(updated)
    }

    fn len(&self) -> usize {
        self.loans
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
