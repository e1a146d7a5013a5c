//! Domain Error Types
//!
//! Pure domain errors that don't depend on infrastructure.

use rust_decimal::Decimal;
use thiserror::Error;

use super::{LoanId, LoanState};

/// Domain-specific errors
///
/// These errors represent lifecycle and funding rule violations.
/// They are independent of the web/infrastructure layer.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// No loan is registered under this ID
    #[error("Loan not found: {0}")]
    LoanNotFound(LoanId),

    /// The operation is not valid for the loan's current lifecycle state
    #[error("Loan {loan_id} is not in {expected} state (current state: {actual})")]
    InvalidState {
        loan_id: LoanId,
        expected: LoanState,
        actual: LoanState,
    },

    /// The investment would push the funded total above the principal
    #[error(
        "Total invested amount cannot exceed the loan principal: principal {principal}, invested {invested}, requested {requested}"
    )]
    OverAllocation {
        principal: Decimal,
        invested: Decimal,
        requested: Decimal,
    },

    /// Loan terms or request fields that fail validation
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A loan with this ID is already registered
    #[error("Duplicate loan: {0}")]
    DuplicateLoan(LoanId),
}

impl DomainError {
    /// Create an invalid state error
    pub fn invalid_state(loan_id: &LoanId, expected: LoanState, actual: LoanState) -> Self {
        Self::InvalidState {
            loan_id: loan_id.clone(),
            expected,
            actual,
        }
    }

    /// Create an over-allocation error
    pub fn over_allocation(principal: Decimal, invested: Decimal, requested: Decimal) -> Self {
        Self::OverAllocation {
            principal,
            invested,
            requested,
        }
    }

    /// Check if this is a client error (caller's fault)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidState { .. } | Self::OverAllocation { .. } | Self::InvalidInput(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_over_allocation_error() {
        let err = DomainError::over_allocation(dec!(1000), dec!(700), dec!(400));

        assert!(err.is_client_error());
        let message = err.to_string();
        assert!(message.contains("1000"));
        assert!(message.contains("700"));
        assert!(message.contains("400"));
    }

    #[test]
    fn test_invalid_state_error() {
        let id = LoanId::from("loan-1");
        let err = DomainError::invalid_state(&id, LoanState::Proposed, LoanState::Approved);

        assert!(err.is_client_error());
        assert_eq!(
            err.to_string(),
            "Loan loan-1 is not in proposed state (current state: approved)"
        );
    }

    #[test]
    fn test_not_found_is_not_client_error() {
        let err = DomainError::LoanNotFound(LoanId::from("missing"));
        assert!(!err.is_client_error());
    }
}
