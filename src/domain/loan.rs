//! Loan value types
//!
//! Identifiers, lifecycle states and the records attached to a loan as it
//! moves through approval, funding and disbursement.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::{Amount, DomainError};

/// Opaque loan identifier.
///
/// Generated IDs are UUIDv7 strings, so they sort by creation time. Any
/// string is accepted when looking a loan up; unknown ones are simply not found.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoanId(String);

impl LoanId {
    /// Generate a fresh, time-ordered ID
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LoanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for LoanId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for LoanId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Loan lifecycle state. Transitions only move forward:
/// Proposed -> Approved -> Invested -> Disbursed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanState {
    Proposed,
    Approved,
    Invested,
    Disbursed,
}

impl LoanState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanState::Proposed => "proposed",
            LoanState::Approved => "approved",
            LoanState::Invested => "invested",
            LoanState::Disbursed => "disbursed",
        }
    }
}

impl fmt::Display for LoanState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Borrower-supplied terms for a new loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanDraft {
    pub borrower_id: String,
    pub principal_amount: Amount,
    pub rate: Decimal,
    pub roi: Decimal,
    pub agreement_letter: String,
}

impl LoanDraft {
    /// Check the terms that the Amount type cannot enforce on its own
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.borrower_id.trim().is_empty() {
            return Err(DomainError::InvalidInput(
                "borrower_id must not be empty".to_string(),
            ));
        }
        if self.agreement_letter.trim().is_empty() {
            return Err(DomainError::InvalidInput(
                "agreement_letter must not be empty".to_string(),
            ));
        }
        if self.rate < Decimal::ZERO {
            return Err(DomainError::InvalidInput(format!(
                "rate must not be negative (got {})",
                self.rate
            )));
        }
        if self.roi < Decimal::ZERO {
            return Err(DomainError::InvalidInput(format!(
                "roi must not be negative (got {})",
                self.roi
            )));
        }
        Ok(())
    }
}

/// Proof that a field employee verified the borrower
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalInfo {
    pub picture_proof: String,
    pub employee_id: String,
    pub approval_date: DateTime<Utc>,
}

/// A single investor's commitment. The investor ID doubles as the
/// notification address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Investment {
    pub investor_id: String,
    pub amount: Amount,
}

impl Investment {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.investor_id.trim().is_empty() {
            return Err(DomainError::InvalidInput(
                "investor_id must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Record of the signed agreement handed over at disbursement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisbursementInfo {
    pub signed_agreement_letter: String,
    pub employee_id: String,
    pub disbursement_date: DateTime<Utc>,
}
