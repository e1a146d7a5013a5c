//! API Routes
//!
//! HTTP endpoint definitions.

use axum::{
    extract::{rejection::JsonRejection, Extension, Path, State},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::aggregate::Loan;
use crate::domain::{
    Amount, ApprovalInfo, DisbursementInfo, Investment, LoanDraft, LoanId, OperationContext,
};
use crate::error::AppResult;

use super::AppState;

// =========================================================================
// Request types
// =========================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateLoanRequest {
    pub borrower_id: String,
    pub principal_amount: Amount,
    pub rate: Decimal,
    pub roi: Decimal,
    pub agreement_letter: String,
}

impl From<CreateLoanRequest> for LoanDraft {
    fn from(request: CreateLoanRequest) -> Self {
        LoanDraft {
            borrower_id: request.borrower_id,
            principal_amount: request.principal_amount,
            rate: request.rate,
            roi: request.roi,
            agreement_letter: request.agreement_letter,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApproveLoanRequest {
    pub picture_proof: String,
    pub employee_id: String,
    /// Defaults to the time the request is handled
    #[serde(default)]
    pub approval_date: Option<DateTime<Utc>>,
}

impl ApproveLoanRequest {
    fn into_approval(self, now: DateTime<Utc>) -> ApprovalInfo {
        ApprovalInfo {
            picture_proof: self.picture_proof,
            employee_id: self.employee_id,
            approval_date: self.approval_date.unwrap_or(now),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InvestRequest {
    /// Investor email address
    pub investor_id: String,
    pub amount: Amount,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DisburseLoanRequest {
    pub signed_agreement_letter: String,
    pub employee_id: String,
    /// Defaults to the time the request is handled
    #[serde(default)]
    pub disbursement_date: Option<DateTime<Utc>>,
}

impl DisburseLoanRequest {
    fn into_disbursement(self, now: DateTime<Utc>) -> DisbursementInfo {
        DisbursementInfo {
            signed_agreement_letter: self.signed_agreement_letter,
            employee_id: self.employee_id,
            disbursement_date: self.disbursement_date.unwrap_or(now),
        }
    }
}

// =========================================================================
// API Router
// =========================================================================

/// Create the loan router
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/loans", post(create_loan))
        .route("/loans/:loan_id", get(get_loan))
        .route("/loans/:loan_id/approve", post(approve_loan))
        .route("/loans/:loan_id/invest", post(invest_loan))
        .route("/loans/:loan_id/disburse", post(disburse_loan))
}

// =========================================================================
// POST /loans
// =========================================================================

/// Propose a new loan
async fn create_loan(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    payload: Result<Json<CreateLoanRequest>, JsonRejection>,
) -> AppResult<Json<Loan>> {
    let Json(request) = payload?;
    let loan = state.ledger.create(request.into(), &context)?;
    Ok(Json(loan))
}

// =========================================================================
// GET /loans/:loan_id
// =========================================================================

async fn get_loan(
    State(state): State<AppState>,
    Path(loan_id): Path<String>,
) -> AppResult<Json<Loan>> {
    let loan = state.ledger.get(&LoanId::from(loan_id))?;
    Ok(Json(loan))
}

// =========================================================================
// POST /loans/:loan_id/approve
// =========================================================================

/// Approve a proposed loan
async fn approve_loan(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    Path(loan_id): Path<String>,
    payload: Result<Json<ApproveLoanRequest>, JsonRejection>,
) -> AppResult<Json<Loan>> {
    let loan_id = LoanId::from(loan_id);
    // Unknown loans are reported before body errors
    state.ledger.get(&loan_id)?;
    let Json(request) = payload?;
    let loan = state.ledger.approve(
        &loan_id,
        request.into_approval(Utc::now()),
        &context,
    )?;
    Ok(Json(loan))
}

// =========================================================================
// POST /loans/:loan_id/invest
// =========================================================================

/// Record an investment against an approved loan
async fn invest_loan(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    Path(loan_id): Path<String>,
    payload: Result<Json<InvestRequest>, JsonRejection>,
) -> AppResult<Json<Loan>> {
    let loan_id = LoanId::from(loan_id);
    state.ledger.get(&loan_id)?;
    let Json(request) = payload?;
    let investment = Investment {
        investor_id: request.investor_id,
        amount: request.amount,
    };
    let loan = state
        .ledger
        .invest(&loan_id, investment, &context)?;
    Ok(Json(loan))
}

// =========================================================================
// POST /loans/:loan_id/disburse
// =========================================================================

/// Disburse a fully funded loan
async fn disburse_loan(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    Path(loan_id): Path<String>,
    payload: Result<Json<DisburseLoanRequest>, JsonRejection>,
) -> AppResult<Json<Loan>> {
    let loan_id = LoanId::from(loan_id);
    state.ledger.get(&loan_id)?;
    let Json(request) = payload?;
    let loan = state.ledger.disburse(
        &loan_id,
        request.into_disbursement(Utc::now()),
        &context,
    )?;
    Ok(Json(loan))
}
