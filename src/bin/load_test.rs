//! Load Testing Tool
//!
//! Hammers the ledger with concurrent investments and checks that no loan
//! ends up over-allocated.
//!
//! Run with: cargo run --bin load_test --release -- --loans 100 --investors 50

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use rust_decimal::Decimal;

use loan_ledger::aggregate::Aggregate;
use loan_ledger::domain::{Amount, ApprovalInfo, Investment, LoanDraft, LoanId};
use loan_ledger::notify::NotificationQueue;
use loan_ledger::store::InMemoryLoanStore;
use loan_ledger::{LoanLedger, LoanState, OperationContext};

const PRINCIPAL: i64 = 10_000;
const TICKET: i64 = 250;

fn arg(args: &[String], name: &str, default: usize) -> usize {
    args.iter()
        .position(|a| a == name)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn approved_loan(ledger: &LoanLedger, n: usize) -> anyhow::Result<LoanId> {
    let ctx = OperationContext::new();
    let draft = LoanDraft {
        borrower_id: format!("borrower-{}", n),
        principal_amount: Amount::from_integer(PRINCIPAL)?,
        rate: Decimal::new(12, 2),
        roi: Decimal::new(8, 2),
        agreement_letter: format!("https://docs.example.com/letter-{}.pdf", n),
    };
    let loan = ledger.create(draft, &ctx)?;
    let approval = ApprovalInfo {
        picture_proof: format!("https://docs.example.com/visit-{}.jpg", n),
        employee_id: "load-test".to_string(),
        approval_date: Utc::now(),
    };
    ledger.approve(loan.id(), approval, &ctx)?;
    Ok(loan.id().clone())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let loan_count = arg(&args, "--loans", 100);
    let investor_count = arg(&args, "--investors", 50);

    // Only the notice count matters here, so the receiver is drained inline
    let (queue, mut notices) = NotificationQueue::channel(loan_count.max(1));
    let ledger = Arc::new(LoanLedger::new(Arc::new(InMemoryLoanStore::new()), queue));

    println!(
        "Load Test - {} loans x {} investors of {} against principal {}",
        loan_count, investor_count, TICKET, PRINCIPAL
    );

    let loan_ids = (0..loan_count)
        .map(|n| approved_loan(&ledger, n))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let start = Instant::now();
    let mut tasks = Vec::with_capacity(loan_count * investor_count);

    for loan_id in &loan_ids {
        for i in 0..investor_count {
            let ledger = Arc::clone(&ledger);
            let loan_id = loan_id.clone();
            tasks.push(tokio::task::spawn_blocking(move || {
                let investment = Investment {
                    investor_id: format!("investor-{}@example.com", i),
                    amount: Amount::from_integer(TICKET)?,
                };
                ledger
                    .invest(&loan_id, investment, &OperationContext::new())
                    .map_err(anyhow::Error::from)
            }));
        }
    }

    let mut accepted = 0u64;
    let mut rejected = 0u64;
    for task in tasks {
        match task.await? {
            Ok(_) => accepted += 1,
            Err(_) => rejected += 1,
        }
    }

    let elapsed = start.elapsed();
    let rate = (accepted + rejected) as f64 / elapsed.as_secs_f64();

    let mut violations = 0usize;
    let mut funded = 0usize;
    for loan_id in &loan_ids {
        let loan = ledger.get(loan_id)?;
        if loan.total_invested() > loan.principal_amount().value() {
            violations += 1;
        }
        if loan.state() == LoanState::Invested {
            funded += 1;
        }
    }

    let mut notice_count = 0usize;
    while notices.try_recv().is_ok() {
        notice_count += 1;
    }

    println!("\n=== Load Test Results ===");
    println!("Investments accepted: {}", accepted);
    println!("Investments rejected: {}", rejected);
    println!("Fully funded loans: {}", funded);
    println!("Funding notices: {}", notice_count);
    println!("Over-allocated loans: {}", violations);
    println!("Time: {:.2}s", elapsed.as_secs_f64());
    println!("Rate: {:.0} requests/sec", rate);

    if violations > 0 || notice_count != funded {
        anyhow::bail!("ledger invariants violated under load");
    }

    Ok(())
}
