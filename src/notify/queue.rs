//! Notification Queue
//!
//! Bounded hand-off between the ledger and the dispatcher task. Enqueueing
//! never waits, so a slow mail transport cannot hold up a ledger operation.

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::domain::FundingNotice;

/// Cloneable sender side of the outbound notification queue
#[derive(Debug, Clone)]
pub struct NotificationQueue {
    sender: mpsc::Sender<FundingNotice>,
}

impl NotificationQueue {
    /// Create a queue and the receiver a dispatcher drains
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<FundingNotice>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender }, receiver)
    }

    /// Hand a notice to the dispatcher. Returns false if it was dropped.
    pub fn enqueue(&self, notice: FundingNotice) -> bool {
        match self.sender.try_send(notice) {
            Ok(()) => true,
            Err(TrySendError::Full(notice)) => {
                tracing::warn!(
                    loan_id = %notice.loan_id,
                    investors = notice.investors.len(),
                    "Notification queue full, dropping funding notice"
                );
                false
            }
            Err(TrySendError::Closed(notice)) => {
                tracing::warn!(
                    loan_id = %notice.loan_id,
                    "Notification dispatcher stopped, dropping funding notice"
                );
                false
            }
        }
    }
}
