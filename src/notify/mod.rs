//! Notification module
//!
//! Outbound investor notifications. The ledger hands a `FundingNotice` to the
//! `NotificationQueue`; the `NotificationDispatcher` task turns it into one
//! message per investor and delivers each through a `Notifier`.

mod dispatcher;
mod log;
mod queue;
mod smtp;

pub use dispatcher::{DispatchReport, DispatcherConfig, NotificationDispatcher};
pub use log::LogNotifier;
pub use queue::NotificationQueue;
pub use smtp::{SmtpConfig, SmtpNotifier, SmtpTls};

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::domain::FundingNotice;

const INVESTOR_SUBJECT: &str = "Loan Investment Agreement";

/// A single message to one recipient
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

impl OutboundMessage {
    /// Messages for every investor of a fully funded loan
    pub fn for_investors(notice: &FundingNotice) -> Vec<Self> {
        notice
            .investors
            .iter()
            .map(|investor| Self {
                recipient: investor.clone(),
                subject: INVESTOR_SUBJECT.to_string(),
                body: format!(
                    "Dear Investor,\n\nThank you for your investment. Please find the agreement letter here: {}\n\nBest regards,\nLoan Service Team",
                    notice.agreement_letter
                ),
            })
            .collect()
    }
}

/// Mail transport abstraction
pub trait Notifier: Send + Sync + 'static {
    /// Deliver one message. Failures are reported, never retried.
    fn deliver(
        &self,
        message: &OutboundMessage,
    ) -> impl Future<Output = Result<(), NotifyError>> + Send;
}

/// Notification delivery errors. These are logged, never returned to API callers.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Invalid address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Failed to build message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("Delivery timed out after {0:?}")]
    Timeout(Duration),

    #[error("Delivery rejected: {0}")]
    Rejected(String),
}

/// Spawn a dispatcher for `notifier` and return the queue feeding it
pub fn spawn_dispatcher<N: Notifier>(
    notifier: N,
    config: DispatcherConfig,
) -> (NotificationQueue, JoinHandle<()>) {
    let (queue, receiver) = NotificationQueue::channel(config.queue_capacity);
    let handle = NotificationDispatcher::new(notifier, receiver, config).start();
    (queue, handle)
}
