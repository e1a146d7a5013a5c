//! Notification Dispatcher
//!
//! Background task that drains the notification queue. Each recipient gets a
//! single delivery attempt bounded by a timeout; outcomes are only logged.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::timeout;

use crate::domain::FundingNotice;

use super::{Notifier, NotifyError, OutboundMessage};

/// Configuration for the dispatcher
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Upper bound on a single delivery (default: 10 seconds)
    pub delivery_timeout: Duration,
    /// Notices buffered before new ones are dropped (default: 1024)
    pub queue_capacity: usize,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            delivery_timeout: Duration::from_secs(10),
            queue_capacity: 1024,
        }
    }
}

/// Outcome of dispatching one funding notice
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub delivered: usize,
    pub failed: usize,
    pub timed_out: usize,
}

impl DispatchReport {
    pub fn attempted(&self) -> usize {
        self.delivered + self.failed + self.timed_out
    }
}

/// Dispatcher - delivers investor messages for each funding notice
pub struct NotificationDispatcher<N> {
    notifier: Arc<N>,
    receiver: mpsc::Receiver<FundingNotice>,
    config: DispatcherConfig,
}

impl<N: Notifier> NotificationDispatcher<N> {
    pub fn new(
        notifier: N,
        receiver: mpsc::Receiver<FundingNotice>,
        config: DispatcherConfig,
    ) -> Self {
        Self {
            notifier: Arc::new(notifier),
            receiver,
            config,
        }
    }

    /// Start the dispatcher in the background.
    /// The task ends once every queue handle has been dropped and the
    /// backlog is drained.
    pub fn start(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            self.run().await;
        })
    }

    async fn run(mut self) {
        tracing::info!("Notification dispatcher started");

        while let Some(notice) = self.receiver.recv().await {
            let report = self.dispatch(&notice).await;
            tracing::info!(
                loan_id = %notice.loan_id,
                delivered = report.delivered,
                failed = report.failed,
                timed_out = report.timed_out,
                "Funding notifications dispatched"
            );
        }

        tracing::info!("Notification dispatcher stopped");
    }

    /// Deliver one message per investor of `notice`
    pub async fn dispatch(&self, notice: &FundingNotice) -> DispatchReport {
        let mut report = DispatchReport::default();

        for message in OutboundMessage::for_investors(notice) {
            match self.deliver_one(&message).await {
                Ok(()) => {
                    tracing::info!(
                        loan_id = %notice.loan_id,
                        recipient = %message.recipient,
                        "Email sent successfully"
                    );
                    report.delivered += 1;
                }
                Err(NotifyError::Timeout(after)) => {
                    tracing::warn!(
                        loan_id = %notice.loan_id,
                        recipient = %message.recipient,
                        timeout = ?after,
                        "Email delivery timed out"
                    );
                    report.timed_out += 1;
                }
                Err(e) => {
                    tracing::error!(
                        loan_id = %notice.loan_id,
                        recipient = %message.recipient,
                        error = %e,
                        "Failed to send email"
                    );
                    report.failed += 1;
                }
            }
        }

        report
    }

    async fn deliver_one(&self, message: &OutboundMessage) -> Result<(), NotifyError> {
        let limit = self.config.delivery_timeout;
        match timeout(limit, self.notifier.deliver(message)).await {
            Ok(result) => result,
            Err(_) => Err(NotifyError::Timeout(limit)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LoanId;
    use crate::notify::NotificationQueue;
    use chrono::Utc;
    use std::sync::Mutex;

    /// Fails for one address, hangs for another, succeeds otherwise
    #[derive(Default)]
    struct ScriptedNotifier {
        sent: Mutex<Vec<String>>,
    }

    impl Notifier for ScriptedNotifier {
        async fn deliver(&self, message: &OutboundMessage) -> Result<(), NotifyError> {
            match message.recipient.as_str() {
                "broken@example.com" => Err(NotifyError::Rejected("mailbox unavailable".into())),
                "slow@example.com" => {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    Ok(())
                }
                recipient => {
                    self.sent.lock().unwrap().push(recipient.to_string());
                    Ok(())
                }
            }
        }
    }

    fn notice(investors: &[&str]) -> FundingNotice {
        FundingNotice {
            loan_id: LoanId::from("loan-1"),
            agreement_letter: "https://docs.example.com/letter.pdf".to_string(),
            investors: investors.iter().map(|s| s.to_string()).collect(),
            funded_at: Utc::now(),
        }
    }

    fn dispatcher(delivery_timeout: Duration) -> NotificationDispatcher<ScriptedNotifier> {
        let (_queue, receiver) = NotificationQueue::channel(1);
        NotificationDispatcher::new(
            ScriptedNotifier::default(),
            receiver,
            DispatcherConfig {
                delivery_timeout,
                queue_capacity: 1,
            },
        )
    }

    #[test]
    fn test_dispatcher_config_default() {
        let config = DispatcherConfig::default();
        assert_eq!(config.delivery_timeout, Duration::from_secs(10));
        assert_eq!(config.queue_capacity, 1024);
    }

    #[tokio::test]
    async fn test_dispatch_delivers_to_every_investor() {
        let dispatcher = dispatcher(Duration::from_secs(1));
        let report = dispatcher
            .dispatch(&notice(&["alice@example.com", "bob@example.com"]))
            .await;

        assert_eq!(report.delivered, 2);
        assert_eq!(report.attempted(), 2);
        assert_eq!(
            *dispatcher.notifier.sent.lock().unwrap(),
            vec!["alice@example.com", "bob@example.com"]
        );
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_remaining_deliveries() {
        let dispatcher = dispatcher(Duration::from_secs(1));
        let report = dispatcher
            .dispatch(&notice(&["broken@example.com", "carol@example.com"]))
            .await;

        assert_eq!(report.failed, 1);
        assert_eq!(report.delivered, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_delivery_times_out() {
        let dispatcher = dispatcher(Duration::from_millis(50));
        let report = dispatcher
            .dispatch(&notice(&["slow@example.com", "dave@example.com"]))
            .await;

        assert_eq!(report.timed_out, 1);
        assert_eq!(report.delivered, 1);
    }

    #[tokio::test]
    async fn test_started_dispatcher_drains_and_stops() {
        let (queue, receiver) = NotificationQueue::channel(4);
        let handle = NotificationDispatcher::new(
            ScriptedNotifier::default(),
            receiver,
            DispatcherConfig::default(),
        )
        .start();

        assert!(queue.enqueue(notice(&["erin@example.com"])));
        drop(queue);

        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("dispatcher should stop once the queue is closed")
            .unwrap();
    }
}
