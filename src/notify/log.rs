//! Log Notifier
//!
//! Writes messages to the trace log instead of sending them. Used when no
//! SMTP relay is configured.

use super::{Notifier, NotifyError, OutboundMessage};

#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    async fn deliver(&self, message: &OutboundMessage) -> Result<(), NotifyError> {
        tracing::info!(
            recipient = %message.recipient,
            subject = %message.subject,
            body = %message.body,
            "SMTP not configured, logging notification instead of sending"
        );
        Ok(())
    }
}
