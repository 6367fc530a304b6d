// Notification fan-out - best-effort side messages, never the command's failure

use std::sync::Arc;

use tracing::warn;

use crate::console::transport::ChatTransport;

/// Sends the side messages around a command: the creator alert on new
/// registrations and the target notice on role changes. Every send is
/// fire-and-forget relative to the registry mutation that triggered it;
/// a failed delivery is logged and the persisted state stands.
pub struct Notifier {
    transport: Arc<dyn ChatTransport>,
    creator_id: String,
}

impl Notifier {
    pub fn new(transport: Arc<dyn ChatTransport>, creator_id: String) -> Self {
        Self {
            transport,
            creator_id,
        }
    }

    /// Alert the creator. Attempted independently of any other send.
    pub async fn creator_alert(&self, text: &str) {
        if let Err(e) = self.transport.send_message(&self.creator_id, text).await {
            warn!("creator notification failed: {}", e);
        }
    }

    /// Notify an affected principal of its new state.
    pub async fn principal_notice(&self, principal_id: &str, text: &str) {
        if let Err(e) = self.transport.send_message(principal_id, text).await {
            warn!(principal = principal_id, "principal notification failed: {}", e);
        }
    }
}
