use async_trait::async_trait;

use super::MessagingProvider;

/// Stand-in for an SMS gateway: writes outgoing messages to the log.
pub struct LogMessagingProvider;

#[async_trait]
impl MessagingProvider for LogMessagingProvider {
    async fn send_message(&self, to: &str, body: &str) -> anyhow::Result<()> {
        tracing::info!(to = %to, body = %body, "outgoing SMS");
        Ok(())
    }
}
