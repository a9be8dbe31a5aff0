//! Email delivery port.

use crate::error::EmailError;

#[async_trait::async_trait]
pub trait EmailService: Send + Sync + 'static {
    /// Sends a plain-text message.
    ///
    /// Returns the recipients that could not be delivered to; an empty list
    /// means full success.
    async fn send(
        &self,
        subject: &str,
        recipient: &str,
        body: &str,
    ) -> Result<Vec<String>, EmailError>;
}
