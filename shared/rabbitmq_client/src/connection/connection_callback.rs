use amqprs::{callbacks::ConnectionCallback, connection::Connection, Close};
use async_trait::async_trait;

///
/// Logs server side events of the connection
///
#[derive(Clone, Default)]
pub struct RabbitmqConnectionCallback;

#[async_trait]
impl ConnectionCallback for RabbitmqConnectionCallback {
    async fn close(
        &mut self,
        _connection: &Connection,
        close: Close,
    ) -> Result<(), amqprs::error::Error> {
        tracing::warn!(
            code = close.reply_code(),
            text = close.reply_text(),
            "connection closed by server",
        );

        Ok(())
    }

    async fn blocked(&mut self, _connection: &Connection, reason: String) {
        tracing::warn!(reason, "connection blocked");
    }

    async fn unblocked(&mut self, _connection: &Connection) {
        tracing::info!("connection unblocked");
    }
}
