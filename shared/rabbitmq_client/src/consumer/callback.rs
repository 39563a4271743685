use super::ConsumeError;
use async_trait::async_trait;

///
/// Callback executed whenever delivery is received.
///
/// Each delivery is processed in a separate tokio task.
/// Delivery is acked when callback returns Ok
/// and nacked when it returns [ConsumeError].
///
#[async_trait]
pub trait RabbitmqConsumerDeliveryCallback {
    async fn execute(&self, content: Vec<u8>) -> Result<(), ConsumeError>;
}
