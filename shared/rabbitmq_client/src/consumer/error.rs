///
/// Returned by [super::RabbitmqConsumerDeliveryCallback]
/// when delivery has to be rejected
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsumeError {
    /// Whether server should put delivery back to the queue
    pub requeue: bool,
}
