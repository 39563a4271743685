use crate::dto::ChannelType;

pub struct NotificationsConsumerServiceConfig {
    /// Topic exchange all queues are bound to
    pub exchange: String,
    pub queues: Vec<NotificationQueueConfig>,
    /// Whether deliveries that failed on provider or store go back to the queue
    pub requeue_failed: bool,
}

pub struct NotificationQueueConfig {
    pub channel_type: ChannelType,
    pub queue: String,
    pub routing_key: String,
}
