//!
//! Module with tools that allow to consume messages from RabbitMQ queues
//!

mod async_consumer;
mod callback;
mod channel_callback;
mod error;
mod rabbitmq_consumer;

pub use callback::RabbitmqConsumerDeliveryCallback;
pub use error::ConsumeError;
pub use rabbitmq_consumer::RabbitmqConsumer;
