//!
//! RabbitMQ connection and consumers that survive broker restarts.
//!

pub mod connection;
pub mod consumer;

mod retry;

pub use connection::{RabbitmqConnection, RabbitmqConnectionConfig};
pub use consumer::{ConsumeError, RabbitmqConsumer, RabbitmqConsumerDeliveryCallback};
