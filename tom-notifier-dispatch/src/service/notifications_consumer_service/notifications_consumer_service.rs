use super::NotificationsConsumerServiceConfig;
use crate::{
    dto::{input, ChannelType},
    error::Error,
    service::dispatch_service::DispatchService,
};
use amqprs::channel::{
    BasicConsumeArguments, ExchangeDeclareArguments, ExchangeType, QueueBindArguments,
    QueueDeclareArguments,
};
use axum::async_trait;
use rabbitmq_client::{
    ConsumeError, RabbitmqConnection, RabbitmqConsumer, RabbitmqConsumerDeliveryCallback,
};
use std::sync::Arc;
use time::OffsetDateTime;

///
/// Consumes notification requests from one queue per channel
/// and runs each of them through [DispatchService]
///
pub struct NotificationsConsumerService {
    rabbitmq_consumers: Vec<RabbitmqConsumer>,
}

impl NotificationsConsumerService {
    pub async fn new(
        config: NotificationsConsumerServiceConfig,
        rabbitmq_connection: RabbitmqConnection,
        dispatch_service: Arc<dyn DispatchService>,
    ) -> anyhow::Result<Self> {
        let mut rabbitmq_consumers = Vec::with_capacity(config.queues.len());

        for queue in config.queues.iter() {
            tracing::info!(
                channel = %queue.channel_type,
                queue = queue.queue.as_str(),
                routing_key = queue.routing_key.as_str(),
                "creating consumer"
            );

            let exchange_declare_args =
                ExchangeDeclareArguments::of_type(&config.exchange, ExchangeType::Topic)
                    .durable(true)
                    .finish();
            let queue_declare_args = QueueDeclareArguments::new(&queue.queue)
                .durable(true)
                .finish();
            let queue_bind_args =
                QueueBindArguments::new(&queue.queue, &config.exchange, &queue.routing_key);
            let basic_consume_args = BasicConsumeArguments::new(&queue.queue, "")
                .auto_ack(false)
                .finish();
            let callback = NotificationDeliveryCallback {
                channel_type: queue.channel_type,
                requeue_failed: config.requeue_failed,
                dispatch_service: Arc::clone(&dispatch_service),
            };

            let rabbitmq_consumer = RabbitmqConsumer::new(
                rabbitmq_connection.clone(),
                exchange_declare_args,
                queue_declare_args,
                vec![queue_bind_args],
                basic_consume_args,
                callback,
            )
            .await?;
            rabbitmq_consumers.push(rabbitmq_consumer);
        }

        Ok(Self { rabbitmq_consumers })
    }

    pub async fn close(self) {
        for rabbitmq_consumer in self.rabbitmq_consumers {
            rabbitmq_consumer.close().await;
        }
    }
}

struct NotificationDeliveryCallback {
    channel_type: ChannelType,
    requeue_failed: bool,
    dispatch_service: Arc<dyn DispatchService>,
}

#[async_trait]
impl RabbitmqConsumerDeliveryCallback for NotificationDeliveryCallback {
    #[tracing::instrument(
        name = "Notifications Consumer",
        skip_all,
        fields(
            channel = %self.channel_type,
        )
    )]
    async fn execute(&self, content: Vec<u8>) -> Result<(), ConsumeError> {
        tracing::info!("processing notification request");

        let request = match decode_request(self.channel_type, &content) {
            Ok(request) => request,
            Err(err) => {
                tracing::warn!(%err, "rejecting invalid notification request");
                return Err(ConsumeError { requeue: false });
            }
        };

        match self
            .dispatch_service
            .dispatch(request, OffsetDateTime::now_utc())
            .await
        {
            Ok(notification) => {
                tracing::info!(status = %notification.status, "notification request processed");
                Ok(())
            }
            Err(Error::Validation(err)) => {
                tracing::warn!(%err, "rejecting invalid notification request");
                Err(ConsumeError { requeue: false })
            }
            Err(err) => {
                tracing::warn!(%err, requeue = self.requeue_failed, "dispatch failed");
                Err(ConsumeError {
                    requeue: self.requeue_failed,
                })
            }
        }
    }
}

///
/// Email and sms requests are JSON objects.
/// Push request is a JSON string or raw text holding JSON object.
///
fn decode_request(
    channel_type: ChannelType,
    content: &[u8],
) -> Result<input::NotificationRequest, Error> {
    let request = match channel_type {
        ChannelType::Email => {
            let email = serde_json::from_slice::<input::EmailRequest>(content)
                .map_err(|err| Error::Validation(format!("invalid email request: {err}")))?;
            email.validate()?;
            input::NotificationRequest::Email(email)
        }
        ChannelType::Sms => {
            let sms = serde_json::from_slice::<input::SmsRequest>(content)
                .map_err(|err| Error::Validation(format!("invalid sms request: {err}")))?;
            sms.validate()?;
            input::NotificationRequest::Sms(sms)
        }
        ChannelType::Push => {
            let message = match serde_json::from_slice::<String>(content) {
                Ok(message) => message,
                Err(_) => String::from_utf8(content.to_vec())
                    .map_err(|err| Error::Validation(format!("invalid push request: {err}")))?,
            };
            input::NotificationRequest::Push(input::PushRequest::parse(&message)?)
        }
    };

    Ok(request)
}
