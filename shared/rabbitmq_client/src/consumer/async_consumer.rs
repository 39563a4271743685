use super::{ConsumeError, RabbitmqConsumerDeliveryCallback};
use amqprs::{
    channel::{BasicAckArguments, BasicNackArguments, Channel},
    consumer::AsyncConsumer,
    AmqpDeliveryTag, BasicProperties, Deliver,
};
use async_trait::async_trait;
use std::sync::Arc;

///
/// Adapter that runs [RabbitmqConsumerDeliveryCallback]
/// for every delivery in its own task and responds with ack/nack
///
pub struct DeliveryConsumer<DeliveryCallback> {
    delivery_callback: Arc<DeliveryCallback>,
}

impl<DeliveryCallback> DeliveryConsumer<DeliveryCallback> {
    pub fn new(delivery_callback: Arc<DeliveryCallback>) -> Self {
        Self { delivery_callback }
    }
}

#[async_trait]
impl<DeliveryCallback> AsyncConsumer for DeliveryConsumer<DeliveryCallback>
where
    DeliveryCallback: RabbitmqConsumerDeliveryCallback + Send + Sync + 'static,
{
    async fn consume(
        &mut self,
        channel: &Channel,
        deliver: Deliver,
        _basic_properties: BasicProperties,
        content: Vec<u8>,
    ) {
        let delivery_tag = deliver.delivery_tag();
        tracing::debug!(delivery_tag, "received delivery");

        tokio::spawn(process_delivery(
            channel.clone(),
            Arc::clone(&self.delivery_callback),
            delivery_tag,
            content,
        ));
    }
}

#[tracing::instrument(name = "RabbitMQ Delivery", skip(channel, delivery_callback, content))]
async fn process_delivery<DeliveryCallback>(
    channel: Channel,
    delivery_callback: Arc<DeliveryCallback>,
    delivery_tag: AmqpDeliveryTag,
    content: Vec<u8>,
) where
    DeliveryCallback: RabbitmqConsumerDeliveryCallback + Send + Sync + 'static,
{
    match delivery_callback.execute(content).await {
        Ok(()) => {
            let args = BasicAckArguments::new(delivery_tag, false);
            match channel.basic_ack(args).await {
                Ok(()) => tracing::trace!("ack sent"),
                Err(err) => tracing::warn!(%err, "failed to send ack"),
            }
        }
        Err(ConsumeError { requeue }) => {
            let args = BasicNackArguments::new(delivery_tag, false, requeue);
            match channel.basic_nack(args).await {
                Ok(()) => tracing::trace!(requeue, "nack sent"),
                Err(err) => tracing::warn!(requeue, %err, "failed to send nack"),
            }
        }
    }
}
