use super::{
    async_consumer::DeliveryConsumer, channel_callback::ConsumerChannelCallback,
    RabbitmqConsumerDeliveryCallback,
};
use crate::connection::RabbitmqConnection;
use amqprs::{
    channel::{
        BasicCancelArguments, BasicConsumeArguments, Channel, ExchangeDeclareArguments,
        QueueBindArguments, QueueDeclareArguments,
    },
    connection::Connection,
};
use std::sync::Arc;
use tokio::{
    sync::{watch, Notify},
    task::JoinHandle,
};

///
/// Consumer that declares exchange, queue and bindings
/// and keeps consuming the queue until it is closed.
///
/// Whenever connection is restored or server cancels the consumer
/// the whole topology is declared again on a new channel.
///
pub struct RabbitmqConsumer {
    task_handle: JoinHandle<()>,
    close_notify: Arc<Notify>,
}

impl RabbitmqConsumer {
    #[tracing::instrument(name = "RabbitMQ Consumer", skip_all)]
    pub async fn new<DeliveryCallback>(
        rabbitmq_connection: RabbitmqConnection,
        mut exchange_declare_args: ExchangeDeclareArguments,
        mut queue_declare_args: QueueDeclareArguments,
        mut queue_bind_args: Vec<QueueBindArguments>,
        mut basic_consume_args: BasicConsumeArguments,
        delivery_callback: DeliveryCallback,
    ) -> anyhow::Result<Self>
    where
        DeliveryCallback: RabbitmqConsumerDeliveryCallback + Send + Sync + 'static,
    {
        tracing::info!("starting consumer");

        exchange_declare_args.no_wait = false;
        queue_declare_args.no_wait(false);
        for args in queue_bind_args.iter_mut() {
            args.no_wait = false;
        }
        basic_consume_args.no_ack = false;
        basic_consume_args.no_wait = false;

        let mut connection_rx = rabbitmq_connection.connection();
        let Some(connection) = connection_rx.borrow_and_update().clone() else {
            anyhow::bail!("connection failed before creating consumer");
        };

        let mut subscription = Subscription {
            rabbitmq_connection,
            connection_rx,
            exchange_declare_args,
            queue_declare_args,
            queue_bind_args,
            basic_consume_args,
            delivery_callback: Arc::new(delivery_callback),
            channel: None,
            consumer_tag: String::new(),
            consumer_cancelled: Arc::new(Notify::new()),
        };
        subscription.subscribe(&connection).await?;

        let close_notify = Arc::new(Notify::new());
        let close_notify_clone = Arc::clone(&close_notify);
        let task_handle = tokio::spawn(subscription.run(close_notify_clone));

        tracing::info!("consumer started");

        Ok(Self {
            task_handle,
            close_notify,
        })
    }

    pub async fn close(self) {
        tracing::info!("closing consumer");

        self.close_notify.notify_one();
        if let Err(err) = self.task_handle.await {
            tracing::warn!(%err, "consumer task failed");
        }

        tracing::info!("consumer closed");
    }
}

struct Subscription<DeliveryCallback> {
    rabbitmq_connection: RabbitmqConnection,
    connection_rx: watch::Receiver<Option<Connection>>,

    exchange_declare_args: ExchangeDeclareArguments,
    queue_declare_args: QueueDeclareArguments,
    queue_bind_args: Vec<QueueBindArguments>,
    basic_consume_args: BasicConsumeArguments,
    delivery_callback: Arc<DeliveryCallback>,

    channel: Option<Channel>,
    consumer_tag: String,
    consumer_cancelled: Arc<Notify>,
}

impl<DeliveryCallback> Subscription<DeliveryCallback>
where
    DeliveryCallback: RabbitmqConsumerDeliveryCallback + Send + Sync + 'static,
{
    #[tracing::instrument(name = "RabbitMQ Consumer", skip_all)]
    async fn run(mut self, stop: Arc<Notify>) {
        tokio::select! {
            biased;

            _ = stop.notified() => {}
            _ = self.keep_consuming() => {}
        }

        let Some(channel) = self.channel.take() else {
            return;
        };

        let args = BasicCancelArguments::new(&self.consumer_tag);
        match channel.basic_cancel(args).await {
            Ok(_) => tracing::info!("consumer cancelled"),
            Err(err) => tracing::warn!(%err, "cancelling consumer failed"),
        }
        match channel.close().await {
            Ok(()) => tracing::info!("channel closed"),
            Err(err) => tracing::warn!(%err, "closing channel failed"),
        }
    }

    async fn keep_consuming(&mut self) {
        loop {
            let consumer_cancelled = Arc::clone(&self.consumer_cancelled);

            tokio::select! {
                biased;

                changed = self.connection_rx.changed() => {
                    if changed.is_err() {
                        tracing::error!("connection dropped, stopping consumer");
                        return;
                    }
                    tracing::info!("connection changed");
                }
                _ = consumer_cancelled.notified() => {
                    tracing::info!("restoring cancelled consumer");
                }
            }

            if let Some(channel) = self.channel.take() {
                // Channel is usually dead already
                let _ = channel.close().await;
            }

            if !self.restore().await {
                return;
            }
        }
    }

    ///
    /// Waits for a working connection and subscribes again.
    /// Returns false when connection was dropped.
    ///
    async fn restore(&mut self) -> bool {
        let retry_interval = self.rabbitmq_connection.config().retry_interval;

        loop {
            let connection = self.connection_rx.borrow_and_update().clone();
            let Some(connection) = connection else {
                if self.connection_rx.changed().await.is_err() {
                    return false;
                }
                continue;
            };

            match self.subscribe(&connection).await {
                Ok(()) => {
                    tracing::info!("consumer restored");
                    return true;
                }
                Err(err) => {
                    tracing::warn!(%err, "failed to restore consumer");
                    tokio::time::sleep(retry_interval).await;
                }
            }
        }
    }

    async fn subscribe(&mut self, connection: &Connection) -> Result<(), amqprs::error::Error> {
        let channel = connection.open_channel(None).await?;

        let consumer_cancelled = Arc::new(Notify::new());
        let channel_callback = ConsumerChannelCallback::new(Arc::clone(&consumer_cancelled));
        channel.register_callback(channel_callback).await?;

        tracing::debug!("declaring exchange");
        channel
            .exchange_declare(self.exchange_declare_args.clone())
            .await?;

        tracing::debug!("declaring queue");
        channel
            .queue_declare(self.queue_declare_args.clone())
            .await?;

        tracing::debug!("binding queue");
        for args in self.queue_bind_args.iter() {
            channel.queue_bind(args.clone()).await?;
        }

        let consumer = DeliveryConsumer::new(Arc::clone(&self.delivery_callback));
        let consumer_tag = channel
            .basic_consume(consumer, self.basic_consume_args.clone())
            .await?;
        tracing::debug!(consumer_tag, "consuming");

        self.channel = Some(channel);
        self.consumer_tag = consumer_tag;
        self.consumer_cancelled = consumer_cancelled;

        Ok(())
    }
}
