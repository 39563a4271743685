use super::{
    connection_callback::RabbitmqConnectionCallback, state_machine::ConnectionStateMachine,
    RabbitmqConnectionConfig,
};
use amqprs::connection::{Connection, OpenConnectionArguments};
use std::sync::Arc;
use tokio::{
    sync::{watch, Notify},
    task::JoinHandle,
};

///
/// RabbitMQ connection.
/// Background task recreates the connection whenever network io failure occurs.
///
/// Current connection is published by [Self::connection]. It is `None`
/// while the connection is being restored.
///
#[derive(Clone)]
pub struct RabbitmqConnection {
    inner: Arc<Inner>,
}

struct Inner {
    config: RabbitmqConnectionConfig,

    connection_rx: watch::Receiver<Option<Connection>>,

    keep_alive_handle: JoinHandle<()>,
    close_notify: Arc<Notify>,
}

impl RabbitmqConnection {
    #[tracing::instrument(name = "RabbitMQ Connection", skip_all)]
    pub async fn new(
        config: RabbitmqConnectionConfig,
        open_connection_args: OpenConnectionArguments,
    ) -> Result<Self, amqprs::error::Error> {
        tracing::info!("opening connection");
        let connection = Connection::open(&open_connection_args).await?;

        let callback = RabbitmqConnectionCallback;
        connection.register_callback(callback.clone()).await?;

        let (connection_tx, connection_rx) = watch::channel(Some(connection.clone()));
        let mut state_machine = ConnectionStateMachine::new(
            config.clone(),
            open_connection_args,
            callback,
            connection,
            connection_tx,
        );

        let close_notify = Arc::new(Notify::new());
        let close_notify_clone = Arc::clone(&close_notify);
        let keep_alive_handle = tokio::spawn(async move {
            tokio::select! {
                biased;

                _ = close_notify_clone.notified() => {}
                _ = state_machine.run() => {}
            }
        });

        tracing::info!("connection opened");

        Ok(Self {
            inner: Arc::new(Inner {
                config,
                connection_rx,
                keep_alive_handle,
                close_notify,
            }),
        })
    }

    ///
    /// Close underlying connection and task that recreates it.
    ///
    /// ### Errors
    /// Returns an error when it is not the last clone of the connection
    ///
    #[tracing::instrument(name = "RabbitMQ Connection", skip_all)]
    pub async fn close(self) -> anyhow::Result<()> {
        let Ok(inner) = Arc::try_unwrap(self.inner) else {
            anyhow::bail!("closing connection when connection clones exist is forbidden");
        };

        inner.close_notify.notify_one();
        if let Err(err) = inner.keep_alive_handle.await {
            tracing::warn!(%err, "keep alive task failed");
        }

        let connection = inner.connection_rx.borrow().clone();
        match connection {
            Some(connection) => match connection.close().await {
                Ok(()) => tracing::info!("connection closed"),
                Err(err) => tracing::warn!(%err, "closing connection failed"),
            },
            None => tracing::info!("connection already closed"),
        }

        Ok(())
    }

    pub fn config(&self) -> &RabbitmqConnectionConfig {
        &self.inner.config
    }

    pub fn connection(&self) -> watch::Receiver<Option<Connection>> {
        self.inner.connection_rx.clone()
    }
}
