use super::{connection_callback::RabbitmqConnectionCallback, RabbitmqConnectionConfig};
use crate::retry::retry;
use amqprs::connection::{Connection, OpenConnectionArguments};
use tokio::sync::watch;

pub struct ConnectionStateMachine {
    config: RabbitmqConnectionConfig,
    open_connection_args: OpenConnectionArguments,
    callback: RabbitmqConnectionCallback,

    connection: Connection,
    connection_tx: watch::Sender<Option<Connection>>,
}

impl ConnectionStateMachine {
    pub fn new(
        config: RabbitmqConnectionConfig,
        open_connection_args: OpenConnectionArguments,
        callback: RabbitmqConnectionCallback,
        connection: Connection,
        connection_tx: watch::Sender<Option<Connection>>,
    ) -> Self {
        Self {
            config,
            open_connection_args,
            callback,
            connection,
            connection_tx,
        }
    }

    ///
    /// Infinite loop that keeps connection alive.
    /// It has to be stopped by an external signal.
    ///
    pub async fn run(&mut self) {
        loop {
            self.connection.listen_network_io_failure().await;
            tracing::warn!("connection broken");

            // Users must not open channels on the broken connection
            self.connection_tx.send_replace(None);

            self.restore().await;

            self.connection_tx
                .send_replace(Some(self.connection.clone()));
            tracing::info!("connection restored");
        }
    }

    async fn restore(&mut self) {
        loop {
            self.connection = retry(
                self.config.retry_interval,
                "opening connection",
                || async { Connection::open(&self.open_connection_args).await },
            )
            .await;

            // Connection may break again before the callback is registered
            let registered = tokio::select! {
                _ = self.connection.listen_network_io_failure() => false,
                _ = retry(
                    self.config.retry_interval,
                    "registering connection callback",
                    || async { self.connection.register_callback(self.callback.clone()).await },
                ) => true,
            };

            if registered {
                return;
            }

            tracing::warn!("connection broken while registering callback");
        }
    }
}
