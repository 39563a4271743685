use amqprs::connection::{Connection, OpenConnectionArguments};
use rabbitmq_client::{RabbitmqConnection, RabbitmqConnectionConfig};
use std::time::Duration;
use tracing::level_filters::LevelFilter;

pub fn init_test_environment() {
    // .env file is optional as long as env variables are set
    let _ = dotenvy::dotenv();

    let _ = tracing_subscriber::fmt()
        .with_max_level(LevelFilter::TRACE)
        .with_target(false)
        .with_test_writer()
        .try_init();
}

pub async fn create_connection() -> Connection {
    let uri = std::env::var("TEST_RABBITMQ_CONNECTION_URI").unwrap();
    let args = OpenConnectionArguments::try_from(uri.as_str()).unwrap();

    Connection::open(&args).await.unwrap()
}

pub async fn create_rabbitmq_connection() -> RabbitmqConnection {
    let uri = std::env::var("TEST_RABBITMQ_CONNECTION_URI").unwrap();

    let config = RabbitmqConnectionConfig {
        retry_interval: Duration::from_secs(1),
    };
    let args = OpenConnectionArguments::try_from(uri.as_str()).unwrap();

    RabbitmqConnection::new(config, args).await.unwrap()
}
