use super::ApplicationEnv;
use crate::{
    dto::ChannelType,
    repository::{
        NotificationFrequenciesRepositoryImpl, NotificationsRepositoryImpl,
        UserPreferencesRepositoryImpl,
    },
    service::{
        dispatch_service::DispatchServiceImpl,
        duplicate_detection_service::{
            DuplicateDetectionServiceConfig, DuplicateDetectionServiceImpl,
        },
        notifications_consumer_service::{
            NotificationQueueConfig, NotificationsConsumerService,
            NotificationsConsumerServiceConfig,
        },
        notifications_service::{NotificationsService, NotificationsServiceImpl},
        preferences_service::{PreferencesService, PreferencesServiceImpl},
        provider::{
            MandrillEmailProviderConfig, ProviderRegistry, ProviderRegistryConfig,
            SmtpEmailProviderConfig,
        },
        rate_limit_service::{RateLimitService, RateLimitServiceConfig, RateLimitServiceImpl},
    },
};
use amqprs::connection::OpenConnectionArguments;
use axum::extract::FromRef;
use mongodb::{options::ClientOptions, Client};
use rabbitmq_client::{RabbitmqConnection, RabbitmqConnectionConfig};
use std::sync::Arc;

#[derive(Clone, FromRef)]
pub struct ApplicationState {
    pub notifications_service: Arc<dyn NotificationsService>,
    pub rate_limit_service: Arc<dyn RateLimitService>,
    pub preferences_service: Arc<dyn PreferencesService>,
}

pub struct ApplicationStateToClose {
    pub db_client: Client,
    pub rabbitmq_connection: RabbitmqConnection,
    pub rabbitmq_consumer_service: NotificationsConsumerService,
}

pub async fn create_state(
    env: &ApplicationEnv,
) -> anyhow::Result<(ApplicationState, ApplicationStateToClose)> {
    tracing::info!("connecting to database");
    let db_client_options = ClientOptions::parse(&env.db_connection_string).await?;
    let db_client = Client::with_options(db_client_options)?;
    let db = db_client.database(&env.db_name);

    tracing::info!("creating repositories");
    let notifications_repository = NotificationsRepositoryImpl::new(db.clone()).await?;
    let notifications_repository = Arc::new(notifications_repository);
    let notification_frequencies_repository =
        NotificationFrequenciesRepositoryImpl::new(db.clone()).await?;
    let notification_frequencies_repository = Arc::new(notification_frequencies_repository);
    let user_preferences_repository = UserPreferencesRepositoryImpl::new(db).await?;
    let user_preferences_repository = Arc::new(user_preferences_repository);

    tracing::info!("creating services");
    let notifications_service = NotificationsServiceImpl::new(notifications_repository.clone());
    let notifications_service = Arc::new(notifications_service);

    let config = DuplicateDetectionServiceConfig {
        deduplication_window: env.deduplication_window,
    };
    let duplicate_detection_service =
        DuplicateDetectionServiceImpl::new(config, notifications_repository.clone());
    let duplicate_detection_service = Arc::new(duplicate_detection_service);

    let preferences_service = PreferencesServiceImpl::new(user_preferences_repository);
    let preferences_service = Arc::new(preferences_service);

    let config = RateLimitServiceConfig {
        min_interval: env.min_interval,
        max_daily_notifications: env.max_daily_notifications,
    };
    let rate_limit_service =
        RateLimitServiceImpl::new(config, notification_frequencies_repository);
    let rate_limit_service = Arc::new(rate_limit_service);

    tracing::info!("creating providers");
    let config = ProviderRegistryConfig {
        email_provider: env.email_provider,
        smtp: SmtpEmailProviderConfig {
            host: env.smtp_host.clone(),
            port: env.smtp_port,
            username: env.smtp_username.clone(),
            password: env.smtp_password.clone(),
            from: env.smtp_from.clone(),
            timeout: env.provider_timeout,
        },
        mandrill: MandrillEmailProviderConfig {
            api_key: env.mailchimp_api_key.clone(),
            from_email: env.mailchimp_from_email.clone(),
            from_name: env.mailchimp_from_name.clone(),
            timeout: env.provider_timeout,
        },
    };
    let provider_registry = ProviderRegistry::from_config(config)?;

    let dispatch_service = DispatchServiceImpl::new(
        notifications_repository,
        duplicate_detection_service,
        preferences_service.clone(),
        rate_limit_service.clone(),
        provider_registry,
    );
    let dispatch_service = Arc::new(dispatch_service);

    tracing::info!("connecting to rabbitmq");
    let config = RabbitmqConnectionConfig {
        retry_interval: env.rabbitmq_retry_interval,
    };
    let open_connection_args =
        OpenConnectionArguments::try_from(env.rabbitmq_connection_string.as_str())?;
    let rabbitmq_connection = RabbitmqConnection::new(config, open_connection_args).await?;

    let config = NotificationsConsumerServiceConfig {
        exchange: env.rabbitmq_exchange_name.clone(),
        queues: vec![
            NotificationQueueConfig {
                channel_type: ChannelType::Email,
                queue: env.rabbitmq_email_queue_name.clone(),
                routing_key: env.rabbitmq_email_routing_key.clone(),
            },
            NotificationQueueConfig {
                channel_type: ChannelType::Sms,
                queue: env.rabbitmq_sms_queue_name.clone(),
                routing_key: env.rabbitmq_sms_routing_key.clone(),
            },
            NotificationQueueConfig {
                channel_type: ChannelType::Push,
                queue: env.rabbitmq_push_queue_name.clone(),
                routing_key: env.rabbitmq_push_routing_key.clone(),
            },
        ],
        requeue_failed: env.rabbitmq_requeue_failed,
    };
    let rabbitmq_consumer_service = NotificationsConsumerService::new(
        config,
        rabbitmq_connection.clone(),
        dispatch_service,
    )
    .await?;

    Ok((
        ApplicationState {
            notifications_service,
            rate_limit_service,
            preferences_service,
        },
        ApplicationStateToClose {
            db_client,
            rabbitmq_connection,
            rabbitmq_consumer_service,
        },
    ))
}
