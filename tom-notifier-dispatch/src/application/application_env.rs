use crate::service::provider::EmailProviderKind;
use anyhow::anyhow;
use std::{net::SocketAddr, str::FromStr, time::Duration};

/// Counters live for one day so a longer interval never applies
const MAX_MIN_INTERVAL_SECONDS: u64 = 24 * 60 * 60;
const MAX_DEDUPLICATION_WINDOW_MINUTES: u64 = 366 * 24 * 60;

pub struct ApplicationEnv {
    pub log_directory: String,
    pub log_filename: String,

    pub bind_address: SocketAddr,

    pub db_connection_string: String,
    pub db_name: String,

    pub rabbitmq_connection_string: String,
    pub rabbitmq_retry_interval: Duration,
    pub rabbitmq_exchange_name: String,
    pub rabbitmq_email_queue_name: String,
    pub rabbitmq_email_routing_key: String,
    pub rabbitmq_sms_queue_name: String,
    pub rabbitmq_sms_routing_key: String,
    pub rabbitmq_push_queue_name: String,
    pub rabbitmq_push_routing_key: String,
    pub rabbitmq_requeue_failed: bool,

    pub min_interval: Duration,
    pub deduplication_window: Duration,
    pub max_daily_notifications: u32,

    pub email_provider: EmailProviderKind,
    pub smtp_host: Option<String>,
    pub smtp_port: u16,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    pub smtp_from: Option<String>,
    pub mailchimp_api_key: Option<String>,
    pub mailchimp_from_email: Option<String>,
    pub mailchimp_from_name: String,
    pub provider_timeout: Duration,
}

impl ApplicationEnv {
    pub fn parse() -> anyhow::Result<Self> {
        let log_directory = Self::env_var("TOM_NOTIFIER_DISPATCH_LOG_DIRECTORY")?;
        let log_filename = Self::env_var("TOM_NOTIFIER_DISPATCH_LOG_FILENAME")?;
        let bind_address = Self::env_var("TOM_NOTIFIER_DISPATCH_BIND_ADDRESS")?.parse()?;
        let db_connection_string = Self::env_var("TOM_NOTIFIER_DISPATCH_DB_CONNECTION_STRING")?;
        let db_name = Self::env_var("TOM_NOTIFIER_DISPATCH_DB_NAME")?;

        let rabbitmq_connection_string =
            Self::env_var("TOM_NOTIFIER_DISPATCH_RABBITMQ_CONNECTION_STRING")?;
        let rabbitmq_retry_interval =
            Self::env_var_parse_or("TOM_NOTIFIER_DISPATCH_RABBITMQ_RETRY_INTERVAL", 5)?;
        let rabbitmq_retry_interval = Duration::from_secs(rabbitmq_retry_interval);
        let rabbitmq_exchange_name = Self::env_var_or(
            "TOM_NOTIFIER_DISPATCH_RABBITMQ_EXCHANGE_NAME",
            "notification.exchange",
        );
        let rabbitmq_email_queue_name = Self::env_var_or(
            "TOM_NOTIFIER_DISPATCH_RABBITMQ_EMAIL_QUEUE_NAME",
            "notification.email.send.queue",
        );
        let rabbitmq_email_routing_key = Self::env_var_or(
            "TOM_NOTIFIER_DISPATCH_RABBITMQ_EMAIL_ROUTING_KEY",
            "notification.email.send",
        );
        let rabbitmq_sms_queue_name = Self::env_var_or(
            "TOM_NOTIFIER_DISPATCH_RABBITMQ_SMS_QUEUE_NAME",
            "notification.sms.send.queue",
        );
        let rabbitmq_sms_routing_key = Self::env_var_or(
            "TOM_NOTIFIER_DISPATCH_RABBITMQ_SMS_ROUTING_KEY",
            "notification.sms.send",
        );
        let rabbitmq_push_queue_name = Self::env_var_or(
            "TOM_NOTIFIER_DISPATCH_RABBITMQ_PUSH_QUEUE_NAME",
            "notification.push.send.queue",
        );
        let rabbitmq_push_routing_key = Self::env_var_or(
            "TOM_NOTIFIER_DISPATCH_RABBITMQ_PUSH_ROUTING_KEY",
            "notification.push.send",
        );
        let rabbitmq_requeue_failed =
            Self::env_var_parse_or("TOM_NOTIFIER_DISPATCH_RABBITMQ_REQUEUE_FAILED", false)?;

        let min_interval =
            Self::env_var_parse_or("TOM_NOTIFIER_DISPATCH_MIN_INTERVAL_SECONDS", 2)?;
        if min_interval > MAX_MIN_INTERVAL_SECONDS {
            anyhow::bail!(
                "environment variable TOM_NOTIFIER_DISPATCH_MIN_INTERVAL_SECONDS \
                must not exceed {MAX_MIN_INTERVAL_SECONDS}"
            );
        }
        let min_interval = Duration::from_secs(min_interval);
        let deduplication_window: u64 =
            Self::env_var_parse_or("TOM_NOTIFIER_DISPATCH_DEDUPLICATION_WINDOW_MINUTES", 30)?;
        let deduplication_window = deduplication_window
            .checked_mul(60)
            .filter(|_| deduplication_window <= MAX_DEDUPLICATION_WINDOW_MINUTES)
            .map(Duration::from_secs)
            .ok_or_else(|| {
                anyhow!(
                    "environment variable TOM_NOTIFIER_DISPATCH_DEDUPLICATION_WINDOW_MINUTES \
                    must not exceed {MAX_DEDUPLICATION_WINDOW_MINUTES}"
                )
            })?;
        let max_daily_notifications =
            Self::env_var_parse_or("TOM_NOTIFIER_DISPATCH_MAX_DAILY_NOTIFICATIONS", 500)?;

        let email_provider = match Self::env_var_optional("TOM_NOTIFIER_DISPATCH_EMAIL_PROVIDER") {
            Some(email_provider) => EmailProviderKind::from_str(&email_provider)
                .map_err(|_| anyhow!("unknown email provider '{email_provider}'"))?,
            None => EmailProviderKind::default(),
        };
        let smtp_host = Self::env_var_optional("TOM_NOTIFIER_DISPATCH_SMTP_HOST");
        let smtp_port = Self::env_var_parse_or("TOM_NOTIFIER_DISPATCH_SMTP_PORT", 587)?;
        let smtp_username = Self::env_var_optional("TOM_NOTIFIER_DISPATCH_SMTP_USERNAME");
        let smtp_password = Self::env_var_optional("TOM_NOTIFIER_DISPATCH_SMTP_PASSWORD");
        let smtp_from = Self::env_var_optional("TOM_NOTIFIER_DISPATCH_SMTP_FROM");
        let mailchimp_api_key = Self::env_var_optional("TOM_NOTIFIER_DISPATCH_MAILCHIMP_API_KEY");
        let mailchimp_from_email =
            Self::env_var_optional("TOM_NOTIFIER_DISPATCH_MAILCHIMP_FROM_EMAIL");
        let mailchimp_from_name =
            Self::env_var_or("TOM_NOTIFIER_DISPATCH_MAILCHIMP_FROM_NAME", "Tom Notifier");
        let provider_timeout =
            Self::env_var_parse_or("TOM_NOTIFIER_DISPATCH_PROVIDER_TIMEOUT", 30)?;
        let provider_timeout = Duration::from_secs(provider_timeout);

        Ok(Self {
            log_directory,
            log_filename,
            bind_address,
            db_connection_string,
            db_name,
            rabbitmq_connection_string,
            rabbitmq_retry_interval,
            rabbitmq_exchange_name,
            rabbitmq_email_queue_name,
            rabbitmq_email_routing_key,
            rabbitmq_sms_queue_name,
            rabbitmq_sms_routing_key,
            rabbitmq_push_queue_name,
            rabbitmq_push_routing_key,
            rabbitmq_requeue_failed,
            min_interval,
            deduplication_window,
            max_daily_notifications,
            email_provider,
            smtp_host,
            smtp_port,
            smtp_username,
            smtp_password,
            smtp_from,
            mailchimp_api_key,
            mailchimp_from_email,
            mailchimp_from_name,
            provider_timeout,
        })
    }

    fn env_var(name: &'static str) -> anyhow::Result<String> {
        std::env::var(name).map_err(|_| anyhow!("environment variable {name} not set"))
    }

    /// Empty value is treated as not set
    fn env_var_optional(name: &'static str) -> Option<String> {
        std::env::var(name)
            .ok()
            .filter(|value| !value.trim().is_empty())
    }

    fn env_var_or(name: &'static str, default: &str) -> String {
        Self::env_var_optional(name).unwrap_or_else(|| default.to_string())
    }

    fn env_var_parse_or<T>(name: &'static str, default: T) -> anyhow::Result<T>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match Self::env_var_optional(name) {
            Some(value) => value
                .parse()
                .map_err(|err| anyhow!("environment variable {name} is invalid: {err}")),
            None => Ok(default),
        }
    }
}
