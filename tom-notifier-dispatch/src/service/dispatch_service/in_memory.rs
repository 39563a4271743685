//!
//! Stateful in-memory stores for multi-step dispatch scenarios
//!

use super::{DispatchService, DispatchServiceImpl};
use crate::{
    dto::{input, ChannelType},
    error::Error,
    repository::{
        self, Notification, NotificationFrequenciesRepository, NotificationFrequency,
        NotificationStatus, NotificationsRepository, UserPreference, UserPreferencesRepository,
    },
    service::{
        duplicate_detection_service::{
            DuplicateDetectionServiceConfig, DuplicateDetectionServiceImpl,
        },
        preferences_service::PreferencesServiceImpl,
        provider::{NotificationProvider, ProviderError, ProviderRegistry},
        rate_limit_service::{RateLimitServiceConfig, RateLimitServiceImpl},
    },
};
use axum::async_trait;
use bson::oid::ObjectId;
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};
use time::{Date, OffsetDateTime};

#[derive(Default)]
struct InMemoryNotificationsRepository {
    notifications: Mutex<Vec<Notification>>,
}

#[async_trait]
impl NotificationsRepository for InMemoryNotificationsRepository {
    async fn save(&self, notification: &Notification) -> Result<ObjectId, repository::Error> {
        let mut notifications = self.notifications.lock().unwrap();

        let id = notification.id.unwrap_or_else(ObjectId::new);
        let mut notification = notification.clone();
        notification.id = Some(id);

        match notifications.iter_mut().find(|saved| saved.id == Some(id)) {
            Some(saved) => *saved = notification,
            None => notifications.push(notification),
        }

        Ok(id)
    }

    async fn find_duplicates(
        &self,
        recipient_id: &str,
        channel_type: &str,
        content_hash: &str,
        since: OffsetDateTime,
    ) -> Result<Vec<Notification>, repository::Error> {
        let mut duplicates = self
            .notifications
            .lock()
            .unwrap()
            .iter()
            .filter(|notification| {
                notification.recipient_id == recipient_id
                    && notification.channel_type == channel_type
                    && notification.content_hash == content_hash
                    && notification.created_at >= since
            })
            .cloned()
            .collect::<Vec<_>>();
        duplicates.sort_by_key(|notification| notification.created_at);

        Ok(duplicates)
    }

    async fn find_many_by_recipient(
        &self,
        recipient_id: &str,
    ) -> Result<Vec<Notification>, repository::Error> {
        let mut notifications = self
            .notifications
            .lock()
            .unwrap()
            .iter()
            .filter(|notification| notification.recipient_id == recipient_id)
            .cloned()
            .collect::<Vec<_>>();
        notifications.sort_by_key(|notification| std::cmp::Reverse(notification.created_at));

        Ok(notifications)
    }

    async fn find_latest_by_recipient(
        &self,
        recipient_id: &str,
    ) -> Result<Option<Notification>, repository::Error> {
        let notifications = self.find_many_by_recipient(recipient_id).await?;

        Ok(notifications.into_iter().next())
    }
}

#[derive(Default)]
struct InMemoryNotificationFrequenciesRepository {
    frequencies: Mutex<Vec<NotificationFrequency>>,
}

#[async_trait]
impl NotificationFrequenciesRepository for InMemoryNotificationFrequenciesRepository {
    async fn find(
        &self,
        recipient_id: &str,
        channel_type: &str,
        date: Date,
    ) -> Result<Option<NotificationFrequency>, repository::Error> {
        let frequency = self
            .frequencies
            .lock()
            .unwrap()
            .iter()
            .find(|frequency| {
                frequency.recipient_id == recipient_id
                    && frequency.channel_type == channel_type
                    && frequency.date == date
            })
            .cloned();

        Ok(frequency)
    }

    async fn find_many(
        &self,
        recipient_id: &str,
        date: Date,
    ) -> Result<Vec<NotificationFrequency>, repository::Error> {
        let frequencies = self
            .frequencies
            .lock()
            .unwrap()
            .iter()
            .filter(|frequency| frequency.recipient_id == recipient_id && frequency.date == date)
            .cloned()
            .collect();

        Ok(frequencies)
    }

    async fn save(&self, frequency: &NotificationFrequency) -> Result<(), repository::Error> {
        let mut frequencies = self.frequencies.lock().unwrap();

        let saved = frequencies.iter_mut().find(|saved| {
            saved.recipient_id == frequency.recipient_id
                && saved.channel_type == frequency.channel_type
                && saved.date == frequency.date
        });
        match saved {
            Some(saved) => *saved = frequency.clone(),
            None => frequencies.push(frequency.clone()),
        }

        Ok(())
    }
}

#[derive(Default)]
struct InMemoryUserPreferencesRepository {
    preferences: Mutex<HashMap<String, UserPreference>>,
}

#[async_trait]
impl UserPreferencesRepository for InMemoryUserPreferencesRepository {
    async fn find(&self, recipient_id: &str) -> Result<Option<UserPreference>, repository::Error> {
        Ok(self.preferences.lock().unwrap().get(recipient_id).cloned())
    }

    async fn upsert(&self, preference: &UserPreference) -> Result<(), repository::Error> {
        self.preferences
            .lock()
            .unwrap()
            .insert(preference.recipient_id.clone(), preference.clone());

        Ok(())
    }

    async fn delete(&self, recipient_id: &str) -> Result<(), repository::Error> {
        self.preferences
            .lock()
            .unwrap()
            .remove(recipient_id)
            .map(|_| ())
            .ok_or(repository::Error::NoDocumentUpdated)
    }
}

#[derive(Default)]
struct FakeProvider {
    fail: AtomicBool,
    sent: AtomicUsize,
}

#[async_trait]
impl NotificationProvider for FakeProvider {
    fn name(&self) -> &'static str {
        "Fake"
    }

    fn is_configured(&self) -> bool {
        true
    }

    async fn send(&self, _request: &input::NotificationRequest) -> Result<(), ProviderError> {
        // gives concurrent runs a chance to interleave
        tokio::task::yield_now().await;

        if self.fail.load(Ordering::SeqCst) {
            return Err(ProviderError::Transport("unavailable".to_string()));
        }
        self.sent.fetch_add(1, Ordering::SeqCst);

        Ok(())
    }
}

struct Scenario {
    notifications: Arc<InMemoryNotificationsRepository>,
    frequencies: Arc<InMemoryNotificationFrequenciesRepository>,
    preferences: Arc<InMemoryUserPreferencesRepository>,
    provider: Arc<FakeProvider>,
    service: DispatchServiceImpl,
}

impl Scenario {
    fn new(min_interval: Duration, max_daily_notifications: u32) -> Self {
        let notifications = Arc::new(InMemoryNotificationsRepository::default());
        let frequencies = Arc::new(InMemoryNotificationFrequenciesRepository::default());
        let preferences = Arc::new(InMemoryUserPreferencesRepository::default());
        let provider = Arc::new(FakeProvider::default());

        let mut provider_registry = ProviderRegistry::default();
        for channel_type in [ChannelType::Email, ChannelType::Sms, ChannelType::Push] {
            provider_registry.register(channel_type, Arc::clone(&provider) as _);
        }

        let service = DispatchServiceImpl::new(
            Arc::clone(&notifications) as _,
            Arc::new(DuplicateDetectionServiceImpl::new(
                DuplicateDetectionServiceConfig {
                    deduplication_window: Duration::from_secs(30 * 60),
                },
                Arc::clone(&notifications) as _,
            )),
            Arc::new(PreferencesServiceImpl::new(Arc::clone(&preferences) as _)),
            Arc::new(RateLimitServiceImpl::new(
                RateLimitServiceConfig {
                    min_interval,
                    max_daily_notifications,
                },
                Arc::clone(&frequencies) as _,
            )),
            provider_registry,
        );

        Self {
            notifications,
            frequencies,
            preferences,
            provider,
            service,
        }
    }

    fn default_limits() -> Self {
        Self::new(Duration::from_secs(2), 500)
    }

    async fn daily_count(&self, recipient_id: &str, channel_type: &str, date: Date) -> i32 {
        self.frequencies
            .find(recipient_id, channel_type, date)
            .await
            .unwrap()
            .map(|frequency| frequency.daily_count)
            .unwrap_or(0)
    }
}

fn email(to: &str, subject: &str, body: &str) -> input::NotificationRequest {
    input::NotificationRequest::Email(input::EmailRequest {
        to: to.to_string(),
        cc: Vec::new(),
        bcc: Vec::new(),
        subject: subject.to_string(),
        body: body.to_string(),
        is_html: false,
        from: None,
        headers: Default::default(),
        attachments: Default::default(),
        template_id: None,
        template_data: Default::default(),
        reply_to: None,
    })
}

fn sms(phone: &str, message: &str) -> input::NotificationRequest {
    input::NotificationRequest::Sms(input::SmsRequest {
        phone: phone.to_string(),
        message: message.to_string(),
    })
}

mod test {
    use super::*;
    use time::macros::{date, datetime};

    const T0: OffsetDateTime = datetime!(2024-05-01 10:00:00 UTC);

    async fn status(
        scenario: &Scenario,
        request: input::NotificationRequest,
        now: OffsetDateTime,
    ) -> NotificationStatus {
        scenario.service.dispatch(request, now).await.unwrap().status
    }

    #[tokio::test]
    async fn duplicate_within_window_only() {
        let scenario = Scenario::default_limits();
        let request = email("alice@example.com", "Hello", "Body");

        let first = scenario.service.dispatch(request.clone(), T0).await.unwrap();
        let duplicate = scenario
            .service
            .dispatch(request.clone(), T0 + time::Duration::seconds(5))
            .await
            .unwrap();
        let after_window = status(&scenario, request, T0 + time::Duration::minutes(31)).await;

        assert_eq!(first.status, NotificationStatus::Delivered);
        assert_eq!(duplicate.status, NotificationStatus::Duplicate);
        assert_eq!(
            duplicate.response.unwrap().message,
            format!(
                "Duplicate of notification {} sent at 2024-05-01T10:00:00Z",
                first.id.unwrap().to_hex()
            )
        );
        assert_eq!(after_window, NotificationStatus::Delivered);
        assert_eq!(scenario.provider.sent.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn changed_body_is_not_duplicate() {
        let scenario = Scenario::default_limits();

        let first = status(&scenario, email("alice@example.com", "Hello", "Body"), T0).await;
        let second = status(
            &scenario,
            email("alice@example.com", "Hello", "Other body"),
            T0 + time::Duration::seconds(5),
        )
        .await;

        assert_eq!(first, NotificationStatus::Delivered);
        assert_eq!(second, NotificationStatus::Delivered);
    }

    #[tokio::test]
    async fn disabled_channel_blocked() {
        let scenario = Scenario::default_limits();
        scenario
            .preferences
            .upsert(&UserPreference {
                recipient_id: "alice@example.com".to_string(),
                channels: vec![repository::NotificationChannel {
                    channel_type: "email".to_string(),
                    token: None,
                    enabled: false,
                }],
            })
            .await
            .unwrap();

        let blocked = scenario
            .service
            .dispatch(email("alice@example.com", "Hello", "Body"), T0)
            .await
            .unwrap();
        let without_preference =
            status(&scenario, email("bob@example.com", "Hello", "Body"), T0).await;

        assert_eq!(blocked.status, NotificationStatus::Blocked);
        assert_eq!(
            blocked.response.unwrap().message,
            "Notification blocked by user preference for channel: email"
        );
        assert_eq!(without_preference, NotificationStatus::Delivered);
        assert_eq!(scenario.daily_count("alice@example.com", "email", T0.date()).await, 0);
    }

    #[tokio::test]
    async fn min_interval_blocks_until_passed() {
        let scenario = Scenario::default_limits();

        let first = status(&scenario, sms("+48123456789", "one"), T0).await;
        let too_soon = scenario
            .service
            .dispatch(sms("+48123456789", "two"), T0 + time::Duration::seconds(1))
            .await
            .unwrap();
        let after_interval = status(
            &scenario,
            sms("+48123456789", "three"),
            T0 + time::Duration::seconds(2),
        )
        .await;

        assert_eq!(first, NotificationStatus::Delivered);
        assert_eq!(too_soon.status, NotificationStatus::BlockedFrequency);
        let message = too_soon.response.unwrap().message;
        assert!(message.ends_with("Please wait 1 seconds."), "{message}");
        assert_eq!(after_interval, NotificationStatus::Delivered);
    }

    #[tokio::test]
    async fn daily_limit_resets_next_day() {
        let scenario = Scenario::new(Duration::from_secs(2), 2);
        let recipient = "+48123456789";

        let first = status(&scenario, sms(recipient, "one"), T0).await;
        assert_eq!(scenario.daily_count(recipient, "sms", date!(2024 - 05 - 01)).await, 1);
        let second = status(
            &scenario,
            sms(recipient, "two"),
            T0 + time::Duration::seconds(10),
        )
        .await;
        assert_eq!(scenario.daily_count(recipient, "sms", date!(2024 - 05 - 01)).await, 2);
        let third = scenario
            .service
            .dispatch(sms(recipient, "three"), T0 + time::Duration::seconds(20))
            .await
            .unwrap();
        let next_day = status(
            &scenario,
            sms(recipient, "four"),
            T0 + time::Duration::days(1),
        )
        .await;

        assert_eq!(first, NotificationStatus::Delivered);
        assert_eq!(second, NotificationStatus::Delivered);
        assert_eq!(third.status, NotificationStatus::BlockedDailyLimit);
        assert_eq!(
            third.response.unwrap().message,
            "Notification daily limit hit for +48123456789 on channel sms. \
            Max daily limit of 2 reached."
        );
        assert_eq!(next_day, NotificationStatus::Delivered);
        assert_eq!(scenario.daily_count(recipient, "sms", date!(2024 - 05 - 01)).await, 2);
        assert_eq!(scenario.daily_count(recipient, "sms", date!(2024 - 05 - 02)).await, 1);
    }

    #[tokio::test]
    async fn min_interval_resets_at_midnight() {
        let scenario = Scenario::default_limits();
        let recipient = "+48123456789";

        let before_midnight = status(
            &scenario,
            sms(recipient, "one"),
            datetime!(2024-05-01 23:59:59 UTC),
        )
        .await;
        let after_midnight = status(
            &scenario,
            sms(recipient, "two"),
            datetime!(2024-05-02 00:00:00 UTC),
        )
        .await;

        assert_eq!(before_midnight, NotificationStatus::Delivered);
        assert_eq!(after_midnight, NotificationStatus::Delivered);
        assert_eq!(scenario.daily_count(recipient, "sms", date!(2024 - 05 - 02)).await, 1);
    }

    #[tokio::test]
    async fn provider_failure_does_not_count() {
        let scenario = Scenario::default_limits();
        scenario.provider.fail.store(true, Ordering::SeqCst);

        let result = scenario
            .service
            .dispatch(email("alice@example.com", "Hello", "Body"), T0)
            .await;

        assert!(matches!(result, Err(Error::Provider(_))));
        let stored = scenario
            .notifications
            .find_latest_by_recipient("alice@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, NotificationStatus::Failed);
        assert_eq!(stored.delivery_attempts, 1);
        assert_eq!(scenario.daily_count("alice@example.com", "email", T0.date()).await, 0);

        // failed send neither counts as duplicate nor consumes min interval
        scenario.provider.fail.store(false, Ordering::SeqCst);
        let retried = status(&scenario, email("alice@example.com", "Hello", "Body"), T0).await;

        assert_eq!(retried, NotificationStatus::Delivered);
        assert_eq!(scenario.daily_count("alice@example.com", "email", T0.date()).await, 1);
    }

    #[tokio::test]
    async fn concurrent_identical_requests_deliver_once() {
        let scenario = Scenario::default_limits();
        let request = email("alice@example.com", "Hello", "Body");

        let (first, second) = tokio::join!(
            scenario.service.dispatch(request.clone(), T0),
            scenario.service.dispatch(request.clone(), T0),
        );

        let mut statuses = vec![first.unwrap().status, second.unwrap().status];
        statuses.sort_by_key(|status| status.to_string());
        assert_eq!(
            statuses,
            vec![NotificationStatus::Delivered, NotificationStatus::Duplicate]
        );
        assert_eq!(scenario.provider.sent.load(Ordering::SeqCst), 1);
        assert_eq!(scenario.daily_count("alice@example.com", "email", T0.date()).await, 1);
    }
}
