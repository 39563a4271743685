use super::{recipient_locks::RecipientLocks, DispatchService};
use crate::{
    dto::{input, ChannelType},
    error::Error,
    repository::{Notification, NotificationStatus, NotificationsRepository},
    service::{
        duplicate_detection_service::DuplicateDetectionService,
        preferences_service::{ChannelPermission, PreferencesService},
        provider::{ProviderError, ProviderRegistry},
        rate_limit_service::{RateLimitDecision, RateLimitService},
    },
    util::content_fingerprint,
};
use axum::async_trait;
use std::sync::Arc;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

enum Clearance {
    Cleared,
    Rejected,
}

pub struct DispatchServiceImpl {
    notifications_repository: Arc<dyn NotificationsRepository>,
    duplicate_detection_service: Arc<dyn DuplicateDetectionService>,
    preferences_service: Arc<dyn PreferencesService>,
    rate_limit_service: Arc<dyn RateLimitService>,
    provider_registry: ProviderRegistry,
    recipient_locks: RecipientLocks,
}

impl DispatchServiceImpl {
    pub fn new(
        notifications_repository: Arc<dyn NotificationsRepository>,
        duplicate_detection_service: Arc<dyn DuplicateDetectionService>,
        preferences_service: Arc<dyn PreferencesService>,
        rate_limit_service: Arc<dyn RateLimitService>,
        provider_registry: ProviderRegistry,
    ) -> Self {
        Self {
            notifications_repository,
            duplicate_detection_service,
            preferences_service,
            rate_limit_service,
            provider_registry,
            recipient_locks: RecipientLocks::default(),
        }
    }

    fn pending_notification(
        request: &input::NotificationRequest,
        now: OffsetDateTime,
    ) -> Notification {
        let channel_type = request.channel_type();
        let content_hash = content_fingerprint(
            request.recipient_id(),
            channel_type.as_ref(),
            request.title(),
            request.body(),
        );

        Notification {
            id: None,
            recipient_id: request.recipient_id().to_string(),
            title: request.title().to_string(),
            body: request.body().to_string(),
            channel_type: channel_type.to_string(),
            status: NotificationStatus::Pending,
            delivery_attempts: 0,
            created_at: now,
            updated_at: now,
            content_hash,
            response: None,
        }
    }

    async fn save(&self, notification: &mut Notification) -> Result<(), Error> {
        let id = self.notifications_repository.save(notification).await?;
        notification.id = Some(id);

        Ok(())
    }

    async fn reject(
        &self,
        notification: &mut Notification,
        status: NotificationStatus,
        reason: String,
        now: OffsetDateTime,
    ) -> Result<Clearance, Error> {
        tracing::info!(%status, %reason, "notification rejected");

        notification.transition(status, now)?;
        notification.respond(false, reason, now);
        self.save(notification).await?;

        Ok(Clearance::Rejected)
    }

    ///
    /// Checks duplicates, preference and rate limits in this order.
    /// Notification that passed all of them is saved as PROCESSING.
    ///
    async fn pre_dispatch(
        &self,
        notification: &mut Notification,
        now: OffsetDateTime,
    ) -> Result<Clearance, Error> {
        let duplicate = self
            .duplicate_detection_service
            .find_duplicate(
                &notification.recipient_id,
                &notification.channel_type,
                &notification.content_hash,
                now,
            )
            .await?;
        if let Some(duplicate) = duplicate {
            let id = duplicate.id.map(|id| id.to_hex()).unwrap_or_default();
            let sent_at = duplicate
                .created_at
                .format(&Rfc3339)
                .unwrap_or_else(|_| duplicate.created_at.to_string());
            let reason = format!("Duplicate of notification {id} sent at {sent_at}");

            return self
                .reject(notification, NotificationStatus::Duplicate, reason, now)
                .await;
        }

        let permission = self
            .preferences_service
            .is_channel_allowed(&notification.recipient_id, &notification.channel_type)
            .await?;
        if let ChannelPermission::Blocked { reason } = permission {
            return self
                .reject(notification, NotificationStatus::Blocked, reason, now)
                .await;
        }

        let decision = self
            .rate_limit_service
            .check(&notification.recipient_id, &notification.channel_type, now)
            .await?;
        match decision {
            RateLimitDecision::Allowed => {}
            RateLimitDecision::TooFrequent { reason, .. } => {
                return self
                    .reject(notification, NotificationStatus::BlockedFrequency, reason, now)
                    .await;
            }
            RateLimitDecision::DailyLimitReached { reason, .. } => {
                return self
                    .reject(notification, NotificationStatus::BlockedDailyLimit, reason, now)
                    .await;
            }
        }

        notification.transition(NotificationStatus::Processing, now)?;
        self.save(notification).await?;

        Ok(Clearance::Cleared)
    }

    ///
    /// Marks notification as FAILED after store error.
    /// Saving is best-effort, notification already in terminal status stays as is.
    ///
    async fn fail_pre_dispatch(
        &self,
        notification: &mut Notification,
        err: &Error,
        now: OffsetDateTime,
    ) {
        tracing::error!(%err, status = %notification.status, "pre-dispatch failed");

        if notification.transition(NotificationStatus::Failed, now).is_err() {
            return;
        }
        notification.respond(false, format!("Pre-dispatch error: {err}"), now);

        if let Err(err) = self.save(notification).await {
            tracing::error!(%err, "failed to save FAILED notification");
        }
    }

    async fn send(
        &self,
        request: &input::NotificationRequest,
    ) -> Result<&'static str, ProviderError> {
        let channel_type = request.channel_type();
        let provider = self
            .provider_registry
            .provider(channel_type)
            .ok_or(ProviderError::MissingProvider(channel_type))?;

        if !provider.is_configured() {
            return Err(ProviderError::NotConfigured {
                provider: provider.name(),
            });
        }

        tracing::debug!(provider = provider.name(), "sending");
        provider.send(request).await?;

        Ok(provider.name())
    }

    async fn deliver(
        &self,
        notification: &mut Notification,
        request: &input::NotificationRequest,
        now: OffsetDateTime,
    ) -> Result<(), Error> {
        notification.delivery_attempts = 1;

        match self.send(request).await {
            Ok(provider_name) => {
                // Counted before saving, the message is already out
                if let Err(err) = self
                    .rate_limit_service
                    .record_send(&notification.recipient_id, &notification.channel_type, now)
                    .await
                {
                    tracing::error!(%err, "failed to record send");
                }

                let label = channel_label(request.channel_type());
                notification.transition(NotificationStatus::Delivered, now)?;
                notification.respond(
                    true,
                    format!("{label} sent successfully via {provider_name}."),
                    now,
                );
                self.save(notification).await?;
                tracing::info!(provider = provider_name, "notification delivered");

                Ok(())
            }
            Err(err) => {
                tracing::warn!(%err, "provider failed");

                notification.transition(NotificationStatus::Failed, now)?;
                notification.respond(false, format!("Provider error: {err}"), now);
                self.save(notification).await?;

                Err(Error::Provider(err))
            }
        }
    }
}

fn channel_label(channel_type: ChannelType) -> &'static str {
    match channel_type {
        ChannelType::Email => "Email",
        ChannelType::Sms => "SMS",
        ChannelType::Push => "Push notification",
    }
}

#[async_trait]
impl DispatchService for DispatchServiceImpl {
    #[tracing::instrument(
        name = "Dispatch",
        skip_all,
        fields(
            recipient_id = request.recipient_id(),
            channel = %request.channel_type(),
        )
    )]
    async fn dispatch(
        &self,
        request: input::NotificationRequest,
        now: OffsetDateTime,
    ) -> Result<Notification, Error> {
        let mut notification = Self::pending_notification(&request, now);

        let _guard = self
            .recipient_locks
            .lock(&notification.recipient_id, &notification.channel_type)
            .await;

        match self.pre_dispatch(&mut notification, now).await {
            Ok(Clearance::Cleared) => {}
            Ok(Clearance::Rejected) => return Ok(notification),
            Err(err) => {
                self.fail_pre_dispatch(&mut notification, &err, now).await;
                return Err(err);
            }
        }

        self.deliver(&mut notification, &request, now).await?;

        Ok(notification)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        repository::{self, MockNotificationsRepository},
        service::{
            duplicate_detection_service::MockDuplicateDetectionService,
            preferences_service::MockPreferencesService,
            provider::MockNotificationProvider,
            rate_limit_service::MockRateLimitService,
        },
    };
    use bson::oid::ObjectId;
    use mockall::predicate::{always, eq};
    use std::sync::Mutex;
    use time::macros::datetime;

    const NOW: OffsetDateTime = datetime!(2024-05-01 10:00:00 UTC);

    fn sms_request() -> input::NotificationRequest {
        input::NotificationRequest::Sms(input::SmsRequest {
            phone: "+48123456789".to_string(),
            message: "code 1234".to_string(),
        })
    }

    struct Mocks {
        notifications_repository: MockNotificationsRepository,
        duplicate_detection_service: MockDuplicateDetectionService,
        preferences_service: MockPreferencesService,
        rate_limit_service: MockRateLimitService,
        provider: Option<MockNotificationProvider>,
    }

    impl Mocks {
        ///
        /// Mocks passing every pre-dispatch check
        ///
        fn passing() -> Self {
            let mut duplicate_detection_service = MockDuplicateDetectionService::new();
            duplicate_detection_service
                .expect_find_duplicate()
                .returning(|_, _, _, _| Ok(None));

            let mut preferences_service = MockPreferencesService::new();
            preferences_service
                .expect_is_channel_allowed()
                .returning(|_, _| Ok(ChannelPermission::Allowed));

            let mut rate_limit_service = MockRateLimitService::new();
            rate_limit_service
                .expect_check()
                .returning(|_, _, _| Ok(RateLimitDecision::Allowed));

            Self {
                notifications_repository: MockNotificationsRepository::new(),
                duplicate_detection_service,
                preferences_service,
                rate_limit_service,
                provider: None,
            }
        }

        fn into_service(self) -> DispatchServiceImpl {
            let mut provider_registry = ProviderRegistry::default();
            if let Some(provider) = self.provider {
                provider_registry.register(ChannelType::Sms, Arc::new(provider));
            }

            DispatchServiceImpl::new(
                Arc::new(self.notifications_repository),
                Arc::new(self.duplicate_detection_service),
                Arc::new(self.preferences_service),
                Arc::new(self.rate_limit_service),
                provider_registry,
            )
        }
    }

    fn provider(result: fn() -> Result<(), ProviderError>) -> MockNotificationProvider {
        let mut provider = MockNotificationProvider::new();
        provider.expect_name().return_const("Logging");
        provider.expect_is_configured().return_const(true);
        provider
            .expect_send()
            .times(1)
            .returning(move |_| result());
        provider
    }

    ///
    /// Records status of every saved notification
    ///
    fn recording_repository(saved: Arc<Mutex<Vec<Notification>>>) -> MockNotificationsRepository {
        let id = ObjectId::new();
        let mut repository = MockNotificationsRepository::new();
        repository.expect_save().returning(move |notification| {
            saved.lock().unwrap().push(notification.clone());
            Ok(id)
        });
        repository
    }

    fn statuses(saved: &Mutex<Vec<Notification>>) -> Vec<NotificationStatus> {
        saved
            .lock()
            .unwrap()
            .iter()
            .map(|notification| notification.status)
            .collect()
    }

    #[tokio::test]
    async fn dispatch_delivered() {
        let saved = Arc::new(Mutex::new(Vec::new()));
        let mut mocks = Mocks::passing();
        mocks.notifications_repository = recording_repository(Arc::clone(&saved));
        mocks.provider = Some(provider(|| Ok(())));
        mocks
            .rate_limit_service
            .expect_record_send()
            .with(eq("+48123456789"), eq("sms"), eq(NOW))
            .times(1)
            .returning(|_, _, _| Ok(()));
        let service = mocks.into_service();

        let notification = service.dispatch(sms_request(), NOW).await.unwrap();

        assert_eq!(notification.status, NotificationStatus::Delivered);
        assert_eq!(notification.title, "SMS Notification");
        assert_eq!(notification.delivery_attempts, 1);
        assert!(notification.id.is_some());
        let response = notification.response.unwrap();
        assert!(response.success);
        assert_eq!(response.message, "SMS sent successfully via Logging.");
        assert_eq!(
            statuses(&saved),
            vec![NotificationStatus::Processing, NotificationStatus::Delivered]
        );
    }

    #[tokio::test]
    async fn dispatch_duplicate() {
        let saved = Arc::new(Mutex::new(Vec::new()));
        let duplicate_id = ObjectId::new();
        let mut mocks = Mocks::passing();
        mocks.notifications_repository = recording_repository(Arc::clone(&saved));
        mocks.duplicate_detection_service = MockDuplicateDetectionService::new();
        mocks
            .duplicate_detection_service
            .expect_find_duplicate()
            .with(eq("+48123456789"), eq("sms"), always(), eq(NOW))
            .return_once(move |_, _, _, _| {
                let mut duplicate = DispatchServiceImpl::pending_notification(
                    &sms_request(),
                    datetime!(2024-05-01 09:45:00 UTC),
                );
                duplicate.id = Some(duplicate_id);
                duplicate.status = NotificationStatus::Delivered;
                Ok(Some(duplicate))
            });
        mocks.preferences_service = MockPreferencesService::new();
        mocks.rate_limit_service = MockRateLimitService::new();
        let service = mocks.into_service();

        let notification = service.dispatch(sms_request(), NOW).await.unwrap();

        assert_eq!(notification.status, NotificationStatus::Duplicate);
        assert_eq!(notification.delivery_attempts, 0);
        let response = notification.response.unwrap();
        assert!(!response.success);
        assert_eq!(
            response.message,
            format!(
                "Duplicate of notification {} sent at 2024-05-01T09:45:00Z",
                duplicate_id.to_hex()
            )
        );
        assert_eq!(statuses(&saved), vec![NotificationStatus::Duplicate]);
    }

    #[tokio::test]
    async fn dispatch_blocked_by_preference() {
        let saved = Arc::new(Mutex::new(Vec::new()));
        let mut mocks = Mocks::passing();
        mocks.notifications_repository = recording_repository(Arc::clone(&saved));
        mocks.preferences_service = MockPreferencesService::new();
        mocks
            .preferences_service
            .expect_is_channel_allowed()
            .return_once(|_, _| {
                Ok(ChannelPermission::Blocked {
                    reason: "Notification blocked by user preference for channel: sms"
                        .to_string(),
                })
            });
        mocks.rate_limit_service = MockRateLimitService::new();
        let service = mocks.into_service();

        let notification = service.dispatch(sms_request(), NOW).await.unwrap();

        assert_eq!(notification.status, NotificationStatus::Blocked);
        assert_eq!(
            notification.response.unwrap().message,
            "Notification blocked by user preference for channel: sms"
        );
        assert_eq!(statuses(&saved), vec![NotificationStatus::Blocked]);
    }

    #[tokio::test]
    async fn dispatch_blocked_by_rate_limits() {
        let cases = [
            (
                RateLimitDecision::TooFrequent {
                    retry_after_seconds: 1,
                    reason: "too frequent".to_string(),
                },
                NotificationStatus::BlockedFrequency,
            ),
            (
                RateLimitDecision::DailyLimitReached {
                    limit: 2,
                    reason: "daily limit".to_string(),
                },
                NotificationStatus::BlockedDailyLimit,
            ),
        ];

        for (decision, expected_status) in cases {
            let saved = Arc::new(Mutex::new(Vec::new()));
            let mut mocks = Mocks::passing();
            mocks.notifications_repository = recording_repository(Arc::clone(&saved));
            mocks.rate_limit_service = MockRateLimitService::new();
            mocks
                .rate_limit_service
                .expect_check()
                .return_once(move |_, _, _| Ok(decision));
            mocks.rate_limit_service.expect_record_send().never();
            let service = mocks.into_service();

            let notification = service.dispatch(sms_request(), NOW).await.unwrap();

            assert_eq!(notification.status, expected_status);
            assert_eq!(statuses(&saved), vec![expected_status]);
        }
    }

    #[tokio::test]
    async fn dispatch_provider_failed() {
        let saved = Arc::new(Mutex::new(Vec::new()));
        let mut mocks = Mocks::passing();
        mocks.notifications_repository = recording_repository(Arc::clone(&saved));
        mocks.provider = Some(provider(|| {
            Err(ProviderError::Transport("connection refused".to_string()))
        }));
        mocks.rate_limit_service.expect_record_send().never();
        let service = mocks.into_service();

        let result = service.dispatch(sms_request(), NOW).await;

        assert!(matches!(result, Err(Error::Provider(_))));
        let saved = saved.lock().unwrap();
        assert_eq!(saved.len(), 2);
        let failed = &saved[1];
        assert_eq!(failed.status, NotificationStatus::Failed);
        assert_eq!(failed.delivery_attempts, 1);
        assert_eq!(
            failed.response.as_ref().unwrap().message,
            "Provider error: transport error: connection refused"
        );
    }

    #[tokio::test]
    async fn dispatch_provider_not_configured() {
        let saved = Arc::new(Mutex::new(Vec::new()));
        let mut provider = MockNotificationProvider::new();
        provider.expect_name().return_const("SMTP");
        provider.expect_is_configured().return_const(false);
        provider.expect_send().never();
        let mut mocks = Mocks::passing();
        mocks.notifications_repository = recording_repository(Arc::clone(&saved));
        mocks.provider = Some(provider);
        let service = mocks.into_service();

        let result = service.dispatch(sms_request(), NOW).await;

        assert!(matches!(
            result,
            Err(Error::Provider(ProviderError::NotConfigured { provider: "SMTP" }))
        ));
        assert_eq!(
            statuses(&saved),
            vec![NotificationStatus::Processing, NotificationStatus::Failed]
        );
    }

    #[tokio::test]
    async fn dispatch_provider_missing() {
        let saved = Arc::new(Mutex::new(Vec::new()));
        let mut mocks = Mocks::passing();
        mocks.notifications_repository = recording_repository(Arc::clone(&saved));
        let service = mocks.into_service();

        let result = service.dispatch(sms_request(), NOW).await;

        assert!(matches!(
            result,
            Err(Error::Provider(ProviderError::MissingProvider(ChannelType::Sms)))
        ));
        assert_eq!(
            statuses(&saved),
            vec![NotificationStatus::Processing, NotificationStatus::Failed]
        );
    }

    #[tokio::test]
    async fn dispatch_lookup_failed() {
        let saved = Arc::new(Mutex::new(Vec::new()));
        let mut mocks = Mocks::passing();
        mocks.notifications_repository = recording_repository(Arc::clone(&saved));
        mocks.preferences_service = MockPreferencesService::new();
        mocks
            .preferences_service
            .expect_is_channel_allowed()
            .return_once(|_, _| Err(Error::Database(repository::Error::NoDocumentUpdated)));
        let service = mocks.into_service();

        let result = service.dispatch(sms_request(), NOW).await;

        assert!(matches!(result, Err(Error::Database(_))));
        let saved = saved.lock().unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].status, NotificationStatus::Failed);
        assert!(saved[0]
            .response
            .as_ref()
            .unwrap()
            .message
            .starts_with("Pre-dispatch error: "));
    }

    #[tokio::test]
    async fn dispatch_processing_save_failed() {
        let saved = Arc::new(Mutex::new(Vec::new()));
        let saved_clone = Arc::clone(&saved);
        let mut mocks = Mocks::passing();
        mocks
            .notifications_repository
            .expect_save()
            .times(2)
            .returning(move |notification| {
                let mut saved = saved_clone.lock().unwrap();
                saved.push(notification.clone());
                match saved.len() {
                    1 => Err(repository::Error::NoDocumentUpdated),
                    _ => Ok(ObjectId::new()),
                }
            });
        let service = mocks.into_service();

        let result = service.dispatch(sms_request(), NOW).await;

        assert!(matches!(result, Err(Error::Database(_))));
        assert_eq!(
            statuses(&saved),
            vec![NotificationStatus::Processing, NotificationStatus::Failed]
        );
    }

    #[tokio::test]
    async fn dispatch_rejection_save_failed_stays_terminal() {
        let mut mocks = Mocks::passing();
        mocks.preferences_service = MockPreferencesService::new();
        mocks
            .preferences_service
            .expect_is_channel_allowed()
            .return_once(|_, _| {
                Ok(ChannelPermission::Blocked {
                    reason: "blocked".to_string(),
                })
            });
        mocks
            .notifications_repository
            .expect_save()
            .times(1)
            .returning(|_| Err(repository::Error::NoDocumentUpdated));
        let service = mocks.into_service();

        let result = service.dispatch(sms_request(), NOW).await;

        assert!(matches!(result, Err(Error::Database(_))));
    }

    #[tokio::test]
    async fn dispatch_record_send_failure_keeps_delivered() {
        let mut mocks = Mocks::passing();
        mocks
            .notifications_repository
            .expect_save()
            .returning(|_| Ok(ObjectId::new()));
        mocks.provider = Some(provider(|| Ok(())));
        mocks
            .rate_limit_service
            .expect_record_send()
            .return_once(|_, _, _| Err(Error::Database(repository::Error::NoDocumentUpdated)));
        let service = mocks.into_service();

        let notification = service.dispatch(sms_request(), NOW).await.unwrap();

        assert_eq!(notification.status, NotificationStatus::Delivered);
    }

    #[tokio::test]
    async fn dispatch_delivered_save_failed_still_counts_send() {
        let calls = Arc::new(Mutex::new(0));
        let mut mocks = Mocks::passing();
        mocks
            .notifications_repository
            .expect_save()
            .times(2)
            .returning(move |_| {
                let mut calls = calls.lock().unwrap();
                *calls += 1;
                match *calls {
                    1 => Ok(ObjectId::new()),
                    _ => Err(repository::Error::NoDocumentUpdated),
                }
            });
        mocks.provider = Some(provider(|| Ok(())));
        mocks
            .rate_limit_service
            .expect_record_send()
            .with(eq("+48123456789"), eq("sms"), eq(NOW))
            .times(1)
            .returning(|_, _, _| Ok(()));
        let service = mocks.into_service();

        let result = service.dispatch(sms_request(), NOW).await;

        assert!(matches!(result, Err(Error::Database(_))));
    }

    #[test]
    fn pending_notification_fields() {
        let request = input::NotificationRequest::Push(input::PushRequest {
            recipient_id: "device-1".to_string(),
            title: "Hi".to_string(),
            body: "You have mail".to_string(),
        });

        let notification = DispatchServiceImpl::pending_notification(&request, NOW);

        assert_eq!(notification.id, None);
        assert_eq!(notification.status, NotificationStatus::Pending);
        assert_eq!(notification.channel_type, "push");
        assert_eq!(notification.delivery_attempts, 0);
        assert_eq!(
            notification.content_hash,
            content_fingerprint("device-1", "push", "Hi", "You have mail")
        );
        assert_eq!(notification.created_at, NOW);
    }
}
