use super::{ChannelPermission, PreferencesService};
use crate::{
    dto::{input, output},
    error::Error,
    repository::{self, NotificationChannel, UserPreference, UserPreferencesRepository},
};
use axum::async_trait;
use std::sync::Arc;

pub struct PreferencesServiceImpl {
    repository: Arc<dyn UserPreferencesRepository>,
}

impl PreferencesServiceImpl {
    pub fn new(repository: Arc<dyn UserPreferencesRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl PreferencesService for PreferencesServiceImpl {
    async fn is_channel_allowed(
        &self,
        recipient_id: &str,
        channel_type: &str,
    ) -> Result<ChannelPermission, Error> {
        let Some(preference) = self.repository.find(recipient_id).await? else {
            tracing::debug!("no preference found, assuming opt-in");
            return Ok(ChannelPermission::Allowed);
        };

        let enabled = preference.channels.iter().any(|channel| {
            channel.enabled && channel.channel_type.eq_ignore_ascii_case(channel_type)
        });

        match enabled {
            true => Ok(ChannelPermission::Allowed),
            false => Ok(ChannelPermission::Blocked {
                reason: format!(
                    "Notification blocked by user preference for channel: {channel_type}"
                ),
            }),
        }
    }

    async fn find_preference(&self, recipient_id: &str) -> Result<output::UserPreference, Error> {
        tracing::info!("finding preference");

        let preference = self
            .repository
            .find(recipient_id)
            .await?
            .ok_or(Error::PreferenceNotExist)?;

        Ok(output::UserPreference::from(preference))
    }

    async fn save_preference(
        &self,
        recipient_id: &str,
        preference: input::UserPreference,
    ) -> Result<output::UserPreference, Error> {
        tracing::info!("saving preference");

        for channel in preference.channels.iter() {
            if channel.channel_type.trim().is_empty() {
                return Err(Error::Validation("channel type cannot be empty".into()));
            }
        }

        let preference = UserPreference {
            recipient_id: recipient_id.to_string(),
            channels: preference
                .channels
                .into_iter()
                .map(|channel| NotificationChannel {
                    channel_type: channel.channel_type,
                    token: channel.token,
                    enabled: channel.enabled,
                })
                .collect(),
        };

        self.repository.upsert(&preference).await?;
        tracing::info!("saved preference");

        Ok(output::UserPreference::from(preference))
    }

    async fn delete_preference(&self, recipient_id: &str) -> Result<(), Error> {
        tracing::info!("deleting preference");

        match self.repository.delete(recipient_id).await {
            Ok(()) => {
                tracing::info!("deleted preference");
                Ok(())
            }
            Err(repository::Error::NoDocumentUpdated) => Err(Error::PreferenceNotExist),
            Err(err) => Err(Error::Database(err)),
        }
    }
}
