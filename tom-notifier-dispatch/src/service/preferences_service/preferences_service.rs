use super::ChannelPermission;
use crate::{
    dto::{input, output},
    error::Error,
};
use axum::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PreferencesService: Send + Sync {
    ///
    /// Checks whether recipient accepts notifications on the channel.
    /// Recipient without preference accepts every channel.
    ///
    async fn is_channel_allowed(
        &self,
        recipient_id: &str,
        channel_type: &str,
    ) -> Result<ChannelPermission, Error>;

    ///
    /// ### Errors
    /// - [Error::PreferenceNotExist] when recipient has no preference
    ///
    async fn find_preference(&self, recipient_id: &str) -> Result<output::UserPreference, Error>;

    async fn save_preference(
        &self,
        recipient_id: &str,
        preference: input::UserPreference,
    ) -> Result<output::UserPreference, Error>;

    ///
    /// ### Errors
    /// - [Error::PreferenceNotExist] when recipient has no preference
    ///
    async fn delete_preference(&self, recipient_id: &str) -> Result<(), Error>;
}
