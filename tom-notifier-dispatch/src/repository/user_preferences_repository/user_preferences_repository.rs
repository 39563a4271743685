use crate::repository::{Error, UserPreference};
use axum::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserPreferencesRepository: Send + Sync {
    async fn find(&self, recipient_id: &str) -> Result<Option<UserPreference>, Error>;

    ///
    /// Replaces whole preference of the recipient
    ///
    async fn upsert(&self, preference: &UserPreference) -> Result<(), Error>;

    ///
    /// ### Errors
    /// - [Error::NoDocumentUpdated] when recipient has no preference
    ///
    async fn delete(&self, recipient_id: &str) -> Result<(), Error>;
}
