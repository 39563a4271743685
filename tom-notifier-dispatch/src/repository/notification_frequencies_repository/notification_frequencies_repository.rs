use crate::repository::{Error, NotificationFrequency};
use axum::async_trait;
use time::Date;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationFrequenciesRepository: Send + Sync {
    async fn find(
        &self,
        recipient_id: &str,
        channel_type: &str,
        date: Date,
    ) -> Result<Option<NotificationFrequency>, Error>;

    ///
    /// Finds counters of all recipient's channels for the day
    ///
    async fn find_many(
        &self,
        recipient_id: &str,
        date: Date,
    ) -> Result<Vec<NotificationFrequency>, Error>;

    ///
    /// Inserts or replaces counter identified by
    /// (recipient_id, channel_type, date)
    ///
    async fn save(&self, frequency: &NotificationFrequency) -> Result<(), Error>;
}
