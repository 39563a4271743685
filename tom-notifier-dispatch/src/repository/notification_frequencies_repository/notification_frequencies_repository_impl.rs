use super::{
    entity::{date_to_bson, NotificationFrequencyEntity},
    NotificationFrequenciesRepository,
};
use crate::repository::{Error, NotificationFrequency};
use axum::async_trait;
use bson::{doc, Document};
use futures_util::TryStreamExt;
use mongodb::{options::IndexOptions, Database, IndexModel};
use time::Date;

const NOTIFICATION_FREQUENCIES: &str = "notification_frequencies";
const INDEX_NAME_UNIQUE_RECIPIENT_CHANNEL_DATE: &str = "unique_recipient_id_channel_type_date";

pub struct NotificationFrequenciesRepositoryImpl {
    database: Database,
}

impl NotificationFrequenciesRepositoryImpl {
    pub async fn new(database: Database) -> Result<Self, mongodb::error::Error> {
        tracing::debug!(collection = NOTIFICATION_FREQUENCIES, "creating collection");
        database.create_collection(NOTIFICATION_FREQUENCIES).await?;

        let collection = database.collection::<Document>(NOTIFICATION_FREQUENCIES);

        tracing::debug!("fetching index names");
        let index_names = collection.list_index_names().await?;

        if !index_names.contains(&INDEX_NAME_UNIQUE_RECIPIENT_CHANNEL_DATE.to_string()) {
            collection
                .create_index(
                    IndexModel::builder()
                        .keys(doc! {
                            "recipient_id": 1,
                            "channel_type": 1,
                            "date": 1,
                        })
                        .options(
                            IndexOptions::builder()
                                .name(INDEX_NAME_UNIQUE_RECIPIENT_CHANNEL_DATE.to_string())
                                .unique(true)
                                .build(),
                        )
                        .build(),
                )
                .await?;
            tracing::debug!(
                collection = NOTIFICATION_FREQUENCIES,
                index = INDEX_NAME_UNIQUE_RECIPIENT_CHANNEL_DATE,
                "created index"
            );
        }

        Ok(Self { database })
    }
}

#[async_trait]
impl NotificationFrequenciesRepository for NotificationFrequenciesRepositoryImpl {
    async fn find(
        &self,
        recipient_id: &str,
        channel_type: &str,
        date: Date,
    ) -> Result<Option<NotificationFrequency>, Error> {
        let frequency = self
            .database
            .collection::<NotificationFrequencyEntity>(NOTIFICATION_FREQUENCIES)
            .find_one(doc! {
                "recipient_id": recipient_id,
                "channel_type": channel_type,
                "date": date_to_bson(date),
            })
            .await?
            .map(NotificationFrequency::from);

        Ok(frequency)
    }

    async fn find_many(
        &self,
        recipient_id: &str,
        date: Date,
    ) -> Result<Vec<NotificationFrequency>, Error> {
        let frequencies = self
            .database
            .collection::<NotificationFrequencyEntity>(NOTIFICATION_FREQUENCIES)
            .find(doc! {
                "recipient_id": recipient_id,
                "date": date_to_bson(date),
            })
            .sort(doc! { "channel_type": 1 })
            .await?
            .map_ok(NotificationFrequency::from)
            .try_collect()
            .await?;

        Ok(frequencies)
    }

    async fn save(&self, frequency: &NotificationFrequency) -> Result<(), Error> {
        let entity = NotificationFrequencyEntity::from(frequency);

        self.database
            .collection::<NotificationFrequencyEntity>(NOTIFICATION_FREQUENCIES)
            .replace_one(
                doc! {
                    "recipient_id": entity.recipient_id.as_str(),
                    "channel_type": entity.channel_type.as_str(),
                    "date": entity.date,
                },
                &entity,
            )
            .upsert(true)
            .await?;

        Ok(())
    }
}
