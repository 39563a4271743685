use super::{
    entity::{NotificationEntity, NotificationFindEntity},
    NotificationsRepository,
};
use crate::repository::{Error, Notification};
use axum::async_trait;
use bson::{doc, oid::ObjectId, Bson, DateTime, Document};
use futures_util::TryStreamExt;
use mongodb::{error::ErrorKind, options::IndexOptions, Collection, Database, IndexModel};
use std::sync::Arc;
use time::OffsetDateTime;

const NOTIFICATIONS: &str = "notifications";
const INDEX_NAME_DUPLICATE_LOOKUP: &str = "index_recipient_id_channel_type_content_hash";
const INDEX_NAME_RECIPIENT_CREATED_AT: &str = "index_recipient_id_created_at";

pub struct NotificationsRepositoryImpl {
    database: Database,
}

impl NotificationsRepositoryImpl {
    pub async fn new(database: Database) -> Result<Self, mongodb::error::Error> {
        tracing::debug!(collection = NOTIFICATIONS, "creating collection");
        database.create_collection(NOTIFICATIONS).await?;

        let collection = database.collection::<Document>(NOTIFICATIONS);

        tracing::debug!("fetching index names");
        let index_names = collection.list_index_names().await?;

        if !index_names.contains(&INDEX_NAME_DUPLICATE_LOOKUP.to_string()) {
            Self::create_index(
                &collection,
                INDEX_NAME_DUPLICATE_LOOKUP,
                doc! {
                    "recipient_id": 1,
                    "channel_type": 1,
                    "content_hash": 1,
                    "created_at": 1,
                },
            )
            .await?;
        }
        if !index_names.contains(&INDEX_NAME_RECIPIENT_CREATED_AT.to_string()) {
            Self::create_index(
                &collection,
                INDEX_NAME_RECIPIENT_CREATED_AT,
                doc! {
                    "recipient_id": 1,
                    "created_at": -1,
                },
            )
            .await?;
        }

        Ok(Self { database })
    }

    async fn create_index(
        collection: &Collection<Document>,
        name: &str,
        keys: Document,
    ) -> Result<(), mongodb::error::Error> {
        let index = IndexModel::builder()
            .keys(keys)
            .options(IndexOptions::builder().name(name.to_string()).build())
            .build();

        collection.create_index(index).await?;
        tracing::debug!(collection = NOTIFICATIONS, index = name, "created index");

        Ok(())
    }
}

#[async_trait]
impl NotificationsRepository for NotificationsRepositoryImpl {
    async fn save(&self, notification: &Notification) -> Result<ObjectId, Error> {
        let entity = NotificationEntity::from(notification);
        let collection = self
            .database
            .collection::<NotificationEntity>(NOTIFICATIONS);

        if let Some(id) = notification.id {
            collection
                .replace_one(doc! { "_id": id }, &entity)
                .upsert(true)
                .await?;

            return Ok(id);
        }

        let insert_result = collection.insert_one(&entity).await?;

        let Bson::ObjectId(id) = insert_result.inserted_id else {
            tracing::error!("invalid type of inserted '_id'");
            return Err(Error::Mongo(
                ErrorKind::Custom(Arc::new("invalid type of inserted '_id'")).into(),
            ));
        };

        Ok(id)
    }

    async fn find_duplicates(
        &self,
        recipient_id: &str,
        channel_type: &str,
        content_hash: &str,
        since: OffsetDateTime,
    ) -> Result<Vec<Notification>, Error> {
        let notifications = self
            .database
            .collection::<NotificationFindEntity>(NOTIFICATIONS)
            .find(doc! {
                "recipient_id": recipient_id,
                "channel_type": channel_type,
                "content_hash": content_hash,
                "created_at": { "$gte": DateTime::from(since) },
            })
            .sort(doc! { "created_at": 1 })
            .await?
            .map_ok(Notification::from)
            .try_collect()
            .await?;

        Ok(notifications)
    }

    async fn find_many_by_recipient(
        &self,
        recipient_id: &str,
    ) -> Result<Vec<Notification>, Error> {
        let notifications = self
            .database
            .collection::<NotificationFindEntity>(NOTIFICATIONS)
            .find(doc! { "recipient_id": recipient_id })
            .sort(doc! { "created_at": -1 })
            .await?
            .map_ok(Notification::from)
            .try_collect()
            .await?;

        Ok(notifications)
    }

    async fn find_latest_by_recipient(
        &self,
        recipient_id: &str,
    ) -> Result<Option<Notification>, Error> {
        let notification = self
            .database
            .collection::<NotificationFindEntity>(NOTIFICATIONS)
            .find_one(doc! { "recipient_id": recipient_id })
            .sort(doc! { "created_at": -1 })
            .await?
            .map(Notification::from);

        Ok(notification)
    }
}
