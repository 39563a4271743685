use super::{entity::UserPreferenceEntity, UserPreferencesRepository};
use crate::repository::{Error, UserPreference};
use axum::async_trait;
use bson::{doc, Document};
use mongodb::{options::IndexOptions, Database, IndexModel};

const USER_PREFERENCES: &str = "user_preferences";
const INDEX_NAME_UNIQUE_RECIPIENT: &str = "unique_recipient_id";

pub struct UserPreferencesRepositoryImpl {
    database: Database,
}

impl UserPreferencesRepositoryImpl {
    pub async fn new(database: Database) -> Result<Self, mongodb::error::Error> {
        tracing::debug!(collection = USER_PREFERENCES, "creating collection");
        database.create_collection(USER_PREFERENCES).await?;

        let collection = database.collection::<Document>(USER_PREFERENCES);

        tracing::debug!("fetching index names");
        let index_names = collection.list_index_names().await?;

        if !index_names.contains(&INDEX_NAME_UNIQUE_RECIPIENT.to_string()) {
            collection
                .create_index(
                    IndexModel::builder()
                        .keys(doc! {
                            "recipient_id": 1,
                        })
                        .options(
                            IndexOptions::builder()
                                .name(INDEX_NAME_UNIQUE_RECIPIENT.to_string())
                                .unique(true)
                                .build(),
                        )
                        .build(),
                )
                .await?;
            tracing::debug!(
                collection = USER_PREFERENCES,
                index = INDEX_NAME_UNIQUE_RECIPIENT,
                "created index"
            );
        }

        Ok(Self { database })
    }
}

#[async_trait]
impl UserPreferencesRepository for UserPreferencesRepositoryImpl {
    async fn find(&self, recipient_id: &str) -> Result<Option<UserPreference>, Error> {
        let preference = self
            .database
            .collection::<UserPreferenceEntity>(USER_PREFERENCES)
            .find_one(doc! { "recipient_id": recipient_id })
            .await?
            .map(UserPreference::from);

        Ok(preference)
    }

    async fn upsert(&self, preference: &UserPreference) -> Result<(), Error> {
        let entity = UserPreferenceEntity::from(preference);

        self.database
            .collection::<UserPreferenceEntity>(USER_PREFERENCES)
            .replace_one(
                doc! { "recipient_id": entity.recipient_id.as_str() },
                &entity,
            )
            .upsert(true)
            .await?;

        Ok(())
    }

    async fn delete(&self, recipient_id: &str) -> Result<(), Error> {
        let delete_result = self
            .database
            .collection::<Document>(USER_PREFERENCES)
            .delete_one(doc! { "recipient_id": recipient_id })
            .await?;

        match delete_result.deleted_count == 1 {
            true => Ok(()),
            false => Err(Error::NoDocumentUpdated),
        }
    }
}
