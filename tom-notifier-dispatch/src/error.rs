use crate::{
    repository::{self, InvalidStatusTransition},
    service::provider::ProviderError,
};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("notification not exist")]
    NotificationNotExist,

    #[error("preference not exist")]
    PreferenceNotExist,

    #[error("validation error: {0}")]
    Validation(String),

    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("database error: {0}")]
    Database(#[from] repository::Error),

    #[error(transparent)]
    InvalidStatusTransition(#[from] InvalidStatusTransition),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::warn!(err = %self);

        match self {
            Error::NotificationNotExist | Error::PreferenceNotExist => StatusCode::NOT_FOUND,
            Error::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::Provider(_) => StatusCode::BAD_GATEWAY,
            Error::Database(_) | Error::InvalidStatusTransition(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
        .into_response()
    }
}
