use crate::{
    application::ApplicationState,
    dto::{input, output},
    error::Error,
    service::{
        notifications_service::NotificationsService, preferences_service::PreferencesService,
        rate_limit_service::RateLimitService,
    },
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use time::OffsetDateTime;

pub fn routing() -> Router<ApplicationState> {
    Router::new()
        .route(
            "/api/v1/recipients/:recipient_id/notifications",
            get(get_notifications),
        )
        .route(
            "/api/v1/recipients/:recipient_id/notifications/latest",
            get(get_latest_notification),
        )
        .route("/api/v1/recipients/:recipient_id/stats", get(get_stats))
        .route(
            "/api/v1/recipients/:recipient_id/preference",
            get(get_preference)
                .put(put_preference)
                .delete(delete_preference),
        )
}

async fn get_notifications(
    State(service): State<Arc<dyn NotificationsService>>,
    Path(recipient_id): Path<String>,
) -> Result<Json<Vec<output::Notification>>, Error> {
    let notifications = service.find_notifications(&recipient_id).await?;

    Ok(Json(notifications))
}

async fn get_latest_notification(
    State(service): State<Arc<dyn NotificationsService>>,
    Path(recipient_id): Path<String>,
) -> Result<Json<output::Notification>, Error> {
    let notification = service.find_latest_notification(&recipient_id).await?;

    Ok(Json(notification))
}

async fn get_stats(
    State(service): State<Arc<dyn RateLimitService>>,
    Path(recipient_id): Path<String>,
    Query(query): Query<input::StatsQuery>,
) -> Result<Json<Vec<output::NotificationStats>>, Error> {
    let stats = service
        .find_stats(&recipient_id, query.channel_type, OffsetDateTime::now_utc())
        .await?;

    Ok(Json(stats))
}

async fn get_preference(
    State(service): State<Arc<dyn PreferencesService>>,
    Path(recipient_id): Path<String>,
) -> Result<Json<output::UserPreference>, Error> {
    let preference = service.find_preference(&recipient_id).await?;

    Ok(Json(preference))
}

async fn put_preference(
    State(service): State<Arc<dyn PreferencesService>>,
    Path(recipient_id): Path<String>,
    Json(preference): Json<input::UserPreference>,
) -> Result<Json<output::UserPreference>, Error> {
    let preference = service.save_preference(&recipient_id, preference).await?;

    Ok(Json(preference))
}

async fn delete_preference(
    State(service): State<Arc<dyn PreferencesService>>,
    Path(recipient_id): Path<String>,
) -> Result<StatusCode, Error> {
    service.delete_preference(&recipient_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
