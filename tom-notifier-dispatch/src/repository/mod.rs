mod dto;
mod error;
mod notification_frequencies_repository;
mod notifications_repository;
mod user_preferences_repository;

pub use dto::*;
pub use error::*;
pub use notification_frequencies_repository::*;
pub use notifications_repository::*;
pub use user_preferences_repository::*;
