mod entity;
mod user_preferences_repository;
mod user_preferences_repository_impl;

pub use user_preferences_repository::*;
pub use user_preferences_repository_impl::*;
