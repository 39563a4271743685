mod user_preference_entity;

pub use user_preference_entity::*;
