mod notification_frequency_entity;

pub use notification_frequency_entity::*;
