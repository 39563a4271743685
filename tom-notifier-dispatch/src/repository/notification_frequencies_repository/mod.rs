mod entity;
mod notification_frequencies_repository;
mod notification_frequencies_repository_impl;

pub use notification_frequencies_repository::*;
pub use notification_frequencies_repository_impl::*;
