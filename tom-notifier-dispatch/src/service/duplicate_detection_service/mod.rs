mod dto;
mod duplicate_detection_service;
mod duplicate_detection_service_impl;

pub use dto::DuplicateDetectionServiceConfig;
pub use duplicate_detection_service::*;
pub use duplicate_detection_service_impl::*;
