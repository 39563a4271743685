mod duplicate_detection_service_config;

pub use duplicate_detection_service_config::*;
