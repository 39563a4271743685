mod rate_limit_decision;
mod rate_limit_service_config;

pub use rate_limit_decision::*;
pub use rate_limit_service_config::*;
