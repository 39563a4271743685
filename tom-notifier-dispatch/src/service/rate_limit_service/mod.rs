mod dto;
mod rate_limit_service;
mod rate_limit_service_impl;

pub use dto::{RateLimitDecision, RateLimitServiceConfig};
pub use rate_limit_service::*;
pub use rate_limit_service_impl::*;
