mod email_provider_kind;
mod mandrill_email_provider_config;
mod mandrill_request;
mod provider_registry_config;
mod smtp_email_provider_config;

pub use email_provider_kind::*;
pub use mandrill_email_provider_config::*;
pub use mandrill_request::*;
pub use provider_registry_config::*;
pub use smtp_email_provider_config::*;
