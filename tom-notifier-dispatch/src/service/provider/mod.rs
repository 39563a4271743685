//!
//! Providers that hand notifications over to the outside world
//!

mod dto;
mod error;
mod logging_provider;
mod mandrill_email_provider;
mod notification_provider;
mod provider_registry;
mod smtp_email_provider;

pub use dto::{
    EmailProviderKind, MandrillEmailProviderConfig, ProviderRegistryConfig,
    SmtpEmailProviderConfig,
};
pub use error::*;
pub use logging_provider::*;
pub use mandrill_email_provider::*;
pub use notification_provider::*;
pub use provider_registry::*;
pub use smtp_email_provider::*;
