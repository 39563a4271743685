use super::{EmailProviderKind, MandrillEmailProviderConfig, SmtpEmailProviderConfig};

pub struct ProviderRegistryConfig {
    pub email_provider: EmailProviderKind,
    pub smtp: SmtpEmailProviderConfig,
    pub mandrill: MandrillEmailProviderConfig,
}
