use super::{
    EmailProviderKind, LoggingProvider, MandrillEmailProvider, NotificationProvider,
    ProviderError, ProviderRegistryConfig, SmtpEmailProvider,
};
use crate::dto::ChannelType;
use std::{collections::HashMap, sync::Arc};

///
/// Maps each channel to the provider that delivers it
///
#[derive(Default, Clone)]
pub struct ProviderRegistry {
    providers: HashMap<ChannelType, Arc<dyn NotificationProvider>>,
}

impl ProviderRegistry {
    ///
    /// Email goes through provider selected in config, sms and push are only logged
    ///
    pub fn from_config(config: ProviderRegistryConfig) -> Result<Self, ProviderError> {
        let email_provider: Arc<dyn NotificationProvider> = match config.email_provider {
            EmailProviderKind::Smtp => Arc::new(SmtpEmailProvider::new(config.smtp)?),
            EmailProviderKind::Mailchimp => Arc::new(MandrillEmailProvider::new(config.mandrill)?),
        };
        if !email_provider.is_configured() {
            tracing::warn!(
                provider = email_provider.name(),
                "email provider is not configured, emails will fail"
            );
        }

        let mut registry = Self::default();
        registry.register(ChannelType::Email, email_provider);
        registry.register(ChannelType::Sms, Arc::new(LoggingProvider::new()));
        registry.register(ChannelType::Push, Arc::new(LoggingProvider::new()));

        Ok(registry)
    }

    pub fn register(&mut self, channel_type: ChannelType, provider: Arc<dyn NotificationProvider>) {
        tracing::info!(channel = %channel_type, provider = provider.name(), "registered provider");
        self.providers.insert(channel_type, provider);
    }

    pub fn provider(&self, channel_type: ChannelType) -> Option<Arc<dyn NotificationProvider>> {
        self.providers.get(&channel_type).cloned()
    }
}
