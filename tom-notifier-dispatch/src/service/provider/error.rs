use crate::dto::ChannelType;

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("{provider} provider is not properly configured")]
    NotConfigured { provider: &'static str },

    #[error("no provider registered for channel {0}")]
    MissingProvider(ChannelType),

    #[error("{provider} provider cannot send {channel} notifications")]
    UnsupportedChannel {
        provider: &'static str,
        channel: ChannelType,
    },

    #[error("invalid message: {0}")]
    InvalidMessage(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },
}
