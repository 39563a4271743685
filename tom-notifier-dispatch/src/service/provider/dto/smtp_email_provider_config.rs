use std::time::Duration;

#[derive(Clone)]
pub struct SmtpEmailProviderConfig {
    pub host: Option<String>,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Default sender when request does not override it
    pub from: Option<String>,
    pub timeout: Duration,
}
