use std::time::Duration;

#[derive(Clone)]
pub struct MandrillEmailProviderConfig {
    pub api_key: Option<String>,
    pub from_email: Option<String>,
    pub from_name: String,
    pub timeout: Duration,
}
