use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct UserPreference {
    pub channels: Vec<NotificationChannel>,
}

#[derive(Debug, Deserialize)]
pub struct NotificationChannel {
    #[serde(rename = "type")]
    pub channel_type: String,
    pub token: Option<String>,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}
