use crate::dto::ChannelType;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct StatsQuery {
    pub channel_type: Option<ChannelType>,
}
