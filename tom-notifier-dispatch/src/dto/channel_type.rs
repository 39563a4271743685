use serde::{Deserialize, Serialize};

///
/// Channel through which notification reaches the recipient.
///
/// Stored and compared as lowercase string ("email", "sms", "push")
/// so records written by other producers remain readable.
///
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ChannelType {
    Email,
    Sms,
    Push,
}
