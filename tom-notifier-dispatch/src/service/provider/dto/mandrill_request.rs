use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Serialize)]
pub struct MandrillSendRequest<'a> {
    pub key: &'a str,
    pub message: MandrillMessage<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_content: Option<Vec<MandrillMergeVar<'a>>>,
}

#[derive(Serialize)]
pub struct MandrillMessage<'a> {
    pub from_email: &'a str,
    pub from_name: &'a str,
    pub to: Vec<MandrillRecipient<'a>>,
    pub subject: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<&'a str>,
    pub text: &'a str,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<&'a str, &'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<MandrillAttachment<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub global_merge_vars: Vec<MandrillMergeVar<'a>>,
}

#[derive(Serialize)]
pub struct MandrillRecipient<'a> {
    pub email: &'a str,
    #[serde(rename = "type")]
    pub recipient_type: &'static str,
}

#[derive(Serialize)]
pub struct MandrillAttachment<'a> {
    #[serde(rename = "type")]
    pub content_type: &'static str,
    pub name: &'a str,
    /// base64 encoded file
    pub content: String,
}

#[derive(Serialize)]
pub struct MandrillMergeVar<'a> {
    pub name: &'a str,
    pub content: &'a serde_json::Value,
}

#[derive(Deserialize)]
pub struct MandrillSendResult {
    pub email: String,
    pub status: String,
    pub reject_reason: Option<String>,
}
