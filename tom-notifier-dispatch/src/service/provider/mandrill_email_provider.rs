use super::{
    dto::{
        MandrillAttachment, MandrillMergeVar, MandrillMessage, MandrillRecipient,
        MandrillSendRequest, MandrillSendResult,
    },
    MandrillEmailProviderConfig, NotificationProvider, ProviderError,
};
use crate::dto::input;
use axum::async_trait;
use base64::{prelude::BASE64_STANDARD, Engine};
use std::collections::BTreeMap;

const MANDRILL: &str = "Mailchimp Transactional (Mandrill)";
const MANDRILL_SEND_URL: &str = "https://mandrillapp.com/api/1.0/messages/send.json";
const MANDRILL_SEND_TEMPLATE_URL: &str =
    "https://mandrillapp.com/api/1.0/messages/send-template.json";

pub struct MandrillEmailProvider {
    config: MandrillEmailProviderConfig,
    client: reqwest::Client,
}

impl MandrillEmailProvider {
    pub fn new(config: MandrillEmailProviderConfig) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self { config, client })
    }

    fn build_request<'a>(
        api_key: &'a str,
        from_email: &'a str,
        from_name: &'a str,
        email: &'a input::EmailRequest,
    ) -> MandrillSendRequest<'a> {
        let from_email = email.from.as_deref().unwrap_or(from_email);

        let mut to = vec![MandrillRecipient {
            email: &email.to,
            recipient_type: "to",
        }];
        to.extend(email.cc.iter().map(|cc| MandrillRecipient {
            email: cc,
            recipient_type: "cc",
        }));
        to.extend(email.bcc.iter().map(|bcc| MandrillRecipient {
            email: bcc,
            recipient_type: "bcc",
        }));

        let mut headers = email
            .headers
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
            .collect::<BTreeMap<_, _>>();
        if let Some(reply_to) = email.reply_to.as_deref() {
            headers.insert("Reply-To", reply_to);
        }

        let attachments = email
            .attachments
            .iter()
            .map(|(name, content)| MandrillAttachment {
                content_type: "application/octet-stream",
                name,
                content: BASE64_STANDARD.encode(content),
            })
            .collect();

        let mut global_merge_vars = email
            .template_data
            .iter()
            .map(|(name, content)| MandrillMergeVar { name, content })
            .collect::<Vec<_>>();
        global_merge_vars.sort_by(|a, b| a.name.cmp(b.name));

        MandrillSendRequest {
            key: api_key,
            message: MandrillMessage {
                from_email,
                from_name,
                to,
                subject: &email.subject,
                html: email.is_html.then_some(email.body.as_str()),
                text: &email.body,
                headers,
                attachments,
                global_merge_vars,
            },
            template_name: email.template_id.as_deref(),
            template_content: email.template_id.as_ref().map(|_| Vec::new()),
        }
    }
}

#[async_trait]
impl NotificationProvider for MandrillEmailProvider {
    fn name(&self) -> &'static str {
        MANDRILL
    }

    fn is_configured(&self) -> bool {
        let is_set = |value: &Option<String>| {
            value
                .as_deref()
                .is_some_and(|value| !value.trim().is_empty())
        };

        is_set(&self.config.api_key) && is_set(&self.config.from_email)
    }

    #[tracing::instrument(name = "Mandrill", skip_all)]
    async fn send(&self, request: &input::NotificationRequest) -> Result<(), ProviderError> {
        let input::NotificationRequest::Email(email) = request else {
            return Err(ProviderError::UnsupportedChannel {
                provider: MANDRILL,
                channel: request.channel_type(),
            });
        };
        let (Some(api_key), Some(from_email)) = (
            self.config.api_key.as_deref(),
            self.config.from_email.as_deref(),
        ) else {
            return Err(ProviderError::NotConfigured { provider: MANDRILL });
        };

        let body = Self::build_request(api_key, from_email, &self.config.from_name, email);
        let url = match body.template_name {
            Some(_) => MANDRILL_SEND_TEMPLATE_URL,
            None => MANDRILL_SEND_URL,
        };

        tracing::debug!(url, "sending email");
        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let results = response.json::<Vec<MandrillSendResult>>().await?;
        if let Some(rejected) = results
            .iter()
            .find(|result| result.status == "rejected" || result.status == "invalid")
        {
            return Err(ProviderError::Rejected {
                status: status.as_u16(),
                body: format!(
                    "{} {}: {}",
                    rejected.email,
                    rejected.status,
                    rejected.reject_reason.as_deref().unwrap_or("unknown reason")
                ),
            });
        }
        tracing::info!("email sent");

        Ok(())
    }
}
