use super::{NotificationProvider, ProviderError, SmtpEmailProviderConfig};
use crate::dto::{input, ChannelType};
use axum::async_trait;
use lettre::{
    message::{
        header::{ContentType, HeaderName, HeaderValue},
        Attachment, Mailbox, MessageBuilder, MultiPart, SinglePart,
    },
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

const SMTP: &str = "SMTP";

pub struct SmtpEmailProvider {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from: Option<String>,
}

impl SmtpEmailProvider {
    ///
    /// Creates pooled STARTTLS transport when host is set.
    /// Provider without host or sender address stays unconfigured.
    ///
    pub fn new(config: SmtpEmailProviderConfig) -> Result<Self, ProviderError> {
        let transport = match config.host {
            Some(ref host) => {
                let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
                    .map_err(|err| ProviderError::Transport(err.to_string()))?
                    .port(config.port)
                    .timeout(Some(config.timeout));

                if let (Some(username), Some(password)) = (config.username, config.password) {
                    builder = builder.credentials(Credentials::new(username, password));
                }

                tracing::info!(host, port = config.port, "created SMTP transport");
                Some(builder.build())
            }
            None => None,
        };

        Ok(Self {
            transport,
            from: config.from,
        })
    }

    fn build_message(
        email: &input::EmailRequest,
        default_from: &str,
    ) -> Result<Message, ProviderError> {
        let from = email.from.as_deref().unwrap_or(default_from);

        let mut builder = Message::builder()
            .from(parse_mailbox("from", from)?)
            .to(parse_mailbox("to", &email.to)?)
            .subject(&email.subject);

        for cc in email.cc.iter() {
            builder = builder.cc(parse_mailbox("cc", cc)?);
        }
        for bcc in email.bcc.iter() {
            builder = builder.bcc(parse_mailbox("bcc", bcc)?);
        }
        if let Some(reply_to) = email.reply_to.as_deref() {
            builder = builder.reply_to(parse_mailbox("reply-to", reply_to)?);
        }
        builder = with_raw_headers(builder, email)?;

        let body = match email.is_html {
            true => SinglePart::html(email.body.clone()),
            false => SinglePart::plain(email.body.clone()),
        };

        let message = match email.attachments.is_empty() {
            true => builder.singlepart(body),
            false => {
                let mut multipart = MultiPart::mixed().singlepart(body);
                for (name, content) in email.attachments.iter() {
                    let content_type = ContentType::parse("application/octet-stream")
                        .map_err(|err| ProviderError::InvalidMessage(err.to_string()))?;
                    let attachment =
                        Attachment::new(name.clone()).body(content.clone(), content_type);
                    multipart = multipart.singlepart(attachment);
                }
                builder.multipart(multipart)
            }
        };

        message.map_err(|err| ProviderError::InvalidMessage(err.to_string()))
    }
}

fn parse_mailbox(field: &str, address: &str) -> Result<Mailbox, ProviderError> {
    address
        .parse()
        .map_err(|err| ProviderError::InvalidMessage(format!("{field} '{address}': {err}")))
}

fn with_raw_headers(
    mut builder: MessageBuilder,
    email: &input::EmailRequest,
) -> Result<MessageBuilder, ProviderError> {
    for (name, value) in email.headers.iter() {
        let header_name = HeaderName::new_from_ascii(name.clone())
            .map_err(|err| ProviderError::InvalidMessage(format!("header '{name}': {err}")))?;
        builder = builder.raw_header(HeaderValue::new(header_name, value.clone()));
    }

    Ok(builder)
}

#[async_trait]
impl NotificationProvider for SmtpEmailProvider {
    fn name(&self) -> &'static str {
        SMTP
    }

    fn is_configured(&self) -> bool {
        self.transport.is_some() && self.from.is_some()
    }

    #[tracing::instrument(name = "SMTP", skip_all)]
    async fn send(&self, request: &input::NotificationRequest) -> Result<(), ProviderError> {
        let input::NotificationRequest::Email(email) = request else {
            return Err(ProviderError::UnsupportedChannel {
                provider: SMTP,
                channel: request.channel_type(),
            });
        };
        let (Some(transport), Some(from)) = (self.transport.as_ref(), self.from.as_deref()) else {
            return Err(ProviderError::NotConfigured { provider: SMTP });
        };

        if email.template_id.is_some() {
            tracing::warn!("SMTP provider does not render templates, sending body as is");
        }

        let message = Self::build_message(email, from)?;

        tracing::debug!("sending email");
        transport
            .send(message)
            .await
            .map_err(|err| ProviderError::Transport(err.to_string()))?;
        tracing::info!("email sent");

        Ok(())
    }
}
