use super::{EmailRequest, PushRequest, SmsRequest};
use crate::dto::ChannelType;

const SMS_TITLE: &str = "SMS Notification";

///
/// Decoded request for a single notification on one channel
///
#[derive(Debug, Clone, PartialEq)]
pub enum NotificationRequest {
    Email(EmailRequest),
    Sms(SmsRequest),
    Push(PushRequest),
}

impl NotificationRequest {
    pub fn channel_type(&self) -> ChannelType {
        match self {
            NotificationRequest::Email(_) => ChannelType::Email,
            NotificationRequest::Sms(_) => ChannelType::Sms,
            NotificationRequest::Push(_) => ChannelType::Push,
        }
    }

    pub fn recipient_id(&self) -> &str {
        match self {
            NotificationRequest::Email(email) => &email.to,
            NotificationRequest::Sms(sms) => &sms.phone,
            NotificationRequest::Push(push) => &push.recipient_id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            NotificationRequest::Email(email) => &email.subject,
            NotificationRequest::Sms(_) => SMS_TITLE,
            NotificationRequest::Push(push) => &push.title,
        }
    }

    pub fn body(&self) -> &str {
        match self {
            NotificationRequest::Email(email) => &email.body,
            NotificationRequest::Sms(sms) => &sms.message,
            NotificationRequest::Push(push) => &push.body,
        }
    }
}
