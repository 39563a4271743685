mod email_request;
mod notification_request;
mod push_request;
mod sms_request;
mod stats_query;
mod user_preference;

pub use email_request::*;
pub use notification_request::*;
pub use push_request::*;
pub use sms_request::*;
pub use stats_query::*;
pub use user_preference::*;
