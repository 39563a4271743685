mod notification;
mod notification_frequency;
mod user_preference;

pub use notification::*;
pub use notification_frequency::*;
pub use user_preference::*;
