mod notification;
mod notification_stats;
mod user_preference;

pub use notification::*;
pub use notification_stats::*;
pub use user_preference::*;
