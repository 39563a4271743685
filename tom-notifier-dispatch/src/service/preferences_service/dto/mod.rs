mod channel_permission;

pub use channel_permission::*;
