//!
//! Module with all dtos that are passed between server, queues and users
//!

mod channel_type;
pub mod input;
pub mod output;

pub use channel_type::ChannelType;
