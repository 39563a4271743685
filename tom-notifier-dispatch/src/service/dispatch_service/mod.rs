mod dispatch_service;
mod dispatch_service_impl;
mod recipient_locks;

#[cfg(test)]
mod in_memory;

pub use dispatch_service::*;
pub use dispatch_service_impl::*;
