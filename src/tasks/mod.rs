//! Background Tasks Module
//!
//! Tasks that run periodically while the gateway is up.

mod cleanup;

pub use cleanup::spawn_cleanup_task;
