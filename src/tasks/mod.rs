//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Cache sweep: removes expired entries at the configured check period

mod cleanup;

pub use cleanup::spawn_cleanup_task;
