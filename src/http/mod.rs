//! HTTP serving: static mounts, the accept loop and graceful shutdown.
//!
//! The server runs plain HTTP only; it is meant for local previews.

mod server;
mod shutdown;
pub mod static_files;

pub use server::{serve, ServerError};
pub use shutdown::shutdown_signal;
