//! Server module for building the booking HTTP server
//!
//! `ServerBuilder` assembles a `ServerHost` (service, sessions, clock) and
//! exposes it through the REST routes.

pub mod builder;
pub mod exposure;
pub mod host;
pub mod router;

pub use builder::ServerBuilder;
pub use host::ServerHost;
