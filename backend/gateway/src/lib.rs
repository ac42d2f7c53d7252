//! wabot HTTP gateway
//!
//! Assembles the adapter routers with the service descriptor and health
//! endpoints, and runs the listener until a shutdown signal arrives.

pub mod health_api;
pub mod server;
pub mod shutdown;

pub use health_api::{HealthReport, ServiceDescriptor};
pub use server::{GatewayState, bind_listener, build_app, serve};
pub use shutdown::shutdown_signal;
