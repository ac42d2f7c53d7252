//! Telemetry and structured logging for wabot.
//!
//! Handles subscriber setup (console plus optional rolling NDJSON file), log
//! redaction of phone numbers and tokens, and the delivery outcome log.

pub mod event_logger;
pub mod logger;
pub mod redact;

pub use event_logger::{DeliveryEvent, DeliveryLogEntry, DeliveryLogger};
pub use logger::init_logger;
pub use redact::{mask_phone_number, redact_sensitive_data};
