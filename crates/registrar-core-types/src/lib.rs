//! Types shared by the Registrar error and logging facilities
//!
//! - [`SessionId`]: correlation id carried by a persistence session
//! - [`Sensitive`]: redaction wrapper for personal data
//! - [`events`]: field keys, event values and op names used in log events

pub mod correlation;
pub mod events;
pub mod sensitive;

pub use correlation::SessionId;
pub use sensitive::Sensitive;
