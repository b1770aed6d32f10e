//! Types for Elastic Email delivery.
//!
//! - [`Address`] and [`Message`]: the structured email consumed by the pipeline
//! - [`SendOption`] and [`SendOptions`]: provider-specific options attached to a message
//! - [`WireValue`] and [`WireFields`]: the flat mapping sent to the API
//! - [`SendResult`]: the JSON envelope the API answers with

mod address;
mod message;
mod options;
mod responses;
mod wire;

pub use address::*;
pub use message::*;
pub use options::*;
pub use responses::*;
pub use wire::*;
