//! Topic messaging between simulation nodes.
//!
//! A [`Broker`] is the in-process hub; each [`Client`] owns a background
//! worker thread that talks to it. Payloads are opaque bytes.

mod broker;
mod client;
mod error;

pub use broker::{Broker, Message, NodeInfo};
pub use client::Client;
pub use error::{CommsError, CommsResult};
