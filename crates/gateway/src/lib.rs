//! Messaging gateway client.
//!
//! Wire types for the gateway's JSON contract, the HTTP status→reason table,
//! and the [`Transport`] seam with its reqwest-backed implementation. One
//! round trip per call; retry policy lives in `courier-dispatch`.

pub mod client;
pub mod status;
pub mod wire;

pub use client::{HttpGatewayClient, RawResponse, Transport, TransportError};
