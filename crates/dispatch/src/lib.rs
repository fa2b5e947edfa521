//! Dispatch engine: per-recipient delivery with bounded retries, rate-limit
//! backoff, and one audit record per terminal outcome.

pub mod audit;
pub mod orchestrator;
pub mod recipients;
pub mod sender;

#[cfg(test)]
pub(crate) mod testutil;
