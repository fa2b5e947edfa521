//! Test doubles shared by the sender and orchestrator tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

use courier_common::types::{Delivery, MessageStatus, Recipient};
use courier_gateway::client::{RawResponse, Transport, TransportError};

use crate::audit::AuditSink;

/// Gateway double that replays a scripted sequence of responses.
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<RawResponse, TransportError>>>,
    calls: AtomicU32,
}

impl ScriptedTransport {
    pub fn new(responses: Vec<Result<RawResponse, TransportError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: AtomicU32::new(0),
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Transport for ScriptedTransport {
    async fn send(&self, _to: &str, _text: &str) -> Result<RawResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("gateway called more times than scripted")
    }
}

/// In-memory audit sink recording (recipient id, status) pairs.
#[derive(Default)]
pub struct MemoryAuditSink {
    pub records: Mutex<Vec<(i64, MessageStatus)>>,
}

impl AuditSink for MemoryAuditSink {
    async fn record(&self, recipient: &Recipient, _body: &str, delivery: &Delivery) {
        self.records
            .lock()
            .unwrap()
            .push((recipient.id, delivery.outcome.status()));
    }
}

pub fn http(status: u16, retry_after: Option<u64>, body: &str) -> Result<RawResponse, TransportError> {
    Ok(RawResponse {
        status,
        retry_after,
        body: body.to_string(),
    })
}

pub fn accepted(message_id: &str) -> Result<RawResponse, TransportError> {
    http(
        200,
        None,
        &format!(
            r#"{{"messages":[{{"messageId":"{message_id}","status":{{"groupId":1,"description":"Message sent"}}}}]}}"#
        ),
    )
}

pub fn rejected_group(description: &str) -> Result<RawResponse, TransportError> {
    http(
        200,
        None,
        &format!(
            r#"{{"messages":[{{"messageId":"rej-1","status":{{"groupId":5,"description":"{description}"}}}}]}}"#
        ),
    )
}

pub fn timeout() -> Result<RawResponse, TransportError> {
    Err(TransportError("connection timed out".to_string()))
}
