#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use http::{Method, Request, StatusCode};
use hutch::{Client, ClientConfig, HttpError, LogSink, RawResponse, Transport};

/// Request as the fake transport saw it.
#[derive(Debug, Clone)]
pub struct Seen {
    pub method: Method,
    pub uri: String,
    pub body: Bytes,
}

impl Seen {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

/// Scripted transport: answers from a queue and records every request.
///
/// With `hang()` it never answers, which lets tests fire a cancellation
/// token while a call is in flight.
#[derive(Default)]
pub struct FakeTransport {
    responses: Mutex<VecDeque<RawResponse>>,
    seen: Mutex<Vec<Seen>>,
    hang: bool,
}

impl FakeTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn hang() -> Arc<Self> {
        Arc::new(Self {
            hang: true,
            ..Self::default()
        })
    }

    pub fn respond(self: &Arc<Self>, status: StatusCode, body: serde_json::Value) -> Arc<Self> {
        self.responses
            .lock()
            .unwrap()
            .push_back(RawResponse::json(status, &body));
        Arc::clone(self)
    }

    pub fn respond_empty(self: &Arc<Self>, status: StatusCode) -> Arc<Self> {
        self.responses
            .lock()
            .unwrap()
            .push_back(RawResponse::new(status, ""));
        Arc::clone(self)
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    pub fn seen(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }

    pub fn last(&self) -> Seen {
        self.seen.lock().unwrap().last().cloned().unwrap()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send(&self, request: Request<Bytes>) -> Result<RawResponse, HttpError> {
        self.seen.lock().unwrap().push(Seen {
            method: request.method().clone(),
            uri: request.uri().to_string(),
            body: request.body().clone(),
        });
        if self.hang {
            std::future::pending::<()>().await;
        }
        let next = self.responses.lock().unwrap().pop_front();
        Ok(next.unwrap_or_else(|| RawResponse::new(StatusCode::INTERNAL_SERVER_ERROR, "")))
    }
}

/// Log sink that keeps every line.
#[derive(Default)]
pub struct CapturedLog {
    pub lines: Mutex<Vec<String>>,
}

impl CapturedLog {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl LogSink for CapturedLog {
    fn info(&self, message: &str) {
        self.lines.lock().unwrap().push(format!("INFO {message}"));
    }

    fn error(&self, message: &str) {
        self.lines.lock().unwrap().push(format!("ERROR {message}"));
    }
}

pub const HOST: &str = "http://localhost:15672";

pub fn config() -> ClientConfig {
    Client::builder()
        .connect_to(HOST)
        .authenticate_as("guest", "guest")
        .build()
        .unwrap()
}

pub fn client(transport: &Arc<FakeTransport>) -> Client {
    Client::with_transport(config(), transport.clone())
}
