//! Shared fixtures for integration tests
//!
//! A scripted in-memory transport standing in for the Notion API.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use notion_cache::{ApiRequest, ClientConfig, Method, NotionClient, NotionError, Result, Transport};
use serde_json::{json, Value};

/// Answers requests from per-path scripts and records every call.
///
/// Paths without a script get a default object echoing the path and the
/// call number, so two fetches of one path are distinguishable.
#[derive(Default)]
pub struct ScriptedTransport {
    calls: Mutex<Vec<ApiRequest>>,
    scripts: Mutex<HashMap<String, VecDeque<Result<Value>>>>,
    latency: Option<Duration>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Transport that sleeps before answering, to overlap concurrent calls.
    pub fn with_latency(latency: Duration) -> Arc<Self> {
        Arc::new(Self {
            latency: Some(latency),
            ..Self::default()
        })
    }

    pub fn respond(&self, path: &str, value: Value) {
        self.push(path, Ok(value));
    }

    pub fn fail(&self, path: &str, status: u16) {
        let body = json!({"object": "error", "code": "scripted", "message": "scripted failure"});
        self.push(path, Err(NotionError::from_status(status, &body.to_string())));
    }

    fn push(&self, path: &str, response: Result<Value>) {
        self.scripts
            .lock()
            .unwrap()
            .entry(path.to_string())
            .or_default()
            .push_back(response);
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls_to(&self, method: Method, path: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    pub fn last_call(&self) -> ApiRequest {
        self.calls.lock().unwrap().last().cloned().expect("no calls recorded")
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn perform(&self, request: ApiRequest) -> Result<Value> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let path = request.path.clone();
        let call_number = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(request);
            calls.len()
        };

        let scripted = self
            .scripts
            .lock()
            .unwrap()
            .get_mut(&path)
            .and_then(VecDeque::pop_front);
        scripted.unwrap_or_else(|| Ok(json!({"path": path, "call": call_number})))
    }
}

pub fn config() -> ClientConfig {
    ClientConfig::new("secret_integration_test")
}

pub fn client_with(config: ClientConfig, transport: &Arc<ScriptedTransport>) -> NotionClient {
    NotionClient::with_transport(config, transport.clone()).expect("valid test config")
}

pub fn client(transport: &Arc<ScriptedTransport>) -> NotionClient {
    client_with(config(), transport)
}
