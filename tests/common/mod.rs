// tests/common/mod.rs

//! Shared test helpers: a scriptable in-memory transport and endpoint builders.

#![allow(dead_code)]

use async_trait::async_trait;
use cacheflush::core::endpoint::ServerEndpoint;
use cacheflush::core::outcome::TransportError;
use cacheflush::core::transport::Transport;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// What the mock transport should do for calls against one host.
#[derive(Debug, Clone)]
pub enum Behavior {
    Ok,
    OkAfter(Duration),
    Refuse,
    Status(u16),
    Hang,
}

/// One call as the dispatcher handed it to the transport.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub endpoint: ServerEndpoint,
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
}

/// A scriptable transport keyed by endpoint host, recording every call.
pub struct MockTransport {
    default: Behavior,
    behaviors: HashMap<String, Behavior>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockTransport {
    pub fn ok() -> Self {
        Self::with_default(Behavior::Ok)
    }

    pub fn with_default(default: Behavior) -> Self {
        Self {
            default,
            behaviors: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn behavior(mut self, host: &str, behavior: Behavior) -> Self {
        self.behaviors.insert(host.to_string(), behavior);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(
        &self,
        endpoint: &ServerEndpoint,
        method: &str,
        path: &str,
        headers: &[(String, String)],
        _timeout: Duration,
    ) -> Result<(), TransportError> {
        self.calls.lock().unwrap().push(RecordedCall {
            endpoint: endpoint.clone(),
            method: method.to_string(),
            path: path.to_string(),
            headers: headers.to_vec(),
        });
        let behavior = self
            .behaviors
            .get(&endpoint.host)
            .unwrap_or(&self.default)
            .clone();
        match behavior {
            Behavior::Ok => Ok(()),
            Behavior::OkAfter(delay) => {
                tokio::time::sleep(delay).await;
                Ok(())
            }
            Behavior::Refuse => Err(TransportError::ConnectionFailed(
                "connection refused".to_string(),
            )),
            Behavior::Status(code) => Err(TransportError::ProxyError(code)),
            Behavior::Hang => {
                std::future::pending::<()>().await;
                unreachable!()
            }
        }
    }
}

/// Builds plain-HTTP endpoints on port 80 from a list of hosts.
pub fn endpoints(hosts: &[&str]) -> Vec<ServerEndpoint> {
    hosts
        .iter()
        .map(|host| ServerEndpoint {
            host: host.to_string(),
            port: 80,
            use_tls: false,
        })
        .collect()
}
