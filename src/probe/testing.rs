//! Scripted transport for unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;

use crate::probe::transport::{ProbeMethod, Transport, TransportError};
use crate::probe::types::ProbeResponse;

#[derive(Debug, Clone)]
struct Reply {
    response: Option<ProbeResponse>,
    delay: Duration,
}

/// Answers from a route table and counts every request it sees.
/// Unrouted requests fail like a refused connection.
#[derive(Default)]
pub struct StubTransport {
    routes: Mutex<HashMap<(ProbeMethod, String), Reply>>,
    calls: AtomicUsize,
    per_route: Mutex<HashMap<(ProbeMethod, String), usize>>,
}

impl StubTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(self, method: ProbeMethod, url: &str, response: ProbeResponse) -> Self {
        self.route_delayed(method, url, response, Duration::ZERO)
    }

    pub fn route_delayed(
        self,
        method: ProbeMethod,
        url: &str,
        response: ProbeResponse,
        delay: Duration,
    ) -> Self {
        self.insert(method, url, Reply { response: Some(response), delay });
        self
    }

    /// Requests to `url` never answer.
    pub fn hang(self, method: ProbeMethod, url: &str) -> Self {
        self.insert(
            method,
            url,
            Reply {
                response: None,
                delay: Duration::from_secs(3600),
            },
        );
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn calls_to(&self, method: ProbeMethod, url: &str) -> usize {
        self.per_route
            .lock()
            .unwrap()
            .get(&(method, url.to_string()))
            .copied()
            .unwrap_or(0)
    }

    fn insert(&self, method: ProbeMethod, url: &str, reply: Reply) {
        self.routes.lock().unwrap().insert((method, url.to_string()), reply);
    }
}

impl Transport for StubTransport {
    fn send<'a>(
        &'a self,
        method: ProbeMethod,
        url: &'a str,
    ) -> BoxFuture<'a, Result<ProbeResponse, TransportError>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let key = (method, url.to_string());
        *self.per_route.lock().unwrap().entry(key.clone()).or_default() += 1;
        let reply = self.routes.lock().unwrap().get(&key).cloned();

        async move {
            let Some(reply) = reply else {
                return Err(TransportError::Setup(format!("connection refused: {url}")));
            };
            if !reply.delay.is_zero() {
                tokio::time::sleep(reply.delay).await;
            }
            reply
                .response
                .ok_or_else(|| TransportError::Setup(format!("connection reset: {url}")))
        }
        .boxed()
    }
}
