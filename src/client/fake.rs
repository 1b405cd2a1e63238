//! In-memory [`Backend`] for controller tests, plus a local HTTP stub for
//! tests of the real client.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use actix_web::dev::ServerHandle;
use actix_web::{App, HttpServer, web};
use async_trait::async_trait;
use serde_json::Value;

use crate::client::backend::{Backend, Endpoint, RawDownload};
use crate::error::AppError;

/// Serves queued replies per endpoint and records every call in order.
///
/// An endpoint with an empty queue answers its last reply again, so list
/// endpoints can be reloaded any number of times.
#[derive(Default)]
pub struct FakeBackend {
    replies: Mutex<HashMap<Endpoint, VecDeque<Result<Value, AppError>>>>,
    last: Mutex<HashMap<Endpoint, Result<Value, AppError>>>,
    downloads: Mutex<Option<Result<RawDownload, AppError>>>,
    calls: Mutex<Vec<(Endpoint, Option<Value>)>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, endpoint: Endpoint, reply: Result<Value, AppError>) -> Self {
        self.replies
            .lock()
            .unwrap()
            .entry(endpoint)
            .or_default()
            .push_back(reply);
        self
    }

    pub fn ok(self, endpoint: Endpoint, data: Value) -> Self {
        self.reply(endpoint, Ok(data))
    }

    pub fn fail(self, endpoint: Endpoint, error: AppError) -> Self {
        self.reply(endpoint, Err(error))
    }

    pub fn with_download(self, download: Result<RawDownload, AppError>) -> Self {
        *self.downloads.lock().unwrap() = Some(download);
        self
    }

    pub fn calls(&self) -> Vec<(Endpoint, Option<Value>)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn endpoints(&self) -> Vec<Endpoint> {
        self.calls().into_iter().map(|(e, _)| e).collect()
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn send(&self, endpoint: Endpoint, body: Option<Value>) -> Result<Value, AppError> {
        self.calls.lock().unwrap().push((endpoint, body));

        let queued = self
            .replies
            .lock()
            .unwrap()
            .get_mut(&endpoint)
            .and_then(VecDeque::pop_front);

        let mut last = self.last.lock().unwrap();
        match queued {
            Some(reply) => {
                last.insert(endpoint, reply.clone());
                reply
            }
            None => last.get(&endpoint).cloned().unwrap_or_else(|| {
                Err(AppError::Transport(format!("no reply for {}", endpoint.path())))
            }),
        }
    }

    async fn download(&self, endpoint: Endpoint, body: Value) -> Result<RawDownload, AppError> {
        self.calls.lock().unwrap().push((endpoint, Some(body)));
        self.downloads
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Err(AppError::Transport("no download queued".to_string())))
    }
}

/// Backend stand-in served over real HTTP on a free local port.
pub struct StubServer {
    pub base_url: String,
    handle: ServerHandle,
}

impl StubServer {
    pub fn start<F>(routes: F) -> Self
    where
        F: Fn(&mut web::ServiceConfig) + Clone + Send + 'static,
    {
        let server = HttpServer::new(move || App::new().configure(routes.clone()))
            .workers(1)
            .disable_signals()
            .bind(("127.0.0.1", 0))
            .unwrap();
        let addr = server.addrs()[0];
        let server = server.run();
        let handle = server.handle();
        actix_web::rt::spawn(server);

        Self {
            base_url: format!("http://{addr}"),
            handle,
        }
    }

    pub async fn stop(self) {
        self.handle.stop(false).await;
    }
}
