//! Scripted in-memory transport shared by the unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{FixedOffset, Locale};
use tokio::sync::Semaphore;
use url::Url;

use crate::api::BlogApi;
use crate::client::BlogClient;
use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::store::BlogStore;
use crate::transport::Transport;
use crate::types::{Blog, BlogCategory};
use crate::views::{DateFormat, DisplayZone};

pub const STUB_BASE_URL: &str = "http://stub.test";

enum Reply {
    Respond(HttpResponse),
    Fail(String),
}

struct Scripted {
    route: Option<(HttpMethod, String)>,
    reply: Reply,
}

#[derive(Default)]
struct StubState {
    script: VecDeque<Scripted>,
    requests: Vec<HttpRequest>,
}

/// Answers requests from a script, first matching entry wins. Unscripted
/// requests get a 500. While held, requests are recorded but do not complete
/// until `release` is called.
#[derive(Clone)]
pub struct StubTransport {
    state: Arc<Mutex<StubState>>,
    gate: Arc<Semaphore>,
}

impl StubTransport {
    pub fn new() -> Self {
        Self {
            state: Arc::default(),
            gate: Arc::new(Semaphore::new(1)),
        }
    }

    pub fn api(&self) -> BlogApi {
        let base = Url::parse(STUB_BASE_URL).unwrap();
        BlogApi::new(BlogClient::new(&base), Arc::new(self.clone()))
    }

    pub fn store(&self) -> BlogStore {
        BlogStore::new(self.api())
    }

    pub fn respond(&self, status: u16, status_text: &str, body: impl Into<String>) {
        self.push(None, Reply::Respond(response(status, status_text, body)));
    }

    pub fn respond_ok(&self, body: impl Into<String>) {
        self.respond(200, "OK", body);
    }

    /// Script a reply for one request whose method matches and whose URL
    /// ends with `path`.
    pub fn respond_to(&self, method: HttpMethod, path: &str, status: u16, body: impl Into<String>) {
        let status_text = if status < 300 { "OK" } else { "Internal Server Error" };
        self.push(
            Some((method, path.to_string())),
            Reply::Respond(response(status, status_text, body)),
        );
    }

    pub fn fail(&self, reason: &str) {
        self.push(None, Reply::Fail(reason.to_string()));
    }

    pub fn hold(&self) {
        self.gate.forget_permits(1);
    }

    pub fn release(&self) {
        self.gate.add_permits(1);
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.state.lock().unwrap().requests.len()
    }

    fn push(&self, route: Option<(HttpMethod, String)>, reply: Reply) {
        self.state.lock().unwrap().script.push_back(Scripted { route, reply });
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let scripted = {
            let mut state = self.state.lock().unwrap();
            state.requests.push(request.clone());
            let position = state.script.iter().position(|entry| match &entry.route {
                Some((method, path)) => *method == request.method && request.url.ends_with(path),
                None => true,
            });
            position.and_then(|index| state.script.remove(index))
        };

        let _permit = self.gate.acquire().await.unwrap();

        match scripted.map(|entry| entry.reply) {
            Some(Reply::Respond(response)) => Ok(response),
            Some(Reply::Fail(reason)) => Err(TransportError(reason)),
            None => Ok(response(500, "Internal Server Error", "unscripted request")),
        }
    }
}

fn response(status: u16, status_text: &str, body: impl Into<String>) -> HttpResponse {
    HttpResponse {
        status,
        status_text: status_text.to_string(),
        headers: Vec::new(),
        body: body.into(),
    }
}

pub fn blog(id: &str, title: &str) -> Blog {
    Blog {
        id: id.to_string(),
        title: title.to_string(),
        category: vec![BlogCategory::Finance, BlogCategory::Tech],
        description: format!("About {title}"),
        date: "2026-01-11T09:12:45.120Z".to_string(),
        cover_image: String::new(),
        content: format!("{title} body"),
    }
}

pub fn blog_json(blog: &Blog) -> String {
    serde_json::to_string(blog).unwrap()
}

pub fn blogs_json(blogs: &[Blog]) -> String {
    serde_json::to_string(blogs).unwrap()
}

/// `en_US` dates in UTC, independent of the host's zone and locale.
pub fn utc_dates() -> DateFormat {
    DateFormat::new(DisplayZone::Fixed(FixedOffset::east_opt(0).unwrap()), Locale::en_US)
}
