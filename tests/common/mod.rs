//! Scripted backend and fixtures shared by the integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::oneshot;

use bookshelf::api::{ApiReply, ApiRequest, Transport};
use bookshelf::domain::{LibraryError, Result};
use bookshelf::storage::{MemoryStorage, Storage};
use bookshelf::{Library, SessionStore};

pub const TOKEN: &str = "token-abc";

enum Scripted {
    Reply(ApiReply),
    Gated(oneshot::Receiver<()>, ApiReply),
    Fail(String),
}

/// In-memory [`Transport`] answering from per-route scripts.
///
/// Routes are keyed as `"METHOD /path"`, e.g. `"GET /books"`. Unscripted
/// requests get a 404. Every request is recorded.
#[derive(Default)]
pub struct FakeBackend {
    scripts: Mutex<HashMap<String, VecDeque<Scripted>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn push(&self, route: &str, scripted: Scripted) {
        self.scripts
            .lock()
            .unwrap()
            .entry(route.to_string())
            .or_default()
            .push_back(scripted);
    }

    /// Queues a reply for the next request to `route`.
    pub fn reply(&self, route: &str, status: u16, body: Value) {
        let body = if body.is_null() {
            String::new()
        } else {
            body.to_string()
        };
        self.push(route, Scripted::Reply(ApiReply::new(status, body)));
    }

    /// Queues a reply that is held back until the returned sender fires.
    pub fn reply_when(&self, route: &str, status: u16, body: Value) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.push(route, Scripted::Gated(rx, ApiReply::new(status, body.to_string())));
        tx
    }

    /// Queues a transport failure (no HTTP response).
    pub fn fail(&self, route: &str, reason: &str) {
        self.push(route, Scripted::Fail(reason.to_string()));
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Requests sent to `route`.
    pub fn requests_to(&self, route: &str) -> Vec<ApiRequest> {
        self.requests()
            .into_iter()
            .filter(|r| key(r) == route)
            .collect()
    }

    pub fn count(&self, route: &str) -> usize {
        self.requests_to(route).len()
    }
}

fn key(request: &ApiRequest) -> String {
    format!("{} {}", request.method, request.route())
}

#[async_trait]
impl Transport for FakeBackend {
    async fn send(&self, request: ApiRequest) -> Result<ApiReply> {
        let route = key(&request);
        self.requests.lock().unwrap().push(request);

        let next = self
            .scripts
            .lock()
            .unwrap()
            .get_mut(&route)
            .and_then(VecDeque::pop_front);

        match next {
            Some(Scripted::Reply(reply)) => Ok(reply),
            Some(Scripted::Gated(gate, reply)) => {
                let _ = gate.await;
                Ok(reply)
            }
            Some(Scripted::Fail(reason)) => Err(LibraryError::Network(reason)),
            None => Ok(ApiReply::new(404, json!({"message": "Not Found"}).to_string())),
        }
    }
}

/// Storage that stays readable from the test after being handed to a store.
#[derive(Clone, Default)]
pub struct SharedStorage(pub Arc<Mutex<MemoryStorage>>);

impl SharedStorage {
    pub fn with_entries(entries: &[(&str, &str)]) -> Self {
        Self(Arc::new(Mutex::new(MemoryStorage::with_entries(entries))))
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.0.lock().unwrap().get(key).unwrap()
    }

    pub fn is_empty(&self) -> bool {
        self.0.lock().unwrap().is_empty()
    }
}

impl Storage for SharedStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.0.lock().unwrap().get(key)
    }

    fn put_all(&mut self, entries: &[(&str, &str)]) -> Result<()> {
        self.0.lock().unwrap().put_all(entries)
    }

    fn remove_all(&mut self, keys: &[&str]) -> Result<()> {
        self.0.lock().unwrap().remove_all(keys)
    }
}

pub fn user_json() -> Value {
    json!({
        "id": "u1",
        "email": "ada@example.com",
        "firstName": "Ada",
        "lastName": "Lovelace",
        "role": "user"
    })
}

pub fn auth_json() -> Value {
    json!({ "access_token": TOKEN, "user": user_json() })
}

pub fn book_json(id: &str, title: &str, year: Option<i32>, genre: Option<&str>) -> Value {
    json!({
        "id": id,
        "title": title,
        "author": "Some Author",
        "published_year": year,
        "genre": genre,
        "created_at": "2024-01-01T00:00:00Z",
        "updated_at": "2024-01-02T00:00:00Z"
    })
}

pub fn page_json(records: Vec<Value>, page: u32, total_pages: u32) -> Value {
    json!({ "data": records, "page": page, "totalPages": total_pages })
}

pub fn session(backend: &Arc<FakeBackend>, storage: SharedStorage) -> SessionStore {
    SessionStore::new(Box::new(storage), backend.clone())
}

/// A library with a signed-in session and an empty fake backend.
pub async fn signed_in_library(backend: &Arc<FakeBackend>, page_size: u32) -> Library {
    let library = Library::new(Box::new(MemoryStorage::new()), backend.clone(), page_size);
    backend.reply("POST /auth/login", 200, auth_json());
    library
        .session
        .login("ada@example.com", "secret1")
        .await
        .unwrap();
    library
}
