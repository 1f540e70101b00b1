// This file is part of the product Groceries.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::net::TcpListener;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeIndex {
    pub primary_key: Option<String>,
    pub documents: BTreeMap<u64, String>,
}

#[derive(Default)]
pub struct FakeState {
    pub indexes: BTreeMap<String, FakeIndex>,
    tasks: Vec<Value>,
    pub search_bodies: Vec<Value>,
}

impl FakeState {
    fn enqueue(&mut self, outcome: Result<(), (&str, String)>) -> HttpResponse {
        let task = match outcome {
            Ok(()) => json!({"status": "succeeded"}),
            Err((code, message)) => json!({
                "status": "failed",
                "error": {"code": code, "message": message}
            }),
        };
        self.tasks.push(task);
        HttpResponse::Accepted().json(json!({
            "taskUid": self.tasks.len() - 1,
            "status": "enqueued"
        }))
    }
}

/// Minimal Meilisearch stand-in covering the endpoints the adapter uses.
/// Tasks complete immediately.
#[derive(Clone)]
pub struct FakeMeili {
    pub state: Arc<Mutex<FakeState>>,
    api_key: Arc<String>,
    down: Arc<AtomicBool>,
}

impl FakeMeili {
    pub fn new(api_key: &str) -> Self {
        Self {
            state: Arc::new(Mutex::new(FakeState::default())),
            api_key: Arc::new(api_key.to_string()),
            down: Arc::new(AtomicBool::new(false)),
        }
    }

    /// While down, every authenticated endpoint answers 503.
    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }

    pub fn add_index(&self, uid: &str) {
        self.state.lock().unwrap().indexes.insert(
            uid.to_string(),
            FakeIndex {
                primary_key: None,
                documents: BTreeMap::new(),
            },
        );
    }

    pub fn index(&self, uid: &str) -> Option<FakeIndex> {
        self.state.lock().unwrap().indexes.get(uid).cloned()
    }

    pub fn index_uids(&self) -> Vec<String> {
        self.state.lock().unwrap().indexes.keys().cloned().collect()
    }

    pub fn last_search_body(&self) -> Option<Value> {
        self.state.lock().unwrap().search_bodies.last().cloned()
    }

    /// Serves on an ephemeral port and returns the base URL.
    pub async fn start(&self) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("addr");
        let fake = self.clone();

        actix_web::rt::spawn(async move {
            let _ = HttpServer::new(move || {
                App::new()
                    .app_data(web::Data::new(fake.clone()))
                    .route("/health", web::get().to(health))
                    .route("/indexes", web::get().to(list_indexes))
                    .route("/indexes", web::post().to(create_index))
                    .route("/indexes/{uid}", web::delete().to(delete_index))
                    .route("/indexes/{uid}/documents", web::post().to(add_documents))
                    .route(
                        "/indexes/{uid}/documents/{id}",
                        web::delete().to(delete_document),
                    )
                    .route("/indexes/{uid}/search", web::post().to(search))
                    .route("/tasks/{task_uid}", web::get().to(get_task))
            })
            .workers(1)
            .listen(listener)
            .expect("listen")
            .run()
            .await;
        });

        format!("http://{}", addr)
    }

    fn authorized(&self, req: &HttpRequest) -> Result<(), HttpResponse> {
        if self.down.load(Ordering::SeqCst) {
            return Err(HttpResponse::ServiceUnavailable().json(json!({
                "message": "Meilisearch is shutting down.",
                "code": "internal"
            })));
        }
        let expected = format!("Bearer {}", self.api_key);
        let provided = req
            .headers()
            .get("Authorization")
            .and_then(|value| value.to_str().ok());
        if provided == Some(expected.as_str()) {
            return Ok(());
        }
        Err(HttpResponse::Forbidden().json(json!({
            "message": "The provided API key is invalid.",
            "code": "invalid_api_key"
        })))
    }
}

fn index_not_found(uid: &str) -> HttpResponse {
    HttpResponse::NotFound().json(json!({
        "message": format!("Index `{}` not found.", uid),
        "code": "index_not_found"
    }))
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({"status": "available"}))
}

async fn list_indexes(req: HttpRequest, fake: web::Data<FakeMeili>) -> HttpResponse {
    if let Err(resp) = fake.authorized(&req) {
        return resp;
    }
    let state = fake.state.lock().unwrap();
    let results: Vec<Value> = state
        .indexes
        .iter()
        .map(|(uid, index)| json!({"uid": uid, "primaryKey": index.primary_key}))
        .collect();
    HttpResponse::Ok().json(json!({"results": results, "total": results.len()}))
}

async fn create_index(
    req: HttpRequest,
    fake: web::Data<FakeMeili>,
    body: web::Json<Value>,
) -> HttpResponse {
    if let Err(resp) = fake.authorized(&req) {
        return resp;
    }
    let uid = body["uid"].as_str().unwrap_or_default().to_string();
    let primary_key = body["primaryKey"].as_str().map(str::to_string);
    let mut state = fake.state.lock().unwrap();
    if state.indexes.contains_key(&uid) {
        let message = format!("Index `{}` already exists.", uid);
        return state.enqueue(Err(("index_already_exists", message)));
    }
    state.indexes.insert(
        uid,
        FakeIndex {
            primary_key,
            documents: BTreeMap::new(),
        },
    );
    state.enqueue(Ok(()))
}

async fn delete_index(
    req: HttpRequest,
    fake: web::Data<FakeMeili>,
    path: web::Path<String>,
) -> HttpResponse {
    if let Err(resp) = fake.authorized(&req) {
        return resp;
    }
    let uid = path.into_inner();
    let mut state = fake.state.lock().unwrap();
    if state.indexes.remove(&uid).is_none() {
        let message = format!("Index `{}` not found.", uid);
        return state.enqueue(Err(("index_not_found", message)));
    }
    state.enqueue(Ok(()))
}

async fn add_documents(
    req: HttpRequest,
    fake: web::Data<FakeMeili>,
    path: web::Path<String>,
    body: web::Json<Vec<Value>>,
) -> HttpResponse {
    if let Err(resp) = fake.authorized(&req) {
        return resp;
    }
    let uid = path.into_inner();
    let mut state = fake.state.lock().unwrap();
    let index = state.indexes.entry(uid).or_insert_with(|| FakeIndex {
        primary_key: Some("id".to_string()),
        documents: BTreeMap::new(),
    });
    for doc in body.into_inner() {
        let (Some(id), Some(name)) = (doc["id"].as_u64(), doc["name"].as_str()) else {
            continue;
        };
        index.documents.insert(id, name.to_string());
    }
    state.enqueue(Ok(()))
}

async fn delete_document(
    req: HttpRequest,
    fake: web::Data<FakeMeili>,
    path: web::Path<(String, u64)>,
) -> HttpResponse {
    if let Err(resp) = fake.authorized(&req) {
        return resp;
    }
    let (uid, id) = path.into_inner();
    let mut state = fake.state.lock().unwrap();
    let Some(index) = state.indexes.get_mut(&uid) else {
        return index_not_found(&uid);
    };
    index.documents.remove(&id);
    state.enqueue(Ok(()))
}

async fn search(
    req: HttpRequest,
    fake: web::Data<FakeMeili>,
    path: web::Path<String>,
    body: web::Json<Value>,
) -> HttpResponse {
    if let Err(resp) = fake.authorized(&req) {
        return resp;
    }
    let uid = path.into_inner();
    let body = body.into_inner();
    let mut state = fake.state.lock().unwrap();
    state.search_bodies.push(body.clone());
    let Some(index) = state.indexes.get(&uid) else {
        return index_not_found(&uid);
    };
    let query = body["q"].as_str().unwrap_or_default().to_lowercase();
    let limit = body["limit"].as_u64().unwrap_or(20) as usize;
    let hits: Vec<Value> = index
        .documents
        .iter()
        .filter(|(_, name)| name.to_lowercase().contains(&query))
        .take(limit)
        .map(|(id, name)| json!({"id": id, "name": name}))
        .collect();
    HttpResponse::Ok().json(json!({"hits": hits, "query": query}))
}

async fn get_task(
    req: HttpRequest,
    fake: web::Data<FakeMeili>,
    path: web::Path<usize>,
) -> HttpResponse {
    if let Err(resp) = fake.authorized(&req) {
        return resp;
    }
    let state = fake.state.lock().unwrap();
    match state.tasks.get(path.into_inner()) {
        Some(task) => HttpResponse::Ok().json(task),
        None => HttpResponse::NotFound().json(json!({
            "message": "Task not found.",
            "code": "task_not_found"
        })),
    }
}
