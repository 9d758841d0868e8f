#![allow(dead_code)]

use std::io::Read as _;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use serde_json::{json, Value};

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub notion_version: Option<String>,
    pub content_type: Option<String>,
    pub body: Value,
}

impl Recorded {
    pub fn page_id(&self) -> Option<&str> {
        self.path.strip_prefix("/v1/pages/")
    }
}

/// Answers a request with a status code and a JSON body.
pub type Responder = Box<dyn Fn(&Recorded) -> (u16, Value) + Send>;

pub struct NotionStub {
    pub base_url: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
    shutdown_tx: Option<mpsc::Sender<()>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl NotionStub {
    pub fn spawn(responder: Responder) -> Self {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("start notion stub server");
        let addr = server.server_addr();
        let base_url = format!("http://{addr}/v1");

        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&requests);
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

        let handle = thread::spawn(move || loop {
            if shutdown_rx.try_recv().is_ok() {
                break;
            }

            let mut request = match server.recv_timeout(Duration::from_millis(50)) {
                Ok(Some(req)) => req,
                Ok(None) => continue,
                Err(_) => break,
            };

            let header = |name: &'static str| {
                request
                    .headers()
                    .iter()
                    .find(|h| h.field.equiv(name))
                    .map(|h| h.value.as_str().to_owned())
            };
            let authorization = header("Authorization");
            let notion_version = header("Notion-Version");
            let content_type = header("Content-Type");

            let mut raw = String::new();
            let _ = request.as_reader().read_to_string(&mut raw);
            let body = serde_json::from_str(&raw).unwrap_or(Value::Null);

            let recorded = Recorded {
                method: request.method().to_string(),
                path: request.url().to_string(),
                authorization,
                notion_version,
                content_type,
                body,
            };
            let (status, reply) = responder(&recorded);
            seen.lock().expect("lock requests").push(recorded);

            let content_type =
                tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
                    .expect("build header");
            let response = tiny_http::Response::from_string(reply.to_string())
                .with_status_code(status)
                .with_header(content_type);
            let _ = request.respond(response);
        });

        Self {
            base_url,
            requests,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        }
    }

    /// A stub backed by an in-memory database that evaluates query filters.
    pub fn with_pages(pages: Vec<Value>) -> Self {
        Self::spawn(database(pages, |_| None))
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().expect("lock requests").clone()
    }

    pub fn queries(&self) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == "POST")
            .collect()
    }

    pub fn patches(&self) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == "PATCH")
            .collect()
    }
}

impl Drop for NotionStub {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Serves `pages` for queries. `patch_failure` may turn a PATCH into an error reply.
pub fn database(
    pages: Vec<Value>,
    patch_failure: impl Fn(&str) -> Option<(u16, &'static str)> + Send + 'static,
) -> Responder {
    Box::new(move |req: &Recorded| match req.method.as_str() {
        "POST" if req.path.ends_with("/query") => {
            let results: Vec<Value> = pages
                .iter()
                .filter(|page| matches(page, &req.body["filter"]))
                .cloned()
                .collect();
            (200, json!({ "object": "list", "results": results, "has_more": false }))
        }
        "PATCH" => match patch_failure(req.page_id().unwrap_or_default()) {
            Some((status, message)) => error(status, message),
            None => (200, json!({ "object": "page", "id": req.page_id() })),
        },
        _ => error(404, "unknown endpoint"),
    })
}

pub fn error(status: u16, message: &str) -> (u16, Value) {
    (
        status,
        json!({ "object": "error", "status": status, "message": message }),
    )
}

fn matches(page: &Value, filter: &Value) -> bool {
    if let Some(clauses) = filter["and"].as_array() {
        return clauses.iter().all(|clause| matches(page, clause));
    }

    let Some(property) = filter["property"].as_str() else {
        return true;
    };
    let value = &page["properties"][property];

    if let Some(equals) = filter["checkbox"]["equals"].as_bool() {
        return value["checkbox"].as_bool() == Some(equals);
    }
    if let Some(equals) = filter["title"]["equals"].as_str() {
        return value["title"][0]["text"]["content"].as_str() == Some(equals);
    }
    if let Some(equals) = filter["select"]["equals"].as_str() {
        return value["select"]["name"].as_str() == Some(equals);
    }
    false
}

/// A database page with the default property names.
pub fn page(id: &str, title: &str, chapter: f64, finished: bool, category: &str) -> Value {
    json!({
        "object": "page",
        "id": id,
        "properties": {
            "Name": {
                "id": "title",
                "type": "title",
                "title": [
                    { "type": "text", "text": { "content": title, "link": null }, "plain_text": title }
                ]
            },
            "Last Chapter": { "type": "number", "number": chapter },
            "Finished": { "type": "checkbox", "checkbox": finished },
            "Category": { "type": "select", "select": { "name": category } }
        }
    })
}
