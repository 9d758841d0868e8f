use crate::config::{redacted, PropertySchema, TrackerConfig};
use crate::error::{NotionError, NotionResult};
use crate::filter::Filter;
use crate::manga::{MangaRecord, PagePatch};
use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::fmt;

const VERSION_HEADER: &str = "Notion-Version";

#[derive(Debug, Deserialize)]
struct QueryResponse {
    results: Vec<Page>,
    #[serde(default)]
    has_more: bool,
}

#[derive(Debug, Deserialize)]
pub struct Page {
    pub id: String,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Everything a request needs: client, endpoint, database and the auth headers.
pub struct NotionSession {
    client: Client,
    api_url: String,
    database_id: String,
    headers: HeaderMap,
    pub schema: PropertySchema,
    pub category: String,
    token_state: &'static str,
}

impl fmt::Debug for NotionSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotionSession")
            .field("api_url", &self.api_url)
            .field("database_id", &self.database_id)
            .field("token", &self.token_state)
            .field("schema", &self.schema)
            .field("category", &self.category)
            .finish()
    }
}

impl NotionSession {
    pub fn new(cfg: &TrackerConfig) -> NotionResult<Self> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", cfg.token))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(VERSION_HEADER, HeaderValue::from_str(&cfg.notion_version)?);

        Ok(Self {
            client: Client::new(),
            api_url: cfg.api_url.trim_end_matches('/').to_string(),
            database_id: cfg.database_id.clone(),
            headers,
            schema: cfg.properties.clone(),
            category: cfg.category.clone(),
            token_state: redacted(&cfg.token),
        })
    }

    fn send_query_request(&self, body: Value) -> reqwest::Result<Response> {
        self.client
            .post(format!("{}/databases/{}/query", self.api_url, self.database_id))
            .headers(self.headers.clone())
            .json(&body)
            .send()
    }

    fn send_patch_request(&self, page_id: &str, body: Value) -> reqwest::Result<Response> {
        self.client
            .patch(format!("{}/pages/{}", self.api_url, page_id))
            .headers(self.headers.clone())
            .json(&body)
            .send()
    }

    /// Runs one query against the database and decodes the first page of results.
    pub fn query(&self, filter: &Filter) -> NotionResult<Vec<MangaRecord>> {
        let body = json!({ "filter": filter.to_json() });
        tracing::debug!(%body, "querying database");

        let resp: QueryResponse = check_status(self.send_query_request(body)?)?.json()?;
        if resp.has_more {
            tracing::warn!(
                returned = resp.results.len(),
                "more results are available than one response holds, only the first page is used"
            );
        }

        resp.results
            .iter()
            .map(|page| MangaRecord::from_page(page, &self.schema))
            .collect()
    }

    pub fn query_unfinished(&self) -> NotionResult<Vec<MangaRecord>> {
        self.query(&Filter::unfinished(&self.schema))
    }

    pub fn query_category(&self) -> NotionResult<Vec<MangaRecord>> {
        self.query(&Filter::unfinished_in_category(&self.schema, &self.category))
    }

    /// Every record whose title is exactly `name`.
    pub fn find_by_title(&self, name: &str) -> NotionResult<Vec<MangaRecord>> {
        self.query(&Filter::title_equals(&self.schema, name))
    }

    pub fn update_page(&self, patch: &PagePatch) -> NotionResult<()> {
        let body = patch.body(&self.schema);
        tracing::debug!(page = %patch.page_id, %body, "patching page");

        check_status(self.send_patch_request(&patch.page_id, body)?)?;
        Ok(())
    }
}

fn check_status(resp: Response) -> NotionResult<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let text = resp.text().unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|body| body.message)
        .unwrap_or(text);
    tracing::debug!(%status, %message, "request rejected");

    Err(NotionError::Status { status, message })
}
