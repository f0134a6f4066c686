use crate::server::{
    fixtures::TASKS_PREFIX,
    handler::Error::{
        RequestBodyDeserializeError, ResponseBodyConversionError, ResponseBodySerializeError,
    },
    state::{Fixture, StateManager},
};

use async_trait::async_trait;
use bytes::Bytes;
use http::{Method, Request, Response, StatusCode};
use serde::Serialize;
use serde_json::{json, Value};
use std::{collections::BTreeMap, sync::Arc};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("cannot deserialize request body: {0}")]
    RequestBodyDeserializeError(serde_json::Error),
    #[error("cannot serialize response body: {0}")]
    ResponseBodySerializeError(serde_json::Error),
    #[error("cannot convert response body: {0}")]
    ResponseBodyConversionError(http::Error),
    #[error("no fixture under {prefix} for key {key}")]
    UnknownFixtureKey { prefix: String, key: String },
}

#[async_trait]
pub trait Handler {
    async fn handle(&self, req: Request<Bytes>) -> Result<Response<Bytes>, Error>;
}

/// Collection responses mimic a cursor-paginated API. The server never pages,
/// so the cursor is always null.
#[derive(Serialize)]
struct Page {
    results: Vec<Value>,
    next_cursor: Option<String>,
}

/// The demo script renames the second task in the fixture list to this content
/// via a plain POST, to make an edit action look persisted.
const RENAME_CONTENT: &str = "be lazy";
const RENAME_POSITION: usize = 1;

const CLOSE_SUFFIX: &str = "/close";

pub struct FixtureHandler<S>
where
    S: StateManager + Send + Sync + 'static,
{
    state: Arc<S>,
    canned_responses: BTreeMap<&'static str, Value>,
}

#[async_trait]
impl<S> Handler for FixtureHandler<S>
where
    S: StateManager + Send + Sync + 'static,
{
    async fn handle(&self, req: Request<Bytes>) -> Result<Response<Bytes>, Error> {
        tracing::trace!("routing incoming request: {} {}", req.method(), req.uri());

        match *req.method() {
            Method::GET => self.handle_get(&req),
            Method::POST => self.handle_post(&req),
            _ => empty_response(StatusCode::NOT_FOUND),
        }
    }
}

impl<S> FixtureHandler<S>
where
    S: StateManager + Send + Sync + 'static,
{
    pub fn new(state: Arc<S>) -> Self {
        Self {
            state,
            canned_responses: content_responses(),
        }
    }

    /// Serves a GET request from the fixture store.
    ///
    /// The first route prefix that is a string prefix of the request's
    /// path-and-query wins; the remaining suffix (normalized to `"/"` when
    /// empty) selects the fixture under that resource. A matching prefix with
    /// an unknown suffix fails the request, paths outside every prefix are a
    /// plain 404.
    fn handle_get(&self, req: &Request<Bytes>) -> Result<Response<Bytes>, Error> {
        let path = req
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");

        for prefix in self.state.route_prefixes() {
            let Some(suffix) = path.strip_prefix(prefix.as_str()) else {
                continue;
            };
            let key = if suffix.is_empty() { "/" } else { suffix };

            return match self.state.fixture(&prefix, key) {
                Some(Fixture::Collection(results)) => json_response(
                    StatusCode::OK,
                    &Page {
                        results,
                        next_cursor: None,
                    },
                ),
                Some(Fixture::Item(item)) => json_response(StatusCode::OK, &item),
                None => Err(Error::UnknownFixtureKey {
                    prefix,
                    key: key.to_string(),
                }),
            };
        }

        empty_response(StatusCode::NOT_FOUND)
    }

    /// Accepts a POST on any path and applies the scripted demo mutations.
    ///
    /// A body whose `content` matches a canned create response returns that
    /// response directly. Otherwise the rename and close mutations run
    /// independently and the request ends in an empty 204.
    fn handle_post(&self, req: &Request<Bytes>) -> Result<Response<Bytes>, Error> {
        let content = request_content(req.body())?;

        if let Some(content) = content.as_deref() {
            if let Some(canned) = self.canned_responses.get(content) {
                return json_response(StatusCode::OK, canned);
            }

            if content == RENAME_CONTENT {
                self.state
                    .set_content(TASKS_PREFIX, RENAME_POSITION, RENAME_CONTENT);
            }
        }

        if let Some(id) = close_target(req.uri().path()) {
            self.state.check_item(TASKS_PREFIX, id);
        }

        empty_response(StatusCode::NO_CONTENT)
    }
}

/// Extracts the `content` string from a JSON request body, if any. An empty
/// body is fine, a body that is not valid JSON fails the request.
fn request_content(body: &Bytes) -> Result<Option<String>, Error> {
    if body.is_empty() {
        return Ok(None);
    }

    let value: Value = serde_json::from_slice(body).map_err(RequestBodyDeserializeError)?;
    Ok(value
        .get("content")
        .and_then(Value::as_str)
        .map(str::to_string))
}

/// Returns the id segment of a `/<id>/close` path, if the path ends in one.
fn close_target(path: &str) -> Option<&str> {
    let stem = path.strip_suffix(CLOSE_SUFFIX)?;
    let (_, id) = stem.rsplit_once('/')?;
    (!id.is_empty()).then_some(id)
}

/// Canned replies for task-creation requests, keyed by the exact `content` the
/// client claims to be creating. This is what makes a scripted `add` look like
/// the backend accepted it.
fn content_responses() -> BTreeMap<&'static str, Value> {
    BTreeMap::from([(
        "do the laundry",
        json!({
            "id": "7000005",
            "project_id": "6000001",
            "section_id": null,
            "content": "do the laundry",
            "description": "",
            "priority": 1,
            "labels": [],
            "due": { "date": "2024-03-18", "string": "today", "is_recurring": false },
            "checked": false,
            "added_at": "2024-03-18T10:00:00Z",
            "url": "https://app.example.com/tasks/7000005"
        }),
    )])
}

fn json_response<T>(status: StatusCode, body: &T) -> Result<Response<Bytes>, Error>
where
    T: Serialize,
{
    let body_bytes = serde_json::to_vec(body).map_err(ResponseBodySerializeError)?;

    Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .body(Bytes::from(body_bytes))
        .map_err(ResponseBodyConversionError)
}

fn empty_response(status: StatusCode) -> Result<Response<Bytes>, Error> {
    Response::builder()
        .status(status)
        .body(Bytes::new())
        .map_err(ResponseBodyConversionError)
}
