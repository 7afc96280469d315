//! The publishing API boundary.
//!
//! | Call                | HTTP                                       |
//! |---------------------|--------------------------------------------|
//! | `put_live_content`  | `PUT {endpoint}/content{path}`             |
//! | `put_draft_content` | `PUT {endpoint}/draft-content{path}`       |
//! | `put_redirect`      | `PUT {endpoint}/content{path}`             |
//! | `put_intent`        | `PUT {endpoint}/publish-intent{path}`      |
//! | `delete_intent`     | `DELETE {endpoint}/publish-intent{path}`   |
//!
//! Every call is an idempotent upsert (or delete) keyed by path.

use std::collections::{BTreeMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use serde::Serialize;

use herald_core::PublishingApiConfig;
use herald_presenter::{ContentPayload, PublishIntent};

use crate::error::ClientError;

pub trait PublishingClient: Send + Sync {
    fn put_live_content(&self, path: &str, payload: &ContentPayload) -> Result<(), ClientError>;

    fn put_draft_content(&self, path: &str, payload: &ContentPayload) -> Result<(), ClientError>;

    fn put_redirect(&self, path: &str, payload: &ContentPayload) -> Result<(), ClientError>;

    fn put_intent(&self, path: &str, intent: &PublishIntent) -> Result<(), ClientError>;

    /// Removing an intent that does not exist succeeds.
    fn delete_intent(&self, path: &str) -> Result<(), ClientError>;
}

// ---------------------------------------------------------------------------
// HTTP client
// ---------------------------------------------------------------------------

/// Blocking HTTP client for the publishing API.
pub struct HttpPublishingClient {
    agent: ureq::Agent,
    endpoint: String,
    bearer_token: Option<String>,
}

impl HttpPublishingClient {
    pub fn new(endpoint: impl Into<String>, bearer_token: Option<String>, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            agent,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            bearer_token,
        }
    }

    pub fn from_config(config: &PublishingApiConfig) -> Self {
        Self::new(
            config.endpoint.clone(),
            config.bearer_token.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    fn url(&self, resource: &str, path: &str) -> String {
        format!("{}/{resource}{path}", self.endpoint)
    }

    fn request(&self, method: &str, url: &str) -> ureq::Request {
        let request = self.agent.request(method, url);
        match &self.bearer_token {
            Some(token) => request.set("Authorization", &format!("Bearer {token}")),
            None => request,
        }
    }

    fn put_json(&self, url: &str, body: &impl Serialize) -> Result<(), ClientError> {
        let body = serde_json::to_value(body).map_err(|e| ClientError::Encode(e.to_string()))?;
        tracing::debug!(url = %url, "PUT");
        self.request("PUT", url)
            .send_json(body)
            .map(|_| ())
            .map_err(map_ureq_error)
    }
}

fn map_ureq_error(err: ureq::Error) -> ClientError {
    match err {
        ureq::Error::Status(code, response) => ClientError::Status {
            code,
            body: response.into_string().unwrap_or_default(),
        },
        ureq::Error::Transport(transport) => ClientError::Transport(transport.to_string()),
    }
}

impl PublishingClient for HttpPublishingClient {
    fn put_live_content(&self, path: &str, payload: &ContentPayload) -> Result<(), ClientError> {
        self.put_json(&self.url("content", path), payload)
    }

    fn put_draft_content(&self, path: &str, payload: &ContentPayload) -> Result<(), ClientError> {
        self.put_json(&self.url("draft-content", path), payload)
    }

    fn put_redirect(&self, path: &str, payload: &ContentPayload) -> Result<(), ClientError> {
        self.put_json(&self.url("content", path), payload)
    }

    fn put_intent(&self, path: &str, intent: &PublishIntent) -> Result<(), ClientError> {
        self.put_json(&self.url("publish-intent", path), intent)
    }

    fn delete_intent(&self, path: &str) -> Result<(), ClientError> {
        let url = self.url("publish-intent", path);
        tracing::debug!(url = %url, "DELETE");
        match self.request("DELETE", &url).call() {
            Ok(_) => Ok(()),
            Err(ureq::Error::Status(404, _)) => Ok(()),
            Err(e) => Err(map_ureq_error(e)),
        }
    }
}

// ---------------------------------------------------------------------------
// Recording client
// ---------------------------------------------------------------------------

/// A call observed by [`RecordingClient`].
#[derive(Debug, Clone, PartialEq)]
pub enum ClientCall {
    PutLiveContent { path: String, payload: ContentPayload },
    PutDraftContent { path: String, payload: ContentPayload },
    PutRedirect { path: String, payload: ContentPayload },
    PutIntent { path: String, intent: PublishIntent },
    DeleteIntent { path: String },
}

impl ClientCall {
    pub fn path(&self) -> &str {
        match self {
            ClientCall::PutLiveContent { path, .. }
            | ClientCall::PutDraftContent { path, .. }
            | ClientCall::PutRedirect { path, .. }
            | ClientCall::PutIntent { path, .. }
            | ClientCall::DeleteIntent { path } => path,
        }
    }
}

/// Final state of the publishing API as seen through a [`RecordingClient`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RemoteState {
    pub live: BTreeMap<String, ContentPayload>,
    pub draft: BTreeMap<String, ContentPayload>,
    pub intents: BTreeMap<String, PublishIntent>,
}

#[derive(Debug, Default)]
struct Recorded {
    calls: Vec<ClientCall>,
    state: RemoteState,
    failures: VecDeque<ClientError>,
}

/// In-memory publishing API. Records every call, keeps the resulting
/// per-path state, and can be told to fail upcoming calls.
#[derive(Debug, Default)]
pub struct RecordingClient {
    inner: Mutex<Recorded>,
}

impl RecordingClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next call with `err`. Queued failures are consumed in order.
    pub fn fail_next(&self, err: ClientError) {
        self.lock().failures.push_back(err);
    }

    pub fn calls(&self) -> Vec<ClientCall> {
        self.lock().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.lock().calls.len()
    }

    pub fn state(&self) -> RemoteState {
        self.lock().state.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Recorded> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn record(&self, call: ClientCall) -> Result<(), ClientError> {
        let mut inner = self.lock();
        if let Some(err) = inner.failures.pop_front() {
            return Err(err);
        }
        match &call {
            ClientCall::PutLiveContent { path, payload } | ClientCall::PutRedirect { path, payload } => {
                inner.state.live.insert(path.clone(), payload.clone());
            }
            ClientCall::PutDraftContent { path, payload } => {
                inner.state.draft.insert(path.clone(), payload.clone());
            }
            ClientCall::PutIntent { path, intent } => {
                inner.state.intents.insert(path.clone(), intent.clone());
            }
            ClientCall::DeleteIntent { path } => {
                inner.state.intents.remove(path);
            }
        }
        inner.calls.push(call);
        Ok(())
    }
}

impl PublishingClient for RecordingClient {
    fn put_live_content(&self, path: &str, payload: &ContentPayload) -> Result<(), ClientError> {
        self.record(ClientCall::PutLiveContent {
            path: path.to_string(),
            payload: payload.clone(),
        })
    }

    fn put_draft_content(&self, path: &str, payload: &ContentPayload) -> Result<(), ClientError> {
        self.record(ClientCall::PutDraftContent {
            path: path.to_string(),
            payload: payload.clone(),
        })
    }

    fn put_redirect(&self, path: &str, payload: &ContentPayload) -> Result<(), ClientError> {
        self.record(ClientCall::PutRedirect {
            path: path.to_string(),
            payload: payload.clone(),
        })
    }

    fn put_intent(&self, path: &str, intent: &PublishIntent) -> Result<(), ClientError> {
        self.record(ClientCall::PutIntent {
            path: path.to_string(),
            intent: intent.clone(),
        })
    }

    fn delete_intent(&self, path: &str) -> Result<(), ClientError> {
        self.record(ClientCall::DeleteIntent {
            path: path.to_string(),
        })
    }
}
