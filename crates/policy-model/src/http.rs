//! HTTP request and response descriptors.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::{Action, Method};

/// One parsed HTTP request inside a bumped TLS flow.
///
/// Policies may mutate `path` (soft redirect to an inert resource),
/// `header`, and `action`. Request-side rules never fabricate a
/// response body; body fabrication is a response-side concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    /// Address of the connecting client.
    pub client_ip: String,

    /// Authenticated user, if the host resolved one.
    pub user: String,

    /// HTTP method.
    pub method: Method,

    /// Full request URL as the host reassembled it.
    pub url: String,

    /// Target host, the request's lookup key in the rule table.
    pub host: String,

    /// Request path, without the query string.
    pub path: String,

    /// Request headers.
    pub header: BTreeMap<String, String>,

    /// Parsed query parameters.
    pub query: BTreeMap<String, String>,

    /// ACL names the host already assigned.
    pub acls: BTreeSet<String>,

    /// Category scores computed by the host.
    pub scores: BTreeMap<String, i64>,

    /// Outcome for this request.
    pub action: Action,

    /// Actions the host is willing to honor.
    pub possible_actions: Vec<String>,
}

impl Request {
    /// Builds a request descriptor with the fields policies actually
    /// match on; everything else starts empty.
    pub fn new(method: Method, host: impl Into<String>, path: impl Into<String>) -> Self {
        let host = host.into();
        let path = path.into();
        Self {
            client_ip: String::new(),
            user: String::new(),
            method,
            url: format!("https://{host}{path}"),
            host,
            path,
            header: BTreeMap::new(),
            query: BTreeMap::new(),
            acls: BTreeSet::new(),
            scores: BTreeMap::new(),
            action: Action::Allow,
            possible_actions: Vec::new(),
        }
    }
}

/// One HTTP response, carrying its originating request.
///
/// The embedded [`Request`] is read-only from the policy's
/// perspective and is never reassigned. Policies may mutate `status`,
/// `body`, `header`, and `action`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// The request this response answers.
    pub request: Request,

    /// HTTP status code.
    pub status: u16,

    /// Decoded response body.
    pub body: String,

    /// Response headers.
    pub header: BTreeMap<String, String>,

    /// Query parameters of the originating request.
    pub query: BTreeMap<String, String>,

    /// ACL names the host already assigned.
    pub acls: BTreeSet<String>,

    /// Category scores computed by the host.
    pub scores: BTreeMap<String, i64>,

    /// Outcome for this response.
    pub action: Action,

    /// Actions the host is willing to honor.
    pub possible_actions: Vec<String>,
}

impl Response {
    /// Builds a response descriptor around its originating request.
    pub fn new(request: Request, status: u16, body: impl Into<String>) -> Self {
        Self {
            request,
            status,
            body: body.into(),
            header: BTreeMap::new(),
            query: BTreeMap::new(),
            acls: BTreeSet::new(),
            scores: BTreeMap::new(),
            action: Action::Allow,
            possible_actions: Vec::new(),
        }
    }
}
