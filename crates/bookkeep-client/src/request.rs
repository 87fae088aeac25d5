//! Outbound requests and their authentication decoration.

use std::sync::Arc;

use bookkeep_common::{session::Session, COMPANY_HEADER};
use bytes::Bytes;
use http::{
    header::{AUTHORIZATION, CONTENT_TYPE},
    HeaderMap, HeaderName, HeaderValue, Method,
};
use serde::Serialize;

use crate::{error, Error};

/// An HTTP call description: method, path relative to the API base URL, headers and body.
#[derive(Clone, Debug)]
pub struct OutboundRequest {
    method: Method,
    path: String,
    headers: HeaderMap,
    body: Bytes,
}

impl OutboundRequest {
    /// A request with an empty body.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    /// A GET request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// A POST request.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// A PUT request.
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// A PATCH request.
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    /// A DELETE request.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Set a JSON body.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, Error> {
        self.body = serde_json::to_vec(body).map_err(error::codec)?.into();
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(self)
    }

    /// Set a raw body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Set a header, replacing any previous value.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// The request method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The request path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The request headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The request body.
    pub fn body_bytes(&self) -> &Bytes {
        &self.body
    }

    /// Attach the authentication and company context of `session`.
    ///
    /// `Authorization` and `company` are owned by decoration: they are set
    /// from the session when present and removed when not, so decorating
    /// twice is the same as decorating once. A JSON content type is added
    /// unless the request already has one.
    pub fn decorate(&mut self, session: &Session) {
        match session.access_token.as_deref() {
            Some(token) => self.set_bearer(token),
            None => {
                self.headers.remove(AUTHORIZATION);
            }
        }

        match session.selected_company_id {
            Some(company_id) => {
                self.headers.insert(
                    HeaderName::from_static(COMPANY_HEADER),
                    HeaderValue::from(company_id.get()),
                );
            }
            None => {
                self.headers.remove(COMPANY_HEADER);
            }
        }

        if !self.headers.contains_key(CONTENT_TYPE) {
            self.headers
                .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
    }

    pub(crate) fn set_bearer(&mut self, token: &str) {
        match HeaderValue::from_str(&format!("Bearer {token}")) {
            Ok(mut value) => {
                value.set_sensitive(true);
                self.headers.insert(AUTHORIZATION, value);
            }
            Err(err) => {
                tracing::warn!(?err, "access token is not a valid header value, sending without it");
                self.headers.remove(AUTHORIZATION);
            }
        }
    }

    /// Build the buffered HTTP request for `base_url`.
    pub(crate) fn to_http(&self, base_url: &str) -> Result<http::Request<Bytes>, Error> {
        let mut request = http::Request::builder()
            .method(self.method.clone())
            .uri(join_url(base_url, &self.path))
            .body(self.body.clone())
            .map_err(error::invalid_request)?;
        *request.headers_mut() = self.headers.clone();
        Ok(request)
    }
}

/// Join a path to the base URL; absolute URLs are used as they are.
pub(crate) fn join_url(base_url: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Whether a request is on its first dispatch or on its single retry after a refresh.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Attempt {
    Initial,
    Retried,
}

/// A request moving through the refresh state machine.
pub(crate) struct Dispatch {
    pub request: OutboundRequest,
    pub attempt: Attempt,
    /// The access token the last dispatch was decorated with.
    pub sent_with: Option<String>,
    /// Token obtained by the refresh, overriding the session's on the retry.
    pub renewed_token: Option<Arc<str>>,
}

impl Dispatch {
    pub fn new(request: OutboundRequest) -> Self {
        Self {
            request,
            attempt: Attempt::Initial,
            sent_with: None,
            renewed_token: None,
        }
    }

    /// Decorate from the current session, then apply a renewed token if the refresh produced one.
    pub fn prepare(&mut self, session: &Session) {
        self.request.decorate(session);
        self.sent_with = session.access_token.clone();

        if let Some(token) = self.renewed_token.clone() {
            self.request.set_bearer(&token);
            self.sent_with = Some(token.to_string());
        }
    }
}
