//! `bookkeep-client` is an asynchronous Rust client handle for the bookkeep API.
//!
//! Every request is decorated with the session's bearer token and the
//! selected company. A request rejected with `401 Unauthorized` triggers one
//! token refresh and one retry; when the refresh fails the session is cleared
//! and the application is sent to its login route.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::{borrow::Cow, sync::Arc};

use bookkeep_common::session::Session;
use bytes::Bytes;
use navigator::{AuthState, Navigator};
use refresh::RefreshCoordinator;
use serde::{de::DeserializeOwned, Serialize};
use store::SessionStore;
use transport::Transport;

pub use bookkeep_common::{api, id, routes, session};
pub use builder::ClientBuilder;
pub use error::{Error, RefreshError, StatusError};
pub use refresh::RefreshStrategy;
pub use request::OutboundRequest;

mod account;
mod builder;
mod error;
mod gateway;
mod refresh;
mod request;
mod resources;

/// Navigation hooks and published authentication state.
pub mod navigator;

/// Session storage.
pub mod store;

/// HTTP transport.
pub mod transport;

/// Environment variable overriding the API base URL.
const BASE_URL_ENV: &str = "BOOKKEEP_API_BASE_URL";

/// Environment variable selecting a file-backed session store.
const SESSION_FILE_ENV: &str = "BOOKKEEP_SESSION_FILE";

/// The bookkeep client handle.
///
/// Cheap to clone; clones share the session, the transport and refresh coordination.
#[derive(Clone)]
pub struct Client {
    state: Arc<ClientState>,
}

pub(crate) struct ClientState {
    base_url: Cow<'static, str>,
    transport: Arc<dyn Transport>,
    store: Arc<dyn SessionStore>,
    navigator: Arc<dyn Navigator>,
    login_route: Cow<'static, str>,
    refresh: RefreshCoordinator,
    auth_state_tx: tokio::sync::watch::Sender<AuthState>,
}

impl ClientState {
    /// Drop the whole session and send the application to its login route.
    fn invalidate_session(&self) {
        self.refresh.reset();
        if let Err(err) = self.store.clear() {
            tracing::error!(?err, "could not clear session storage");
        }
        self.auth_state_tx.send_replace(AuthState::Unauthenticated);
        self.navigator.navigate(&self.login_route);
    }

    fn publish_auth_state(&self) {
        let auth_state = if self.store.session().is_authenticated() {
            AuthState::Authenticated
        } else {
            AuthState::Unauthenticated
        };
        self.auth_state_tx.send_replace(auth_state);
    }
}

impl Client {
    /// Construct a new builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// The API base URL.
    pub fn base_url(&self) -> &str {
        &self.state.base_url
    }

    /// A snapshot of the current session.
    pub fn session(&self) -> Arc<Session> {
        self.state.store.session()
    }

    /// The session store backing this client.
    pub fn session_store(&self) -> &Arc<dyn SessionStore> {
        &self.state.store
    }

    /// Subscribe to authentication state changes.
    pub fn auth_state(&self) -> tokio::sync::watch::Receiver<AuthState> {
        self.state.auth_state_tx.subscribe()
    }

    /// Send a request through the authentication pipeline.
    ///
    /// Returns the response when its status is a success. A `401` is answered
    /// with at most one token refresh and one retry before it is returned as
    /// [Error::Unauthorized]; other statuses are returned as [Error::Status].
    pub async fn send(&self, request: OutboundRequest) -> Result<http::Response<Bytes>, Error> {
        gateway::send(&self.state, request).await
    }

    /// GET a JSON resource.
    pub async fn get<R: DeserializeOwned>(&self, path: impl Into<String>) -> Result<R, Error> {
        let response = self.send(OutboundRequest::get(path)).await?;
        gateway::decode(&response)
    }

    /// POST a JSON body, decoding a JSON response.
    pub async fn post<B, R>(&self, path: impl Into<String>, body: &B) -> Result<R, Error>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self.send(OutboundRequest::post(path).json(body)?).await?;
        gateway::decode(&response)
    }

    /// PUT a JSON body, decoding a JSON response.
    pub async fn put<B, R>(&self, path: impl Into<String>, body: &B) -> Result<R, Error>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self.send(OutboundRequest::put(path).json(body)?).await?;
        gateway::decode(&response)
    }

    /// PATCH a JSON body, decoding a JSON response.
    pub async fn patch<B, R>(&self, path: impl Into<String>, body: &B) -> Result<R, Error>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self.send(OutboundRequest::patch(path).json(body)?).await?;
        gateway::decode(&response)
    }

    /// DELETE a resource, decoding a JSON response. An empty body decodes as JSON `null`.
    pub async fn delete<R: DeserializeOwned>(&self, path: impl Into<String>) -> Result<R, Error> {
        let response = self.send(OutboundRequest::delete(path)).await?;
        gateway::decode(&response)
    }

    /// GET a binary resource, such as a rendered PDF.
    pub async fn get_bytes(&self, path: impl Into<String>) -> Result<Bytes, Error> {
        Ok(self.send(OutboundRequest::get(path)).await?.into_body())
    }

    /// Flush the session store. Call before the program exits.
    pub fn close(&self) -> Result<(), Error> {
        self.state.store.flush()
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.state.base_url)
            .field("login_route", &self.state.login_route)
            .field("refresh_strategy", &self.state.refresh.strategy())
            .field("session", &self.state.store.session())
            .finish()
    }
}
