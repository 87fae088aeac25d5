use std::{borrow::Cow, sync::Arc, time::Duration};

use crate::{
    navigator::{AuthState, Navigator, NoopNavigator},
    refresh::{RefreshCoordinator, RefreshStrategy},
    store::{FileSessionStore, MemorySessionStore, SessionStore},
    transport::{ReqwestTransport, Transport},
    Client, ClientState, Error, BASE_URL_ENV, SESSION_FILE_ENV,
};

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8002";
const DEFAULT_LOGIN_ROUTE: &str = "/login";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A builder for configuring a [Client].
pub struct ClientBuilder {
    url: Cow<'static, str>,
    timeout: Duration,
    transport: Option<Arc<dyn Transport>>,
    store: Option<Arc<dyn SessionStore>>,
    navigator: Arc<dyn Navigator>,
    login_route: Cow<'static, str>,
    refresh_strategy: RefreshStrategy,
}

impl ClientBuilder {
    pub(crate) fn new() -> Self {
        Self {
            url: Cow::Borrowed(DEFAULT_BASE_URL),
            timeout: DEFAULT_TIMEOUT,
            transport: None,
            store: None,
            navigator: Arc::new(NoopNavigator),
            login_route: Cow::Borrowed(DEFAULT_LOGIN_ROUTE),
            refresh_strategy: RefreshStrategy::default(),
        }
    }

    /// Configure the client from the environment it runs in.
    ///
    /// `BOOKKEEP_API_BASE_URL` overrides the base URL, and
    /// `BOOKKEEP_SESSION_FILE` persists the session in the named file.
    pub fn from_environment(mut self) -> Result<Self, Error> {
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            if !url.trim().is_empty() {
                self.url = url.trim().to_string().into();
            }
        }

        if let Ok(path) = std::env::var(SESSION_FILE_ENV) {
            if !path.trim().is_empty() {
                self.store = Some(Arc::new(FileSessionStore::open(path.trim())?));
            }
        }

        Ok(self)
    }

    /// Override the API base URL (default is http://127.0.0.1:8002)
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into().into();
        self
    }

    /// Total timeout of each HTTP exchange made by the default transport (default is 30 seconds)
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Use a custom transport instead of the default [reqwest] one.
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Use the given session store (default is an empty in-memory store)
    pub fn with_session_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Receive forced navigation when the session is lost.
    pub fn with_navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = navigator;
        self
    }

    /// Route passed to the [Navigator] when the session is lost (default is /login)
    pub fn with_login_route(mut self, route: impl Into<String>) -> Self {
        self.login_route = route.into().into();
        self
    }

    /// Select how concurrent token refreshes are coordinated.
    pub fn with_refresh_strategy(mut self, strategy: RefreshStrategy) -> Self {
        self.refresh_strategy = strategy;
        self
    }

    /// Build the client.
    ///
    /// No network traffic happens here; the session is whatever the store was hydrated with.
    pub fn build(self) -> Result<Client, Error> {
        let uri = self
            .url
            .parse::<http::Uri>()
            .map_err(|_| Error::InvalidUrl("unparseable base url"))?;
        if !matches!(uri.scheme_str(), Some("http" | "https")) {
            return Err(Error::InvalidUrl("base url must be http or https"));
        }
        if uri.host().is_none() {
            return Err(Error::InvalidUrl("base url has no host"));
        }

        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(self.timeout)?),
        };
        let store: Arc<dyn SessionStore> = match self.store {
            Some(store) => store,
            None => Arc::new(MemorySessionStore::new()),
        };

        let (auth_state_tx, _) = tokio::sync::watch::channel(AuthState::Unauthenticated);

        let state = Arc::new(ClientState {
            base_url: self.url,
            transport,
            store,
            navigator: self.navigator,
            login_route: self.login_route,
            refresh: RefreshCoordinator::new(self.refresh_strategy),
            auth_state_tx,
        });
        state.publish_auth_state();

        tracing::info!(base_url = %state.base_url, "bookkeep client ready");

        Ok(Client { state })
    }
}

impl std::fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("url", &self.url)
            .field("timeout", &self.timeout)
            .field("login_route", &self.login_route)
            .field("refresh_strategy", &self.refresh_strategy)
            .finish_non_exhaustive()
    }
}
