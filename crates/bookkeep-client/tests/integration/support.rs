use std::{
    collections::{HashMap, HashSet},
    future::Future,
    pin::Pin,
    sync::{Arc, Mutex},
};

use bookkeep_client::{
    navigator::Navigator,
    session::Session,
    store::MemorySessionStore,
    transport::Transport,
    Client, Error, RefreshStrategy,
};
use bytes::Bytes;
use http::{header::AUTHORIZATION, Method, StatusCode};

pub const REFRESH_PATH: &str = "/api/token/refresh/";

/// What the fake backend answers to a token refresh.
#[derive(Clone)]
pub enum RefreshReply {
    /// Issue this access token.
    Issue(&'static str),
    /// Reject with this status.
    Reject(StatusCode),
    /// Fail at the transport level.
    Unreachable,
}

#[derive(Clone, Debug)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub authorization: Option<String>,
    pub company: Option<String>,
    pub body: Bytes,
}

impl Recorded {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

/// An in-memory stand-in for the bookkeep backend.
pub struct FakeBackend {
    valid_tokens: Mutex<HashSet<String>>,
    refresh_reply: Mutex<RefreshReply>,
    accept_refreshed_tokens: Mutex<bool>,
    forced_status: Mutex<Option<StatusCode>>,
    offline: Mutex<bool>,
    bodies: Mutex<HashMap<String, Bytes>>,
    requests: Mutex<Vec<Recorded>>,
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            valid_tokens: Mutex::new(HashSet::new()),
            refresh_reply: Mutex::new(RefreshReply::Issue("fresh")),
            accept_refreshed_tokens: Mutex::new(true),
            forced_status: Mutex::new(None),
            offline: Mutex::new(false),
            bodies: Mutex::new(HashMap::new()),
            requests: Mutex::new(vec![]),
        })
    }

    pub fn accept_token(&self, token: &str) {
        self.valid_tokens.lock().unwrap().insert(token.to_string());
    }

    pub fn revoke_token(&self, token: &str) {
        self.valid_tokens.lock().unwrap().remove(token);
    }

    pub fn on_refresh(&self, reply: RefreshReply) {
        *self.refresh_reply.lock().unwrap() = reply;
    }

    /// Keep rejecting tokens even after issuing them.
    pub fn reject_refreshed_tokens(&self) {
        *self.accept_refreshed_tokens.lock().unwrap() = false;
    }

    pub fn force_status(&self, status: StatusCode) {
        *self.forced_status.lock().unwrap() = Some(status);
    }

    pub fn go_offline(&self) {
        *self.offline.lock().unwrap() = true;
    }

    pub fn serve(&self, path: &str, body: impl Into<Bytes>) {
        self.bodies
            .lock()
            .unwrap()
            .insert(path.to_string(), body.into());
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|request| request.path == path)
            .collect()
    }

    pub fn refresh_calls(&self) -> usize {
        self.requests_to(REFRESH_PATH).len()
    }

    fn handle(&self, request: http::Request<Bytes>) -> Result<http::Response<Bytes>, Error> {
        let header = |name: &str| {
            request
                .headers()
                .get(name)
                .map(|value| value.to_str().unwrap().to_string())
        };
        let recorded = Recorded {
            method: request.method().clone(),
            path: request.uri().path().to_string(),
            authorization: header(AUTHORIZATION.as_str()),
            company: header("company"),
            body: request.body().clone(),
        };
        self.requests.lock().unwrap().push(recorded.clone());

        if *self.offline.lock().unwrap() {
            return Err(Error::Network(anyhow::anyhow!("connection refused")));
        }

        match recorded.path.as_str() {
            REFRESH_PATH => self.handle_refresh(),
            "/customer/login/" => Ok(self.handle_login(&recorded)),
            path => {
                if let Some(status) = *self.forced_status.lock().unwrap() {
                    return Ok(respond(status, r#"{"error":"Something went wrong"}"#));
                }

                let authorized = recorded
                    .authorization
                    .as_deref()
                    .and_then(|value| value.strip_prefix("Bearer "))
                    .is_some_and(|token| self.valid_tokens.lock().unwrap().contains(token));

                if !authorized {
                    return Ok(respond(
                        StatusCode::UNAUTHORIZED,
                        r#"{"detail":"Given token not valid for any token type"}"#,
                    ));
                }

                let body = self
                    .bodies
                    .lock()
                    .unwrap()
                    .get(path)
                    .cloned()
                    .unwrap_or_else(|| Bytes::from_static(br#"{"data":[1,2,3]}"#));

                Ok(respond(StatusCode::OK, body))
            }
        }
    }

    fn handle_refresh(&self) -> Result<http::Response<Bytes>, Error> {
        match self.refresh_reply.lock().unwrap().clone() {
            RefreshReply::Issue(token) => {
                if *self.accept_refreshed_tokens.lock().unwrap() {
                    self.accept_token(token);
                }
                Ok(respond(
                    StatusCode::OK,
                    format!(r#"{{"access_token":"{token}"}}"#),
                ))
            }
            RefreshReply::Reject(status) => Ok(respond(
                status,
                r#"{"detail":"Token is invalid or expired"}"#,
            )),
            RefreshReply::Unreachable => Err(Error::Network(anyhow::anyhow!("timed out"))),
        }
    }

    fn handle_login(&self, request: &Recorded) -> http::Response<Bytes> {
        let credentials = request.json();
        if credentials["email"] == "owner@acme.test" && credentials["password"] == "hunter2" {
            self.accept_token("login-access");
            respond(
                StatusCode::OK,
                r#"{"access_token":"login-access","refresh_token":"login-refresh","username":"owner","email":"owner@acme.test"}"#,
            )
        } else {
            respond(StatusCode::UNAUTHORIZED, r#"{"error":"Invalid credentials"}"#)
        }
    }
}

fn respond(status: StatusCode, body: impl Into<Bytes>) -> http::Response<Bytes> {
    let mut response = http::Response::new(body.into());
    *response.status_mut() = status;
    response
}

/// Transport answering from a [FakeBackend], yielding once so concurrent requests interleave.
pub struct FakeTransport(pub Arc<FakeBackend>);

impl Transport for FakeTransport {
    fn execute(
        &self,
        request: http::Request<Bytes>,
    ) -> Pin<Box<dyn Future<Output = Result<http::Response<Bytes>, Error>> + Send + '_>> {
        Box::pin(async move {
            tokio::task::yield_now().await;
            self.0.handle(request)
        })
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn routes(&self) -> Vec<String> {
        self.routes.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: &str) {
        self.routes.lock().unwrap().push(route.to_string());
    }
}

pub struct Harness {
    pub client: Client,
    pub backend: Arc<FakeBackend>,
    pub store: Arc<MemorySessionStore>,
    pub navigator: Arc<RecordingNavigator>,
}

pub fn harness(session: Session) -> Harness {
    harness_with_strategy(session, RefreshStrategy::SingleFlight)
}

pub fn harness_with_strategy(session: Session, strategy: RefreshStrategy) -> Harness {
    let backend = FakeBackend::new();
    let store = Arc::new(MemorySessionStore::with_session(session));
    let navigator = Arc::new(RecordingNavigator::default());

    let client = Client::builder()
        .with_url("http://bookkeep.test")
        .with_transport(Arc::new(FakeTransport(backend.clone())))
        .with_session_store(store.clone())
        .with_navigator(navigator.clone())
        .with_refresh_strategy(strategy)
        .build()
        .unwrap();

    Harness {
        client,
        backend,
        store,
        navigator,
    }
}

pub fn session(access: &str, refresh: &str) -> Session {
    Session {
        access_token: Some(access.to_string()),
        refresh_token: Some(refresh.to_string()),
        selected_company_id: None,
    }
}
