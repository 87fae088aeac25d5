//! Access token renewal.

use std::sync::{Arc, Mutex, PoisonError};

use bookkeep_common::{
    api::{RefreshRequest, RefreshResponse},
    routes,
};
use futures_util::future::{BoxFuture, FutureExt, Shared};

use crate::{error::RefreshError, request::OutboundRequest, ClientState};

/// How refreshes triggered by concurrently failing requests are coordinated.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub enum RefreshStrategy {
    /// All requests that failed with the same access token share one refresh call and its outcome.
    ///
    /// With refresh token rotation this avoids one refresh invalidating the
    /// token another is using, and the session is invalidated at most once.
    #[default]
    SingleFlight,

    /// Every failing request performs its own refresh call.
    PerRequest,
}

type SharedRefresh = Shared<BoxFuture<'static, Result<Arc<str>, RefreshError>>>;

/// The refresh in flight, keyed by the access token it replaces.
struct RefreshSlot {
    stale_token: Option<String>,
    refresh: SharedRefresh,
}

pub(crate) struct RefreshCoordinator {
    strategy: RefreshStrategy,
    in_flight: Mutex<Option<RefreshSlot>>,
}

impl RefreshCoordinator {
    pub fn new(strategy: RefreshStrategy) -> Self {
        Self {
            strategy,
            in_flight: Mutex::new(None),
        }
    }

    pub fn strategy(&self) -> RefreshStrategy {
        self.strategy
    }

    /// Forget the current refresh, so no later request can join it.
    pub fn reset(&self) {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }
}

/// Obtain an access token to replace `stale_token`, which the backend just rejected.
///
/// On failure the session has already been invalidated.
pub(crate) async fn renew_access_token(
    state: &Arc<ClientState>,
    stale_token: Option<&str>,
) -> Result<Arc<str>, RefreshError> {
    match state.refresh.strategy {
        RefreshStrategy::PerRequest => refresh_or_invalidate(state.clone()).await,
        RefreshStrategy::SingleFlight => {
            let refresh = {
                let mut in_flight = state
                    .refresh
                    .in_flight
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner);

                match in_flight.as_ref() {
                    // Only a refresh that has not settled may be joined.
                    Some(slot)
                        if slot.stale_token.as_deref() == stale_token
                            && slot.refresh.peek().is_none() =>
                    {
                        tracing::debug!("joining refresh of the same access token");
                        slot.refresh.clone()
                    }
                    _ => {
                        if let Some(current) = renewed_since(state, stale_token) {
                            tracing::debug!("access token already renewed, retrying with it");
                            return Ok(current);
                        }

                        let refresh = refresh_or_invalidate(state.clone()).boxed().shared();
                        *in_flight = Some(RefreshSlot {
                            stale_token: stale_token.map(str::to_string),
                            refresh: refresh.clone(),
                        });
                        refresh
                    }
                }
            };

            // Prefer any token issued while this refresh was awaited.
            let token = refresh.await?;
            Ok(renewed_since(state, stale_token).unwrap_or(token))
        }
    }
}

/// The current access token, if the session holds one different from `stale_token`.
fn renewed_since(state: &ClientState, stale_token: Option<&str>) -> Option<Arc<str>> {
    let session = state.store.session();
    let current = session.access_token.as_deref()?;

    if Some(current) == stale_token {
        None
    } else {
        Some(Arc::from(current))
    }
}

async fn refresh_or_invalidate(state: Arc<ClientState>) -> Result<Arc<str>, RefreshError> {
    match request_access_token(&state).await {
        Ok(token) => Ok(token),
        Err(err) => {
            tracing::warn!(%err, "access token refresh failed, invalidating session");
            state.invalidate_session();
            Err(err)
        }
    }
}

/// Exchange the stored refresh token for a new access token and persist it.
///
/// The refresh call is not decorated: it carries no bearer token and is never itself refreshed.
async fn request_access_token(state: &ClientState) -> Result<Arc<str>, RefreshError> {
    let Some(refresh) = state.store.session().refresh_token.clone() else {
        return Err(RefreshError::MissingRefreshToken);
    };

    let request = OutboundRequest::post(routes::TOKEN_REFRESH)
        .json(&RefreshRequest { refresh })
        .and_then(|request| request.to_http(&state.base_url))
        .map_err(|err| RefreshError::Transport(Arc::new(err)))?;

    let response = state
        .transport
        .execute(request)
        .await
        .map_err(|err| RefreshError::Transport(Arc::new(err)))?;

    if !response.status().is_success() {
        return Err(RefreshError::Rejected(response.status()));
    }

    let RefreshResponse { access_token } = serde_json::from_slice(response.body())
        .map_err(|err| RefreshError::Malformed(Arc::new(err.into())))?;

    if let Err(err) = state.store.set_access_token(&access_token) {
        tracing::error!(?err, "could not persist refreshed access token");
    }

    tracing::info!("access token refreshed");

    Ok(Arc::from(access_token))
}
