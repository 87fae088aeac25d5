//! The request pipeline: decorate, dispatch, and recover from an expired access token.

use std::sync::Arc;

use bytes::Bytes;
use http::StatusCode;
use serde::de::DeserializeOwned;

use crate::{
    error::{self, StatusError},
    refresh,
    request::{Attempt, Dispatch, OutboundRequest},
    ClientState, Error,
};

/// Run `request` through the refresh state machine.
///
/// The loop body runs at most twice: a `401` on the initial attempt moves
/// the dispatch to [Attempt::Retried], and a `401` on the retry is final.
pub(crate) async fn send(
    state: &Arc<ClientState>,
    request: OutboundRequest,
) -> Result<http::Response<Bytes>, Error> {
    let mut dispatch = Dispatch::new(request);

    loop {
        let response = dispatch_once(state, &mut dispatch).await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let status_error = StatusError::new(status, response.into_body());

        if status != StatusCode::UNAUTHORIZED {
            return Err(Error::Status(status_error));
        }

        match dispatch.attempt {
            Attempt::Initial => {
                dispatch.attempt = Attempt::Retried;

                match refresh::renew_access_token(state, dispatch.sent_with.as_deref()).await {
                    Ok(token) => {
                        tracing::debug!(path = dispatch.request.path(), "retrying with renewed access token");
                        dispatch.renewed_token = Some(token);
                    }
                    Err(err) => {
                        tracing::info!(%err, path = dispatch.request.path(), "session could not be renewed");
                        return Err(Error::Unauthorized(status_error));
                    }
                }
            }
            Attempt::Retried => {
                tracing::warn!(
                    path = dispatch.request.path(),
                    "request rejected again after token refresh"
                );
                return Err(Error::Unauthorized(status_error));
            }
        }
    }
}

async fn dispatch_once(
    state: &ClientState,
    dispatch: &mut Dispatch,
) -> Result<http::Response<Bytes>, Error> {
    dispatch.prepare(&state.store.session());
    let request = dispatch.request.to_http(&state.base_url)?;

    tracing::debug!(
        method = %dispatch.request.method(),
        path = dispatch.request.path(),
        attempt = ?dispatch.attempt,
        "dispatching request"
    );

    state.transport.execute(request).await
}

/// Send a request without decoration or refresh handling.
///
/// Used for calls that establish a session rather than use one.
pub(crate) async fn send_undecorated(
    state: &ClientState,
    request: OutboundRequest,
) -> Result<http::Response<Bytes>, Error> {
    let response = state
        .transport
        .execute(request.to_http(&state.base_url)?)
        .await?;

    if response.status().is_success() {
        Ok(response)
    } else {
        Err(Error::Status(StatusError::new(
            response.status(),
            response.into_body(),
        )))
    }
}

/// Decode a JSON response body. An empty body decodes as `null`.
pub(crate) fn decode<R: DeserializeOwned>(response: &http::Response<Bytes>) -> Result<R, Error> {
    let body = response.body();
    if body.is_empty() {
        serde_json::from_slice(b"null").map_err(error::codec)
    } else {
        serde_json::from_slice(body).map_err(error::codec)
    }
}
