//! Application navigation hooks for session loss.

/// Receives forced navigation from the client.
///
/// Called with the login route when the session is invalidated because an
/// access token could not be renewed. The application is expected to drop
/// its in-progress state and return to its login entry point.
pub trait Navigator: Send + Sync {
    /// Navigate to `route`.
    fn navigate(&self, route: &str);
}

/// A [Navigator] that ignores navigation requests.
///
/// Programs without a UI can watch [crate::Client::auth_state] instead.
#[derive(Clone, Copy, Default, Debug)]
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn navigate(&self, route: &str) {
        tracing::debug!(route, "navigation ignored");
    }
}

/// Authentication state published by the client.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AuthState {
    /// The session holds an access token.
    Authenticated,

    /// There is no session; the user needs to log in.
    Unauthenticated,
}
