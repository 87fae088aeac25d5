//! Account and session lifecycle operations.

use bookkeep_common::{
    api::{LoginRequest, LoginResponse, RegisterRequest},
    id::CompanyId,
    routes,
};

use crate::{
    gateway::{self, decode},
    navigator::AuthState,
    request::OutboundRequest,
    Client, Error,
};

impl Client {
    /// Log in with email and password, storing both tokens on success.
    ///
    /// The credentials call is not decorated and a `401` here is a wrong
    /// password, returned as [Error::Status] without any refresh attempt.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, Error> {
        let request = OutboundRequest::post(routes::LOGIN).json(&LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        })?;
        let response = gateway::send_undecorated(&self.state, request).await?;
        let login: LoginResponse = decode(&response)?;

        self.state
            .store
            .set_tokens(&login.access_token, &login.refresh_token)?;
        self.state
            .auth_state_tx
            .send_replace(AuthState::Authenticated);

        tracing::info!(email, "logged in");

        Ok(login)
    }

    /// Register a new account. Registration does not log in.
    pub async fn register(&self, registration: &RegisterRequest) -> Result<serde_json::Value, Error> {
        self.post(routes::REGISTER, registration).await
    }

    /// The current user, as reported by the backend.
    pub async fn current_user(&self) -> Result<serde_json::Value, Error> {
        self.get(routes::CURRENT_USER).await
    }

    /// Forget the session: tokens and company selection.
    ///
    /// Unlike a failed refresh, logging out does not navigate.
    pub fn logout(&self) -> Result<(), Error> {
        self.state.refresh.reset();
        let result = self.state.store.clear();
        self.state
            .auth_state_tx
            .send_replace(AuthState::Unauthenticated);

        tracing::info!("logged out");

        result
    }

    /// Re-establish the user of a stored session at startup.
    ///
    /// Returns `None` when there is no stored session, or when the stored one
    /// is no longer accepted, in which case it is logged out.
    pub async fn restore_session(&self) -> Result<Option<serde_json::Value>, Error> {
        if !self.session().is_authenticated() {
            self.state.publish_auth_state();
            return Ok(None);
        }

        match self.current_user().await {
            Ok(user) => {
                self.state.publish_auth_state();
                Ok(Some(user))
            }
            Err(err) => {
                tracing::warn!(%err, "stored session was not accepted, logging out");
                self.logout()?;
                Ok(None)
            }
        }
    }

    /// Select the active company, or clear the selection with `None`.
    ///
    /// Subsequent requests carry the selection in the `company` header.
    pub fn select_company(&self, company_id: Option<CompanyId>) -> Result<(), Error> {
        self.state.store.set_selected_company(company_id)?;
        tracing::debug!(?company_id, "company selection changed");
        Ok(())
    }

    /// Clear the company selection, keeping the tokens.
    pub fn clear_company(&self) -> Result<(), Error> {
        self.select_company(None)
    }

    /// The selected company id, if any.
    pub fn selected_company_id(&self) -> Option<CompanyId> {
        self.session().selected_company_id
    }

    /// Fetch the details of the selected company. `None` when no company is selected.
    pub async fn selected_company(&self) -> Result<Option<serde_json::Value>, Error> {
        match self.selected_company_id() {
            Some(company_id) => Ok(Some(self.get(routes::company(company_id)).await?)),
            None => Ok(None),
        }
    }

    pub(crate) fn require_company(&self) -> Result<CompanyId, Error> {
        self.selected_company_id().ok_or(Error::NoCompanySelected)
    }
}
