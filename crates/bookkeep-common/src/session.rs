//! The client-side authentication session.

use serde::{Deserialize, Serialize};

use crate::id::CompanyId;

/// Storage key of the access token.
pub const ACCESS_TOKEN_KEY: &str = "accessToken";

/// Storage key of the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

/// Storage key of the selected company id.
pub const SELECTED_COMPANY_KEY: &str = "selectedCompanyId";

/// Authentication state held by a client.
///
/// The serialized form is a flat string map using the storage keys above.
/// Unset fields are omitted, never written as empty strings.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Short-lived bearer credential.
    #[serde(
        rename = "accessToken",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub access_token: Option<String>,

    /// Longer-lived credential exchanged for new access tokens.
    #[serde(
        rename = "refreshToken",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub refresh_token: Option<String>,

    /// The active company context.
    #[serde(
        rename = "selectedCompanyId",
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "company_as_string"
    )]
    pub selected_company_id: Option<CompanyId>,
}

impl Session {
    /// Whether the client considers the user authenticated.
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    /// A session for a freshly logged in user, keeping the current company selection.
    pub fn with_tokens(&self, access_token: String, refresh_token: String) -> Self {
        Self {
            access_token: Some(access_token),
            refresh_token: Some(refresh_token),
            selected_company_id: self.selected_company_id,
        }
    }
}

// Tokens are credentials, keep them out of logs.
impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("has_access_token", &self.access_token.is_some())
            .field("has_refresh_token", &self.refresh_token.is_some())
            .field("selected_company_id", &self.selected_company_id)
            .finish()
    }
}

fn company_as_string<S>(id: &Option<CompanyId>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match id {
        Some(id) => serializer.collect_str(id),
        None => serializer.serialize_none(),
    }
}
