//! Authorization gate: required auth services versus verified ones.

use crate::types::AuthServiceId;
use std::collections::HashSet;

/// Header a client populates when a tool needs client-side authorization.
pub const DEFAULT_AUTH_TOKEN_HEADER: &str = "Authorization";

/// Whether a caller holding `verified` may use a tool requiring `required`.
///
/// A tool with no requirements is open; otherwise one overlapping service is
/// enough.
pub fn is_authorized(required: &[AuthServiceId], verified: &[AuthServiceId]) -> bool {
    if required.is_empty() {
        return true;
    }
    let verified: HashSet<&AuthServiceId> = verified.iter().collect();
    required.iter().any(|service| verified.contains(service))
}

/// Raw access token forwarded from the transport layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
