//! Request-scoped verification context

use serde_json::{Map, Value};

use crate::claims::ClaimSet;

/// Per-request slot holding the claims a guard has verified.
///
/// One value per request, passed explicitly to the handler. Nothing here is
/// shared between requests, so concurrent requests can never observe each
/// other's claims.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    claims: Option<ClaimSet>,
}

impl RequestContext {
    /// Empty, unverified context
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set_claims(&mut self, claims: ClaimSet) {
        self.claims = Some(claims);
    }

    pub fn is_verified(&self) -> bool {
        self.claims.is_some()
    }

    /// Verified claims, if a guard ran for this request
    pub fn claims(&self) -> Option<&ClaimSet> {
        self.claims.as_ref()
    }

    /// Raw decoded payload
    pub fn raw_jwt(&self) -> Option<&Map<String, Value>> {
        self.claims.as_ref().map(ClaimSet::payload)
    }

    /// Identity of the verified principal
    pub fn jwt_identity(&self) -> Option<&Value> {
        self.claims.as_ref().map(ClaimSet::identity)
    }

    /// Custom claims carried by the verified token
    pub fn jwt_user_claims(&self) -> Option<&Value> {
        self.claims.as_ref().map(ClaimSet::user_claims)
    }

    pub fn into_claims(self) -> Option<ClaimSet> {
        self.claims
    }
}
