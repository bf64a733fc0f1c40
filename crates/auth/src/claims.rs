//! JWT claims types

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// Name of the claim carrying the token type
pub(crate) const TYPE_CLAIM: &str = "type";

/// Name of the claim carrying the unique token identifier
pub(crate) const JTI_CLAIM: &str = "jti";

/// Token type, as carried in the `type` claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
        }
    }

    /// Read a token type out of a raw claim value. Only the exact lowercase
    /// strings are recognized.
    pub(crate) fn from_claim(value: &Value) -> Option<Self> {
        value.as_str().and_then(|s| s.parse().ok())
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TokenType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "access" => Ok(TokenType::Access),
            "refresh" => Ok(TokenType::Refresh),
            _ => Err(()),
        }
    }
}

/// Verified token payload.
///
/// Only produced by [`crate::decode_token`] and friends, after the signature,
/// the temporal claims and the required custom claims have all been checked.
/// The whole decoded payload is kept so handlers can read claims this crate
/// knows nothing about.
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimSet {
    payload: Map<String, Value>,
    token_type: TokenType,
    identity_claim_key: String,
    user_claims_key: String,
}

impl ClaimSet {
    /// Caller must have validated `jti`, the identity claim and `type`, and
    /// filled in the user claims.
    pub(crate) fn from_verified(
        payload: Map<String, Value>,
        token_type: TokenType,
        identity_claim_key: &str,
        user_claims_key: &str,
    ) -> Self {
        Self {
            payload,
            token_type,
            identity_claim_key: identity_claim_key.to_string(),
            user_claims_key: user_claims_key.to_string(),
        }
    }

    /// Unique token identifier
    pub fn jti(&self) -> &str {
        self.payload
            .get(JTI_CLAIM)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// Identity of the principal, read from the configured identity claim
    pub fn identity(&self) -> &Value {
        self.payload
            .get(&self.identity_claim_key)
            .unwrap_or(&Value::Null)
    }

    /// Identity as a string, when the issuer stored it as one
    pub fn identity_str(&self) -> Option<&str> {
        self.identity().as_str()
    }

    pub fn token_type(&self) -> TokenType {
        self.token_type
    }

    /// Custom user claims; an empty object when the token carried none
    pub fn user_claims(&self) -> &Value {
        self.payload
            .get(&self.user_claims_key)
            .unwrap_or(&Value::Null)
    }

    /// Look up a single user claim by name
    pub fn user_claim(&self, name: &str) -> Option<&Value> {
        self.user_claims().get(name)
    }

    /// Any claim in the payload by name
    pub fn get(&self, claim: &str) -> Option<&Value> {
        self.payload.get(claim)
    }

    /// Expires at
    pub fn exp(&self) -> Option<u64> {
        self.get("exp").and_then(Value::as_u64)
    }

    /// Issued at
    pub fn iat(&self) -> Option<u64> {
        self.get("iat").and_then(Value::as_u64)
    }

    /// Not before
    pub fn nbf(&self) -> Option<u64> {
        self.get("nbf").and_then(Value::as_u64)
    }

    /// The full decoded payload
    pub fn payload(&self) -> &Map<String, Value> {
        &self.payload
    }
}

impl Serialize for ClaimSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.payload.serialize(serializer)
    }
}
