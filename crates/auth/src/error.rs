//! Authentication errors

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::claims::TokenType;

/// Why a token could not be decoded into a [`crate::ClaimSet`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeErrorKind {
    /// Not a well-formed JWT
    Malformed,
    /// Signature does not match the configured key
    InvalidSignature,
    /// Header algorithm differs from the configured one
    InvalidAlgorithm,
    /// Key material cannot be used with the configured algorithm
    InvalidKey,
    /// `exp` is in the past
    Expired,
    /// `nbf` or `iat` is in the future
    Immature,
    /// A required claim is absent
    MissingClaim(String),
    /// A claim is present but carries an unusable value
    InvalidClaim(String),
}

/// Token is structurally invalid, unverifiable, expired, or lacks a required claim
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct DecodeError {
    kind: DecodeErrorKind,
    message: String,
}

impl DecodeError {
    pub(crate) fn new(kind: DecodeErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub(crate) fn missing_claim(claim: &str) -> Self {
        Self::new(
            DecodeErrorKind::MissingClaim(claim.to_string()),
            format!("Missing claim: {claim}"),
        )
    }

    pub(crate) fn invalid_claim(claim: &str) -> Self {
        Self::new(
            DecodeErrorKind::InvalidClaim(claim.to_string()),
            format!("Invalid claim: {claim}"),
        )
    }

    pub fn kind(&self) -> &DecodeErrorKind {
        &self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<jsonwebtoken::errors::Error> for DecodeError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match e.kind() {
            ErrorKind::ExpiredSignature => {
                Self::new(DecodeErrorKind::Expired, "Signature has expired")
            }
            ErrorKind::ImmatureSignature => {
                Self::new(DecodeErrorKind::Immature, "The token is not yet valid (nbf)")
            }
            ErrorKind::InvalidSignature => Self::new(
                DecodeErrorKind::InvalidSignature,
                "Signature verification failed",
            ),
            ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => Self::new(
                DecodeErrorKind::InvalidAlgorithm,
                "The specified alg value is not allowed",
            ),
            ErrorKind::InvalidKeyFormat
            | ErrorKind::InvalidRsaKey(_)
            | ErrorKind::InvalidEcdsaKey => {
                Self::new(DecodeErrorKind::InvalidKey, "Invalid key material")
            }
            ErrorKind::MissingRequiredClaim(claim) => Self::missing_claim(claim),
            ErrorKind::InvalidAudience => Self::invalid_claim("aud"),
            ErrorKind::InvalidIssuer => Self::invalid_claim("iss"),
            _ => Self::new(DecodeErrorKind::Malformed, format!("Invalid token: {e}")),
        }
    }
}

/// Verification error surfaced by guards and extractors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Token decoded but is of the other type
    #[error("Only {expected} tokens are allowed")]
    WrongTokenType { expected: TokenType },

    /// The call carried no token under the configured argument name
    #[error("Missing token argument: {argument}")]
    MissingToken { argument: String },

    /// Claims were requested on a route no guard has verified
    #[error("Request has not been verified by a token guard")]
    NotVerified,
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Decode(_) | AuthError::WrongTokenType { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AuthError::MissingToken { .. } | AuthError::NotVerified => StatusCode::UNAUTHORIZED,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::Decode(_) => "INVALID_TOKEN",
            AuthError::WrongTokenType { .. } => "WRONG_TOKEN_TYPE",
            AuthError::MissingToken { .. } => "MISSING_TOKEN",
            AuthError::NotVerified => "NOT_VERIFIED",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = Json(json!({
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}
