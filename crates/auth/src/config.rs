//! Verification parameters
//!
//! Built once at process startup and shared read-only between requests.

use std::env;
use std::fmt;
use std::str::FromStr;

use jsonwebtoken::{Algorithm, Validation};

pub const DEFAULT_IDENTITY_CLAIM: &str = "identity";
pub const DEFAULT_USER_CLAIMS: &str = "user_claims";
pub const DEFAULT_TOKEN_ARGUMENT_NAME: &str = "token";

/// Configuration errors raised while reading the environment
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Authentication configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC secret, or PEM-encoded public key for asymmetric algorithms
    pub secret: String,
    pub algorithm: Algorithm,
    /// Claim holding the principal's identity
    pub identity_claim_key: String,
    /// Claim holding custom user claims
    pub user_claims_key: String,
    /// Name of the call argument carrying the raw token
    pub token_argument_name: String,
    /// Clock skew tolerated on `exp`, `nbf` and `iat`, in seconds
    pub leeway: u64,
    pub audience: Option<String>,
    pub issuer: Option<String>,
}

impl AuthConfig {
    /// HS256 configuration with default claim and argument names
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            algorithm: Algorithm::HS256,
            identity_claim_key: DEFAULT_IDENTITY_CLAIM.to_string(),
            user_claims_key: DEFAULT_USER_CLAIMS.to_string(),
            token_argument_name: DEFAULT_TOKEN_ARGUMENT_NAME.to_string(),
            leeway: 0,
            audience: None,
            issuer: None,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// `JWT_SECRET_KEY` is required; everything else falls back to the
    /// defaults of [`AuthConfig::new`].
    pub fn from_env() -> Result<Self, ConfigError> {
        let secret =
            env::var("JWT_SECRET_KEY").map_err(|_| ConfigError::Missing("JWT_SECRET_KEY"))?;
        let mut config = Self::new(secret);

        if let Ok(algorithm) = env::var("JWT_ALGORITHM") {
            config.algorithm =
                Algorithm::from_str(&algorithm).map_err(|e| ConfigError::Invalid {
                    var: "JWT_ALGORITHM",
                    reason: e.to_string(),
                })?;
        }
        if let Ok(key) = env::var("JWT_IDENTITY_CLAIM") {
            config.identity_claim_key = key;
        }
        if let Ok(key) = env::var("JWT_USER_CLAIMS") {
            config.user_claims_key = key;
        }
        if let Ok(name) = env::var("JWT_TOKEN_ARGUMENT_NAME") {
            config.token_argument_name = name;
        }
        if let Ok(leeway) = env::var("JWT_DECODE_LEEWAY") {
            config.leeway = leeway.parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::Invalid {
                    var: "JWT_DECODE_LEEWAY",
                    reason: e.to_string(),
                }
            })?;
        }
        config.audience = env::var("JWT_DECODE_AUDIENCE").ok();
        config.issuer = env::var("JWT_DECODE_ISSUER").ok();

        Ok(config)
    }

    /// Decode-step validation rules derived from this configuration
    pub(crate) fn validation(&self) -> Validation {
        let mut validation = base_validation(self.algorithm);
        validation.leeway = self.leeway;

        if let Some(aud) = &self.audience {
            validation.validate_aud = true;
            validation.set_audience(&[aud]);
        }

        if let Some(iss) = &self.issuer {
            validation.set_issuer(&[iss]);
        }

        validation
    }
}

/// `exp` required and checked, `nbf` checked when present. With no audience
/// configured, tokens carrying `aud` are refused after decoding.
pub(crate) fn base_validation(algorithm: Algorithm) -> Validation {
    let mut validation = Validation::new(algorithm);
    validation.validate_exp = true;
    validation.validate_nbf = true;
    validation.validate_aud = false;
    validation.leeway = 0;
    validation
}

impl fmt::Debug for AuthConfig {
    #[mutants::skip]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        f.debug_struct("AuthConfig")
            .field("algorithm", &self.algorithm)
            .field("identity_claim_key", &self.identity_claim_key)
            .field("user_claims_key", &self.user_claims_key)
            .field("token_argument_name", &self.token_argument_name)
            .field("leeway", &self.leeway)
            .field("audience", &self.audience)
            .field("issuer", &self.issuer)
            .finish_non_exhaustive()
    }
}
