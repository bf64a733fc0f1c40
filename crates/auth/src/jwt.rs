//! JWT decoding and required-claim validation

use jsonwebtoken::{decode, get_current_timestamp, Algorithm, DecodingKey, Validation};
use serde_json::{Map, Value};

use crate::claims::{ClaimSet, TokenType, JTI_CLAIM, TYPE_CLAIM};
use crate::config::{base_validation, AuthConfig};
use crate::error::{AuthError, DecodeError, DecodeErrorKind};

/// Decode and verify an encoded JWT.
///
/// Signature, `exp`, `nbf` and `iat` are checked by the decode step, and a
/// token carrying `aud` is refused since no audience is configured here. The
/// token must then carry `jti`, the identity claim and a `type` of `access` or
/// `refresh`, checked in that order. A missing user-claims field is filled in
/// with an empty object.
pub fn decode_token(
    token: &str,
    secret: &str,
    algorithm: Algorithm,
    identity_claim_key: &str,
    user_claims_key: &str,
) -> Result<ClaimSet, DecodeError> {
    decode_with(
        token,
        secret,
        &base_validation(algorithm),
        identity_claim_key,
        user_claims_key,
    )
}

/// Decode a token with the configured parameters and require a token type.
///
/// This is the only check keeping refresh tokens off access-protected
/// handlers and the other way around.
pub fn fetch_typed(
    token: &str,
    expected: TokenType,
    config: &AuthConfig,
) -> Result<ClaimSet, AuthError> {
    let claims = decode_with(
        token,
        &config.secret,
        &config.validation(),
        &config.identity_claim_key,
        &config.user_claims_key,
    )?;

    if claims.token_type() != expected {
        return Err(AuthError::WrongTokenType { expected });
    }

    Ok(claims)
}

fn decode_with(
    token: &str,
    secret: &str,
    validation: &Validation,
    identity_claim_key: &str,
    user_claims_key: &str,
) -> Result<ClaimSet, DecodeError> {
    let algorithm = validation
        .algorithms
        .first()
        .copied()
        .unwrap_or(Algorithm::HS256);
    let decoding_key = decoding_key(secret, algorithm)?;

    let token_data =
        decode::<Map<String, Value>>(token, &decoding_key, validation).map_err(|e| {
            tracing::debug!(error = %e, "JWT validation failed");
            DecodeError::from(e)
        })?;

    validate_payload(
        token_data.claims,
        validation,
        identity_claim_key,
        user_claims_key,
    )
}

/// Build the verification key for `algorithm` from configured key material
fn decoding_key(secret: &str, algorithm: Algorithm) -> Result<DecodingKey, DecodeError> {
    let key = match algorithm {
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => {
            return Ok(DecodingKey::from_secret(secret.as_bytes()))
        }
        Algorithm::RS256
        | Algorithm::RS384
        | Algorithm::RS512
        | Algorithm::PS256
        | Algorithm::PS384
        | Algorithm::PS512 => DecodingKey::from_rsa_pem(secret.as_bytes()),
        Algorithm::ES256 | Algorithm::ES384 => DecodingKey::from_ec_pem(secret.as_bytes()),
        Algorithm::EdDSA => DecodingKey::from_ed_pem(secret.as_bytes()),
    };

    key.map_err(|e| {
        tracing::debug!(error = %e, ?algorithm, "unusable key material");
        DecodeError::new(DecodeErrorKind::InvalidKey, "Invalid key material")
    })
}

/// Checks run after the signature and temporal claims have been verified
fn validate_payload(
    mut payload: Map<String, Value>,
    validation: &Validation,
    identity_claim_key: &str,
    user_claims_key: &str,
) -> Result<ClaimSet, DecodeError> {
    if let Some(iat) = payload.get("iat") {
        let iat = iat.as_f64().ok_or_else(|| DecodeError::invalid_claim("iat"))?;
        if iat > (get_current_timestamp() + validation.leeway) as f64 {
            return Err(DecodeError::new(
                DecodeErrorKind::Immature,
                "The token is not yet valid (iat)",
            ));
        }
    }

    // A token minted for some audience is only accepted by a verifier that
    // expects that audience
    if !validation.validate_aud && payload.contains_key("aud") {
        tracing::debug!("token carries an audience but none is configured");
        return Err(DecodeError::invalid_claim("aud"));
    }

    match payload.get(JTI_CLAIM) {
        Some(Value::String(_)) => {}
        Some(_) => return Err(DecodeError::invalid_claim(JTI_CLAIM)),
        None => return Err(DecodeError::missing_claim(JTI_CLAIM)),
    }

    if !payload.contains_key(identity_claim_key) {
        return Err(DecodeError::missing_claim(identity_claim_key));
    }

    let token_type = match payload.get(TYPE_CLAIM) {
        Some(value) => TokenType::from_claim(value).ok_or_else(|| {
            DecodeError::new(
                DecodeErrorKind::InvalidClaim(TYPE_CLAIM.to_string()),
                "Missing or invalid claim: type",
            )
        })?,
        None => {
            return Err(DecodeError::new(
                DecodeErrorKind::MissingClaim(TYPE_CLAIM.to_string()),
                "Missing or invalid claim: type",
            ))
        }
    };

    payload
        .entry(user_claims_key)
        .or_insert_with(|| Value::Object(Map::new()));

    Ok(ClaimSet::from_verified(
        payload,
        token_type,
        identity_claim_key,
        user_claims_key,
    ))
}
