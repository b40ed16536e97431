use jsonwebtoken::{
    decode, decode_header, encode, errors::Error as JwtError, errors::ErrorKind, Algorithm,
    DecodingKey, EncodingKey, Header, Validation,
};

use crate::error::TokenError;
use crate::models::jwt::{Claims, TokenKind};

/// Sign `claims` into a compact HS256 token.
pub fn encode_token(claims: &Claims, secret: &[u8]) -> Result<String, JwtError> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret),
    )
}

/// Recover the claims from `token`, checking signature, kind and expiry against `now`.
///
/// A token is accepted only when the signature matches `secret`, the embedded kind is
/// `kind` and `exp > now`.
pub fn decode_token(
    token: &str,
    secret: &[u8],
    kind: TokenKind,
    now: i64,
) -> Result<Claims, TokenError> {
    // expiry is checked below against the caller's clock, without leeway
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp"]);

    // a header that does not parse is structural damage, not a bad signature
    decode_header(token).map_err(|_| TokenError::Malformed)?;

    let claims = decode::<Claims>(token, &DecodingKey::from_secret(secret), &validation)
        .map(|data| data.claims)
        .map_err(|e| classify(&e))?;

    if claims.kind != kind {
        return Err(TokenError::Invalid);
    }
    if claims.expires_at <= now {
        return Err(TokenError::Expired);
    }

    Ok(claims)
}

fn classify(err: &JwtError) -> TokenError {
    match err.kind() {
        ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Utf8(_) => {
            TokenError::Malformed
        }
        _ => TokenError::Invalid,
    }
}
