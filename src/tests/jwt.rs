use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::config::{SigningSecrets, TokenLifetimes};
use crate::error::{AuthError, TokenError};
use crate::models::jwt::{Claims, TokenKind};
use crate::services::jwt_service::JwtService;
use crate::utils::jwt::{decode_token, encode_token};

use super::helpers::{ACCESS_SECRET, REFRESH_SECRET};

const T: i64 = 1_700_000_000;

fn jwt_service(access: &str, refresh: &str) -> JwtService {
    JwtService::new(
        Arc::new(SigningSecrets::new(access, refresh)),
        TokenLifetimes::default(),
    )
}

#[test]
fn decode_returns_signed_claims() {
    let claims = Claims::new(7, TokenKind::Access, T + 60);
    let token = encode_token(&claims, b"secret-a").unwrap();

    assert_eq!(
        decode_token(&token, b"secret-a", TokenKind::Access, T),
        Ok(claims)
    );
}

#[test]
fn decode_with_other_secret_is_invalid() {
    let claims = Claims::new(7, TokenKind::Access, T + 60);
    let token = encode_token(&claims, b"secret-a").unwrap();

    assert_eq!(
        decode_token(&token, b"secret-b", TokenKind::Access, T),
        Err(TokenError::Invalid)
    );
}

#[test]
fn tampered_payload_is_invalid() {
    let token = encode_token(&Claims::new(7, TokenKind::Access, T + 60), b"secret-a").unwrap();
    let forged = encode_token(&Claims::new(8, TokenKind::Access, T + 60), b"secret-b").unwrap();

    // original header and signature around someone else's payload
    let parts: Vec<&str> = token.split('.').collect();
    let forged_payload = forged.split('.').nth(1).unwrap();
    let spliced = format!("{}.{}.{}", parts[0], forged_payload, parts[2]);

    assert_eq!(
        decode_token(&spliced, b"secret-a", TokenKind::Access, T),
        Err(TokenError::Invalid)
    );
}

#[test]
fn expired_token_is_rejected_even_with_valid_signature() {
    let token = encode_token(&Claims::new(7, TokenKind::Access, T - 1), b"secret-a").unwrap();

    assert_eq!(
        decode_token(&token, b"secret-a", TokenKind::Access, T),
        Err(TokenError::Expired)
    );
}

#[test]
fn token_expiring_now_is_rejected() {
    let token = encode_token(&Claims::new(7, TokenKind::Access, T), b"secret-a").unwrap();

    assert_eq!(
        decode_token(&token, b"secret-a", TokenKind::Access, T),
        Err(TokenError::Expired)
    );
}

#[test]
fn garbage_is_malformed() {
    // "e30" is base64 for "{}": a parseable JSON header without "alg"
    for token in [
        "",
        "not-a-token",
        "a.b",
        "!!!.@@@.###",
        "abc.def.ghi",
        "e30.e30.sig",
    ] {
        assert_eq!(
            decode_token(token, b"secret-a", TokenKind::Access, T),
            Err(TokenError::Malformed),
            "token {token:?}"
        );
    }
}

#[test]
fn kind_mismatch_is_invalid_with_shared_secret() {
    let token = encode_token(&Claims::new(7, TokenKind::Refresh, T + 60), b"shared").unwrap();

    assert_eq!(
        decode_token(&token, b"shared", TokenKind::Access, T),
        Err(TokenError::Invalid)
    );
}

#[test]
fn issued_pair_follows_lifetimes() {
    let service = jwt_service(ACCESS_SECRET, REFRESH_SECRET);
    let pair = service.issue_pair_at(42, T).unwrap();

    let access = service
        .verify_at(&pair.access_token, TokenKind::Access, T)
        .unwrap();
    let refresh = service
        .verify_at(&pair.refresh_token, TokenKind::Refresh, T)
        .unwrap();

    assert_eq!(access, Claims::new(42, TokenKind::Access, T + 15 * 60));
    assert_eq!(refresh, Claims::new(42, TokenKind::Refresh, T + 30 * 60));
}

#[test]
fn access_expires_before_refresh() {
    let service = jwt_service(ACCESS_SECRET, REFRESH_SECRET);
    let pair = service.issue_pair_at(42, T).unwrap();
    let later = T + 16 * 60;

    let err = service
        .verify_at(&pair.access_token, TokenKind::Access, later)
        .unwrap_err();
    assert!(matches!(
        err,
        AuthError::Token {
            kind: TokenKind::Access,
            source: TokenError::Expired
        }
    ));

    let refresh = service
        .verify_at(&pair.refresh_token, TokenKind::Refresh, later)
        .unwrap();
    assert_eq!(refresh.user_id, 42);
}

#[test]
fn refresh_expires_after_its_lifetime() {
    let service = jwt_service(ACCESS_SECRET, REFRESH_SECRET);
    let pair = service.issue_pair_at(42, T).unwrap();

    let err = service
        .verify_at(&pair.refresh_token, TokenKind::Refresh, T + 31 * 60)
        .unwrap_err();
    assert!(matches!(
        err,
        AuthError::Token {
            kind: TokenKind::Refresh,
            source: TokenError::Expired
        }
    ));
}

#[test]
fn tokens_of_a_pair_are_not_interchangeable() {
    let service = jwt_service(ACCESS_SECRET, REFRESH_SECRET);
    let pair = service.issue_pair_at(42, T).unwrap();

    assert!(matches!(
        service.verify_at(&pair.refresh_token, TokenKind::Access, T),
        Err(AuthError::Token {
            source: TokenError::Invalid,
            ..
        })
    ));
    assert!(matches!(
        service.verify_at(&pair.access_token, TokenKind::Refresh, T),
        Err(AuthError::Token {
            source: TokenError::Invalid,
            ..
        })
    ));
}

#[test]
fn issue_pair_requires_both_secrets() {
    assert!(matches!(
        jwt_service("", REFRESH_SECRET).issue_pair(1),
        Err(AuthError::MissingAccessSecret)
    ));
    assert!(matches!(
        jwt_service(ACCESS_SECRET, "").issue_pair(1),
        Err(AuthError::MissingRefreshSecret)
    ));
    assert!(matches!(
        jwt_service("", "").ensure_secrets(),
        Err(AuthError::MissingAccessSecret)
    ));
}

#[test]
fn verify_without_secret_fails_closed() {
    let issuer = jwt_service(ACCESS_SECRET, REFRESH_SECRET);
    let pair = issuer.issue_pair(1).unwrap();

    assert!(matches!(
        jwt_service(ACCESS_SECRET, "").verify(&pair.refresh_token, TokenKind::Refresh),
        Err(AuthError::MissingRefreshSecret)
    ));
}

#[test]
fn wall_clock_pair_is_valid_now() {
    let service = jwt_service(ACCESS_SECRET, REFRESH_SECRET);
    let before = Utc::now().timestamp();
    let pair = service.issue_pair(9).unwrap();

    let claims = service.verify(&pair.access_token, TokenKind::Access).unwrap();
    assert_eq!(claims.user_id, 9);
    assert!(claims.expires_at >= before + Duration::minutes(15).num_seconds());
}

#[test]
fn lifetimes_reject_refresh_shorter_than_access() {
    assert!(TokenLifetimes::new(Duration::minutes(15), Duration::minutes(5)).is_err());
    assert!(TokenLifetimes::new(Duration::zero(), Duration::minutes(5)).is_err());
    assert!(TokenLifetimes::new(Duration::minutes(15), Duration::minutes(15)).is_ok());
}
