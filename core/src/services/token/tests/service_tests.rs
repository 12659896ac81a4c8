//! Unit tests for token service

use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use uuid::Uuid;

use gk_shared::JwtConfig;

use crate::cache::{
    CacheKeyGenerator, CacheService, CacheServiceExt, KeyArg, MemoryCacheService,
    Sha256KeyGenerator,
};
use crate::domain::entities::token::{Claims, TokenKind, TokenRecord};
use crate::errors::{AuthError, DomainError, ValidationError};
use crate::services::token::TokenService;

use super::mocks::UnavailableCache;

const ACCESS_SECRET: &str = "access-secret-for-tests";
const REFRESH_SECRET: &str = "refresh-secret-for-tests";

fn jwt_config() -> JwtConfig {
    JwtConfig::new(ACCESS_SECRET, REFRESH_SECRET)
}

fn create_service() -> (TokenService, Arc<MemoryCacheService>) {
    let cache = Arc::new(MemoryCacheService::new());
    let service = TokenService::new(
        &jwt_config(),
        cache.clone(),
        Arc::new(Sha256KeyGenerator::new()),
    )
    .unwrap();
    (service, cache)
}

fn record_key(token_id: &str, kind: TokenKind) -> String {
    Sha256KeyGenerator::new().generate_key("token", &[KeyArg::from(token_id), kind.as_str().into()])
}

/// Reads the claims of a token issued by the service under test
fn claims_of(token: &str, secret: &str) -> Claims {
    let mut validation = jsonwebtoken::Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.set_issuer(&["gatekeeper"]);
    jsonwebtoken::decode::<Claims>(
        token,
        &jsonwebtoken::DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .unwrap()
    .claims
}

#[test]
fn test_missing_secret_fails_construction() {
    let result = TokenService::new(
        &JwtConfig::new("", REFRESH_SECRET),
        Arc::new(MemoryCacheService::new()),
        Arc::new(Sha256KeyGenerator::new()),
    );
    assert!(matches!(result, Err(DomainError::Configuration { .. })));
}

#[test]
fn test_invalid_lifetime_fails_construction() {
    let result = TokenService::new(
        &jwt_config().with_access_expires_in("fifteen minutes"),
        Arc::new(MemoryCacheService::new()),
        Arc::new(Sha256KeyGenerator::new()),
    );
    assert!(matches!(result, Err(DomainError::Configuration { .. })));
}

#[tokio::test]
async fn test_issued_access_token_verifies_to_subject() {
    let (service, _) = create_service();

    let token = service.issue_access_token("user-42").await.unwrap();
    assert_eq!(
        service.verify(&token, TokenKind::Access).await,
        Some("user-42".to_string())
    );
}

#[tokio::test]
async fn test_issued_refresh_token_verifies_to_subject() {
    let (service, _) = create_service();

    let token = service.issue_refresh_token("user-42").await.unwrap();
    assert_eq!(
        service.verify(&token, TokenKind::Refresh).await,
        Some("user-42".to_string())
    );
}

#[tokio::test]
async fn test_claims_and_record_are_written() {
    let (service, cache) = create_service();

    let token = service.issue_access_token("user-42").await.unwrap();
    let claims = claims_of(&token, ACCESS_SECRET);
    assert_eq!(claims.sub, "user-42");
    assert_eq!(claims.typ, TokenKind::Access);
    assert_eq!(claims.exp - claims.iat, 15 * 60);

    let key = record_key(&claims.jti, TokenKind::Access);
    assert!(!key.contains(&claims.jti));

    let record: TokenRecord = cache.get_json(&key).await.unwrap().unwrap();
    assert!(record.valid);
    assert_eq!(record.subject_id, "user-42");
    assert_eq!(record.token_id.to_string(), claims.jti);
    assert_eq!(cache.get_ttl(&key).await.unwrap(), Some(15 * 60));
}

#[tokio::test]
async fn test_empty_subject_is_rejected() {
    let (service, cache) = create_service();

    let result = service.issue_access_token("  ").await;
    assert!(matches!(
        result,
        Err(DomainError::ValidationErr(ValidationError::RequiredField { .. }))
    ));
    assert!(cache.is_empty().await);
}

#[tokio::test]
async fn test_token_ids_are_unique() {
    let (service, _) = create_service();

    let first = service.issue_access_token("user-42").await.unwrap();
    let second = service.issue_access_token("user-42").await.unwrap();
    assert_ne!(
        claims_of(&first, ACCESS_SECRET).jti,
        claims_of(&second, ACCESS_SECRET).jti
    );
}

#[tokio::test]
async fn test_revoked_token_is_invalid_before_expiry() {
    let (service, _) = create_service();

    let token = service.issue_access_token("user-42").await.unwrap();
    service.revoke(&token, TokenKind::Access).await;

    assert!(!claims_of(&token, ACCESS_SECRET).is_expired());
    assert_eq!(service.verify(&token, TokenKind::Access).await, None);
}

#[tokio::test]
async fn test_revoke_is_idempotent_and_quiet() {
    let (service, _) = create_service();

    let token = service.issue_refresh_token("user-42").await.unwrap();
    service.revoke(&token, TokenKind::Refresh).await;
    service.revoke(&token, TokenKind::Refresh).await;
    service.revoke("not-a-jwt", TokenKind::Refresh).await;
    service.revoke("", TokenKind::Access).await;
}

#[tokio::test]
async fn test_revoking_one_kind_keeps_the_other() {
    let (service, _) = create_service();

    let pair = service.issue_token_pair("user-42").await.unwrap();
    service.revoke(&pair.access_token, TokenKind::Access).await;

    assert_eq!(service.verify(&pair.access_token, TokenKind::Access).await, None);
    assert_eq!(
        service.verify(&pair.refresh_token, TokenKind::Refresh).await,
        Some("user-42".to_string())
    );
}

#[tokio::test]
async fn test_expired_token_is_invalid_regardless_of_cache() {
    let (service, cache) = create_service();

    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: "user-42".to_string(),
        jti: Uuid::new_v4().to_string(),
        iat: now - 120,
        exp: now - 60,
        typ: TokenKind::Access,
        iss: "gatekeeper".to_string(),
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(ACCESS_SECRET.as_bytes()),
    )
    .unwrap();

    // A live record does not rescue an expired signature
    let record = TokenRecord::issued(claims.token_id().unwrap(), "user-42", TokenKind::Access);
    cache
        .set_json(&record_key(&claims.jti, TokenKind::Access), &record, Some(600))
        .await
        .unwrap();

    assert_eq!(service.verify(&token, TokenKind::Access).await, None);
}

#[tokio::test]
async fn test_invalidated_record_rejects_token() {
    let (service, cache) = create_service();

    let token = service.issue_access_token("user-42").await.unwrap();
    let claims = claims_of(&token, ACCESS_SECRET);
    let key = record_key(&claims.jti, TokenKind::Access);

    let mut record: TokenRecord = cache.get_json(&key).await.unwrap().unwrap();
    record.valid = false;
    cache.set_json(&key, &record, Some(60)).await.unwrap();

    assert_eq!(service.verify(&token, TokenKind::Access).await, None);
}

#[tokio::test]
async fn test_evicted_record_rejects_token() {
    let (service, cache) = create_service();

    let token = service.issue_access_token("user-42").await.unwrap();
    let claims = claims_of(&token, ACCESS_SECRET);
    cache
        .delete(&record_key(&claims.jti, TokenKind::Access))
        .await
        .unwrap();

    assert_eq!(service.verify(&token, TokenKind::Access).await, None);
}

#[tokio::test]
async fn test_wrong_kind_is_rejected() {
    let (service, _) = create_service();

    let access = service.issue_access_token("user-42").await.unwrap();
    let refresh = service.issue_refresh_token("user-42").await.unwrap();

    assert_eq!(service.verify(&access, TokenKind::Refresh).await, None);
    assert_eq!(service.verify(&refresh, TokenKind::Access).await, None);
}

#[tokio::test]
async fn test_kind_claim_is_checked_when_secrets_match() {
    let cache = Arc::new(MemoryCacheService::new());
    let service = TokenService::new(
        &JwtConfig::new("shared-secret", "shared-secret"),
        cache,
        Arc::new(Sha256KeyGenerator::new()),
    )
    .unwrap();

    let refresh = service.issue_refresh_token("user-42").await.unwrap();
    assert_eq!(service.verify(&refresh, TokenKind::Access).await, None);
}

#[tokio::test]
async fn test_tampered_and_malformed_tokens_are_rejected() {
    let (service, _) = create_service();

    let token = service.issue_access_token("user-42").await.unwrap();
    let mut tampered = token.clone();
    tampered.push('x');

    assert_eq!(service.verify(&tampered, TokenKind::Access).await, None);
    assert_eq!(service.verify("garbage", TokenKind::Access).await, None);
    assert_eq!(service.verify("", TokenKind::Access).await, None);
}

#[tokio::test]
async fn test_token_signed_with_other_secret_is_rejected() {
    let (service, _) = create_service();
    let other = TokenService::new(
        &JwtConfig::new("another-access-secret", REFRESH_SECRET),
        Arc::new(MemoryCacheService::new()),
        Arc::new(Sha256KeyGenerator::new()),
    )
    .unwrap();

    let foreign = other.issue_access_token("user-42").await.unwrap();
    assert_eq!(service.verify(&foreign, TokenKind::Access).await, None);
}

#[tokio::test]
async fn test_remaining_ttl() {
    let (service, _) = create_service();

    let token = service.issue_refresh_token("user-42").await.unwrap();
    let claims = claims_of(&token, REFRESH_SECRET);

    assert_eq!(
        service.remaining_ttl(TokenKind::Refresh, &claims.jti).await,
        7 * 24 * 60 * 60
    );
    assert_eq!(service.remaining_ttl(TokenKind::Access, &claims.jti).await, 0);
    assert_eq!(
        service
            .remaining_ttl(TokenKind::Refresh, &Uuid::new_v4().to_string())
            .await,
        0
    );
}

#[tokio::test]
async fn test_token_pair() {
    let (service, _) = create_service();

    let pair = service.issue_token_pair("user-42").await.unwrap();
    assert_eq!(pair.access_expires_in, 15 * 60);
    assert_eq!(pair.refresh_expires_in, 7 * 24 * 60 * 60);
    assert_eq!(pair.token_type, "Bearer");
    assert_ne!(pair.access_token, pair.refresh_token);
}

#[tokio::test]
async fn test_refresh_access_token() {
    let (service, _) = create_service();

    let refresh = service.issue_refresh_token("user-42").await.unwrap();
    let access = service.refresh_access_token(&refresh).await.unwrap();
    assert_eq!(
        service.verify(&access, TokenKind::Access).await,
        Some("user-42".to_string())
    );

    service.revoke(&refresh, TokenKind::Refresh).await;
    assert!(matches!(
        service.refresh_access_token(&refresh).await,
        Err(DomainError::Auth(AuthError::InvalidToken))
    ));
}

#[tokio::test]
async fn test_unavailable_cache() {
    let (healthy, _) = create_service();
    let token = healthy.issue_access_token("user-42").await.unwrap();

    let service = TokenService::new(
        &jwt_config(),
        Arc::new(UnavailableCache),
        Arc::new(Sha256KeyGenerator::new()),
    )
    .unwrap();

    // Only issuing surfaces the cache failure
    assert!(matches!(
        service.issue_access_token("user-42").await,
        Err(DomainError::Cache { .. })
    ));
    assert_eq!(service.verify(&token, TokenKind::Access).await, None);
    service.revoke(&token, TokenKind::Access).await;
    assert_eq!(service.remaining_ttl(TokenKind::Access, "id").await, 0);
}
