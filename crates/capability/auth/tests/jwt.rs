use buzz_auth::{AuthError, JwtManager};
use domain::{AuthContext, AuthMethod};

fn manager() -> JwtManager {
    JwtManager::new("access-secret".to_string(), 3600, "refresh-secret".to_string(), 7200)
}

fn ctx() -> AuthContext {
    AuthContext::new("user-1", "ada@example.com", "Ada Lovelace", AuthMethod::AccessToken)
}

#[test]
fn jwt_issue_and_decode() {
    let jwt = manager();
    let tokens = jwt.issue_tokens(&ctx()).expect("tokens");

    let access_ctx = jwt.decode_access(&tokens.access_token).expect("access");
    assert_eq!(access_ctx.user_id, "user-1");
    assert_eq!(access_ctx.email, "ada@example.com");
    assert_eq!(access_ctx.full_name, "Ada Lovelace");
    assert_eq!(access_ctx.method, AuthMethod::AccessToken);

    let refresh_user = jwt.decode_refresh(&tokens.refresh_token).expect("refresh");
    assert_eq!(refresh_user, "user-1");
}

#[test]
fn tokens_are_not_interchangeable() {
    let jwt = manager();
    let tokens = jwt.issue_tokens(&ctx()).expect("tokens");
    assert!(matches!(
        jwt.decode_access(&tokens.refresh_token),
        Err(AuthError::TokenInvalid)
    ));
    assert!(matches!(
        jwt.decode_refresh(&tokens.access_token),
        Err(AuthError::TokenInvalid)
    ));
}

#[test]
fn foreign_secret_is_rejected() {
    let other = JwtManager::new("other".to_string(), 3600, "other-refresh".to_string(), 7200);
    let tokens = other.issue_tokens(&ctx()).expect("tokens");
    assert!(matches!(
        manager().decode_access(&tokens.access_token),
        Err(AuthError::TokenInvalid)
    ));
}

#[test]
fn refresh_tokens_differ_within_same_second() {
    let jwt = manager();
    let first = jwt.issue_tokens(&ctx()).expect("tokens");
    let second = jwt.issue_tokens(&ctx()).expect("tokens");
    assert_ne!(first.refresh_token, second.refresh_token);
}

#[test]
fn huge_expiry_saturates() {
    let jwt = JwtManager::new(
        "access-secret".to_string(),
        u64::MAX,
        "refresh-secret".to_string(),
        u64::MAX,
    );
    let tokens = jwt.issue_tokens(&ctx()).expect("tokens");
    assert_eq!(jwt.decode_access(&tokens.access_token).expect("access").user_id, "user-1");
    assert_eq!(jwt.decode_refresh(&tokens.refresh_token).expect("refresh"), "user-1");
}
