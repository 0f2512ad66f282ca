use domain::{AuthContext, AuthMethod};

#[test]
fn auth_context_builds() {
    let ctx = AuthContext::new("user-1", "a@x.com", "Alice", AuthMethod::AccessToken);

    assert_eq!(ctx.user_id, "user-1");
    assert_eq!(ctx.email, "a@x.com");
    assert_eq!(ctx.full_name, "Alice");
    assert_eq!(ctx.method, AuthMethod::AccessToken);
}
