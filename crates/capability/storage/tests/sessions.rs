use buzz_storage::{InMemorySessionStore, SessionRecord, SessionStore};
use chrono::{Duration, Utc};

fn session(session_id: &str, ttl: Duration) -> SessionRecord {
    SessionRecord {
        session_id: session_id.to_string(),
        user_id: "u-1".to_string(),
        expires_at: Utc::now() + ttl,
    }
}

#[tokio::test]
async fn save_find_delete() {
    let store = InMemorySessionStore::new();
    let record = session("s-1", Duration::hours(1));
    store.save_session(&record).await.expect("save");

    let found = store.find_session("s-1").await.expect("find");
    assert_eq!(found, Some(record));

    assert!(store.delete_session("s-1").await.expect("delete"));
    assert!(store.find_session("s-1").await.expect("find").is_none());
    assert!(!store.delete_session("s-1").await.expect("delete again"));
}

#[tokio::test]
async fn expired_session_is_not_found() {
    let store = InMemorySessionStore::new();
    store
        .save_session(&session("s-old", Duration::seconds(-5)))
        .await
        .expect("save");
    assert!(store.find_session("s-old").await.expect("find").is_none());
}
