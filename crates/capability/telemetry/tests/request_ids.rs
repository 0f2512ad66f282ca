use buzz_telemetry::{new_request_ids, request_ids_from};

#[test]
fn request_ids_non_empty_and_distinct() {
    let ids = new_request_ids();
    assert!(!ids.request_id.is_empty());
    assert!(!ids.trace_id.is_empty());
    assert_ne!(ids.request_id, ids.trace_id);
}

#[test]
fn incoming_request_id_is_kept() {
    let ids = request_ids_from(Some("edge-42.a_b"));
    assert_eq!(ids.request_id, "edge-42.a_b");
    assert!(!ids.trace_id.is_empty());
}

#[test]
fn unsafe_incoming_request_id_is_replaced() {
    let ids = request_ids_from(Some("bad id\r\n"));
    assert_ne!(ids.request_id, "bad id\r\n");
    let ids = request_ids_from(Some(""));
    assert!(!ids.request_id.is_empty());
}
