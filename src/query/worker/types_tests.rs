use super::*;
use serde_json::json;

#[test]
fn test_query_request_creation() {
    let document = Arc::new(json!({"a": 1}));
    let request = QueryRequest::new("$.a", document.clone(), QueryMode::WithNodes);

    assert_eq!(request.query, "$.a");
    assert_eq!(request.mode, QueryMode::WithNodes);
    assert_eq!(*request.document, json!({"a": 1}));
    assert!(!request.cancel_token.is_cancelled());
}

#[test]
fn test_with_cancel_token_shares_cancellation() {
    let cancel_token = CancellationToken::new();
    let request = QueryRequest::new("$", Arc::new(json!([])), QueryMode::Normal)
        .with_cancel_token(cancel_token.clone());

    cancel_token.cancel();
    assert!(request.cancel_token.is_cancelled());
}

#[test]
fn test_response_request_id() {
    let success = QueryResponse::Success {
        matches: vec!["1".to_string()],
        request_id: 3,
    };
    assert_eq!(success.request_id(), 3);

    let failure = QueryResponse::failure(FailureKind::Evaluation, "bad", 4);
    assert_eq!(failure.request_id(), 4);
    match failure {
        QueryResponse::Failure { kind, message, .. } => {
            assert_eq!(kind, FailureKind::Evaluation);
            assert_eq!(message, "bad");
        }
        _ => panic!("Expected Failure variant"),
    }

    assert_eq!(QueryResponse::Cancelled { request_id: 5 }.request_id(), 5);
}
