use super::*;

#[tokio::test]
async fn dispatch_without_config_reports_failure() {
    let state = crate::state::test_helpers::test_app_state();
    let request = EmailRequest {
        form_type: FormKind::Contact,
        data: serde_json::json!({"name": "Pat"}),
    };

    let response = dispatch(State(state), Json(request)).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("not configured"));
}

#[test]
fn email_request_accepts_all_form_kinds() {
    for kind in ["contact", "quote", "booking", "custom"] {
        let raw = format!(r#"{{"form_type": "{kind}", "data": {{}}}}"#);
        assert!(serde_json::from_str::<EmailRequest>(&raw).is_ok(), "rejected {kind}");
    }
}

#[test]
fn success_body_omits_error() {
    let json = serde_json::to_value(EmailResponse::sent("msg_123".into())).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["message_id"], "msg_123");
    assert!(json.get("error").is_none());
}
