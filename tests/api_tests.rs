use console_nav::api::{ApiClient, ApiError, ApiSession, ApiUser};

#[test]
fn urls_are_rooted_at_the_api_prefix() {
    let client = ApiClient::new("http://console.example.com/");
    assert_eq!(client.url("login"), "http://console.example.com/api/1.0/login");
    assert_eq!(
        client.url("/users/jdoe"),
        "http://console.example.com/api/1.0/users/jdoe"
    );
}

#[test]
fn user_payload_deserializes() {
    let json = r#"{
        "name": "John Doe",
        "username": "jdoe",
        "email": "jdoe@example.com",
        "role": "limited",
        "status": true
    }"#;
    let user: ApiUser = serde_json::from_str(json).unwrap();
    assert_eq!(user.username, "jdoe");
    assert!(!user.email_notifications);
}

#[test]
fn session_deserializes_token() {
    let session: ApiSession = serde_json::from_str(r#"{"access_token": "abc123"}"#).unwrap();
    assert_eq!(session.access_token, "abc123");
}

#[test]
fn unreachable_server_is_a_request_error() {
    let client = ApiClient::new("http://127.0.0.1:1");
    let err = client.login("admin", "secret").unwrap_err();
    match &err {
        ApiError::Request { url, .. } => assert_eq!(url, "http://127.0.0.1:1/api/1.0/login"),
        other => panic!("Expected Request error, got {:?}", other),
    }
    assert!(err.to_string().contains("/api/1.0/login"));
}
