use faqchat::api::{BackendError, ChatBackend, ChatRequest, HttpBackend};
use faqchat::core::dispatch::{click_suggestion, send_message, start};
use faqchat::core::session::{SESSION_ID_LEN, SESSION_KEY, SessionContext};
use faqchat::core::state::{ChatClient, ChatSettings, GREETING, NETWORK_FALLBACK, StaleReplies};
use faqchat::core::storage::{KeyValueStore, MemoryStore};
use faqchat::core::view::{Entry, Message, Role, Transcript};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, method, path},
};

// ============================================================================
// Helper Functions
// ============================================================================

fn backend_for(server: &MockServer) -> HttpBackend {
    HttpBackend::new(server.uri(), None).unwrap()
}

fn client_with_store(store: &MemoryStore) -> ChatClient<Transcript> {
    let session = SessionContext::ensure(store).unwrap();
    ChatClient::new(session, Transcript::new(), ChatSettings::default())
}

fn bot(text: &str) -> Entry {
    Entry::Message(Message {
        role: Role::Bot,
        text: text.to_string(),
    })
}

fn user(text: &str) -> Entry {
    Entry::Message(Message {
        role: Role::User,
        text: text.to_string(),
    })
}

fn chips(labels: &[&str]) -> Entry {
    Entry::Suggestions(labels.iter().map(|s| s.to_string()).collect())
}

// ============================================================================
// HttpBackend Tests
// ============================================================================

#[tokio::test]
async fn test_chat_posts_message_and_conversation_id() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_json(json!({"message": "Hi", "conversationId": "abc123"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "reply": "Hello back",
            "handoff": false,
            "suggestions": ["Opening hours"]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let backend = backend_for(&mock_server);
    let reply = backend
        .chat(&ChatRequest {
            message: "Hi".to_string(),
            conversation_id: "abc123".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(reply.reply, "Hello back");
    assert!(!reply.handoff);
    assert_eq!(reply.suggestions, Some(vec!["Opening hours".to_string()]));
}

#[tokio::test]
async fn test_chat_reply_with_only_required_field() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"reply": "Sure"})))
        .mount(&mock_server)
        .await;

    let reply = backend_for(&mock_server)
        .chat(&ChatRequest {
            message: "Hi".to_string(),
            conversation_id: "abc".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(reply.reply, "Sure");
    assert!(!reply.handoff);
    assert_eq!(reply.suggestions, None);
}

#[tokio::test]
async fn test_base_url_with_trailing_slash() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/faqs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"question": "Q1"}])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let backend = HttpBackend::new(format!("{}/", mock_server.uri()), None).unwrap();
    let faqs = backend.faqs().await.unwrap();
    assert_eq!(faqs.len(), 1);
    assert_eq!(faqs[0].question, "Q1");
}

#[tokio::test]
async fn test_server_error_maps_to_api_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;

    let result = backend_for(&mock_server)
        .chat(&ChatRequest {
            message: "Hi".to_string(),
            conversation_id: "abc".to_string(),
        })
        .await;

    match result {
        Err(BackendError::Api { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "boom");
        }
        other => panic!("Expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_body_maps_to_malformed_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/faqs"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let result = backend_for(&mock_server).faqs().await;
    assert!(matches!(result, Err(BackendError::Malformed(_))));
}

#[tokio::test]
async fn test_unreachable_server_maps_to_network_error() {
    // Port 1 is reserved and nothing listens on it
    let backend = HttpBackend::new("http://127.0.0.1:1", None).unwrap();
    let result = backend.faqs().await;
    assert!(matches!(result, Err(BackendError::Network(_))));
}

// ============================================================================
// Full Conversation Tests
// ============================================================================

#[tokio::test]
async fn test_start_renders_greeting_then_first_six_faqs() {
    let mock_server = MockServer::start().await;

    let faqs: Vec<_> = (1..=8).map(|i| json!({"question": format!("Q{}", i)})).collect();
    Mock::given(method("GET"))
        .and(path("/api/faqs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(faqs))
        .expect(1)
        .mount(&mock_server)
        .await;

    let store = MemoryStore::new();
    let mut client = client_with_store(&store);
    start(&mut client, &backend_for(&mock_server)).await;

    assert_eq!(
        client.view.entries,
        vec![bot(GREETING), chips(&["Q1", "Q2", "Q3", "Q4", "Q5", "Q6"])]
    );
}

#[tokio::test]
async fn test_start_without_faqs_shows_only_greeting() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/faqs"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let store = MemoryStore::new();
    let mut client = client_with_store(&store);
    start(&mut client, &backend_for(&mock_server)).await;

    assert_eq!(client.view.entries, vec![bot(GREETING)]);
}

#[tokio::test]
async fn test_send_message_uses_persisted_session_id() {
    let mock_server = MockServer::start().await;
    let store = MemoryStore::new();
    let mut client = client_with_store(&store);

    let id = store.get(SESSION_KEY).unwrap().unwrap();
    assert_eq!(id.len(), SESSION_ID_LEN);
    assert_eq!(client.session_id(), id);

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_json(json!({"message": "Hi", "conversationId": id})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "reply": "Hello back",
            "handoff": false,
            "suggestions": []
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    send_message(&mut client, &backend_for(&mock_server), "  Hi  ").await;

    assert_eq!(client.view.entries, vec![user("Hi"), bot("Hello back")]);
    assert!(client.view.input.is_empty());
    assert_eq!(client.in_flight(), 0);
}

#[tokio::test]
async fn test_same_store_keeps_same_conversation() {
    let store = MemoryStore::new();
    let first = client_with_store(&store);
    let second = client_with_store(&store);
    assert_eq!(first.session_id(), second.session_id());
}

#[tokio::test]
async fn test_handoff_reply_appends_notice_then_chips() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "reply": "Escalating",
            "handoff": true,
            "suggestions": ["x"]
        })))
        .mount(&mock_server)
        .await;

    let store = MemoryStore::new();
    let mut client = client_with_store(&store);
    send_message(&mut client, &backend_for(&mock_server), "help").await;

    assert_eq!(
        client.view.entries,
        vec![
            user("help"),
            bot("Escalating You can contact a human at support@example.com."),
            chips(&["x"]),
        ]
    );
}

#[tokio::test]
async fn test_clicking_suggestion_sends_its_label() {
    let mock_server = MockServer::start().await;
    let store = MemoryStore::new();
    let mut client = client_with_store(&store);
    let id = client.session_id().to_string();

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_json(json!({"message": "Opening hours", "conversationId": id})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "reply": "We open at nine.",
            "suggestions": []
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    click_suggestion(&mut client, &backend_for(&mock_server), "Opening hours").await;

    // Empty suggestion list renders no chip row
    assert_eq!(
        client.view.entries,
        vec![user("Opening hours"), bot("We open at nine.")]
    );
    assert!(client.view.input.is_empty());
}

#[tokio::test]
async fn test_unreachable_server_renders_fallback() {
    let store = MemoryStore::new();
    let settings = ChatSettings {
        stale_replies: StaleReplies::Drop,
        ..ChatSettings::default()
    };
    let session = SessionContext::ensure(&store).unwrap();
    let mut client = ChatClient::new(session, Transcript::new(), settings);
    let backend = HttpBackend::new("http://127.0.0.1:1", None).unwrap();

    send_message(&mut client, &backend, "Hi").await;

    assert_eq!(client.view.entries, vec![user("Hi"), bot(NETWORK_FALLBACK)]);
}
