use std::time::Duration;

use destinations_chat::app::App;
use destinations_chat::{ChatClient, EntryKind, Focus};
use serde_json::json;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn wait_for_reply(app: &mut App) {
    for _ in 0..200 {
        app.poll_query().await;
        if app.query_task.is_none() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("request never finished");
}

#[tokio::test]
async fn test_background_request_round_trip() {
    let server = MockServer::start().await;
    let inner = json!({ "llm_answer": "**Kyoto** au printemps", "destinations_count": 12 });
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "body": inner.to_string() })))
        .expect(1)
        .mount(&server)
        .await;

    let mut app = App::new(ChatClient::new(&server.uri()));
    app.chat.input = "Japon ?".into();
    app.chat.focus = Focus::Conversation;
    app.submit();

    assert!(app.query_task.is_some());
    assert!(app.chat.view.is_thinking());

    // Re-submitting while the task runs is ignored
    app.chat.input = "Encore".into();
    app.submit();
    assert_eq!(app.chat.view.count_of(EntryKind::User), 1);

    wait_for_reply(&mut app).await;

    assert!(!app.chat.is_pending());
    assert_eq!(app.chat.focus, Focus::Input);
    let last = app.chat.view.entries().last().unwrap();
    assert_eq!(last.kind, EntryKind::Info);
    assert_eq!(last.text, "📊 12 destinations analysées");
}

#[tokio::test]
async fn test_background_request_failure_recovers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let mut app = App::new(ChatClient::new(&server.uri()));
    app.chat.input = "Bali ?".into();
    app.submit();
    wait_for_reply(&mut app).await;

    assert!(!app.chat.is_pending());
    assert_eq!(app.chat.view.count_of(EntryKind::Error), 1);
    assert!(!app.chat.view.is_thinking());
}
