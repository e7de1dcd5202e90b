use std::sync::Arc;

use futures::StreamExt;
use mockito::Matcher;
use serde_json::json;
use tabble_llm::{ContentPart, Role, ThreadMessage, ToolCallPart};
use tabble_persist::{
    ApiError, HttpPersistenceClient, InMemoryPersistenceClient, PersistenceClient,
    RemoteThreadHistory, RemoteThreadList, ThreadHistoryAdapter, ThreadListAdapter, ThreadStatus,
};

fn http_client(server: &mockito::Server) -> Arc<dyn PersistenceClient> {
    Arc::new(
        HttpPersistenceClient::builder()
            .base_url(server.url())
            .build()
            .unwrap(),
    )
}

#[tokio::test]
async fn test_chain_reconstruction_after_append() {
    let store: Arc<dyn PersistenceClient> = Arc::new(InMemoryPersistenceClient::new());
    let threads = RemoteThreadList::new(store.clone());
    let init = threads.initialize("thread-1").await.unwrap();
    assert_eq!(init.remote_id, "thread-1");
    assert_eq!(init.external_id, "thread-1");

    let history = RemoteThreadHistory::new(store, Some(init.remote_id));
    let messages = vec![
        ThreadMessage::user("What is in column A?").with_id("m0"),
        ThreadMessage::assistant(vec![ContentPart::text("Numbers.")]).with_id("m1"),
        ThreadMessage::user("Sum them").with_id("m2"),
        ThreadMessage::assistant(vec![
            ToolCallPart::new("c1", "calc", json!({"op": "sum"})).into(),
            ContentPart::text("42"),
        ])
        .with_id("m3"),
    ];
    for message in &messages {
        history.append(message).await.unwrap();
    }

    let loaded = history.load().await.unwrap();

    assert_eq!(loaded.len(), 4);
    assert_eq!(loaded[0].parent_id, None);
    for i in 1..loaded.len() {
        assert_eq!(loaded[i].parent_id.as_deref(), Some(messages[i - 1].id.as_str()));
    }
    assert_eq!(loaded[3].message.content, messages[3].content);
    assert_eq!(loaded[2].message.role, Role::User);
}

#[tokio::test]
async fn test_load_on_uninitialized_thread_is_empty() {
    let store: Arc<dyn PersistenceClient> = Arc::new(InMemoryPersistenceClient::new());
    let history = RemoteThreadHistory::new(store, None);
    assert!(history.load().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_uninitialized_append_makes_no_call() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/message")
        .expect(0)
        .create_async()
        .await;

    let history = RemoteThreadHistory::new(http_client(&server), None);
    let result = history.append(&ThreadMessage::user("hello")).await;

    assert!(result.is_ok());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_append_posts_message() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/message")
        .match_body(Matcher::Json(json!({
            "ui_message_id": "m1",
            "thread_id": "t1",
            "role": "user",
            "content": [{"type": "text", "text": "hello"}]
        })))
        .with_status(200)
        .with_body(r#"{"id":"db-1","ui_message_id":"m1"}"#)
        .create_async()
        .await;

    let history = RemoteThreadHistory::new(http_client(&server), Some("t1".to_string()));
    history
        .append(&ThreadMessage::user("hello").with_id("m1"))
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_load_from_http_backend() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/messages")
        .match_query(Matcher::UrlEncoded("thread_id".into(), "t1".into()))
        .with_status(200)
        .with_body(
            json!({
                "messages": [
                    {
                        "id": "m0", "thread_id": "t1", "role": "user",
                        "content": [{"type": "text", "text": "hi"}],
                        "created_at": "2025-01-02T03:04:05.678901"
                    },
                    {
                        "id": "m1", "thread_id": "t1", "role": "assistant",
                        "content": [{"type": "tool-call", "toolCallId": "c", "toolName": "web", "args": "{\"q\":1}"}],
                        "created_at": "2025-01-02T03:04:06+00:00",
                        "updated_at": null
                    }
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let history = RemoteThreadHistory::new(http_client(&server), Some("t1".to_string()));
    let loaded = history.load().await.unwrap();

    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[1].parent_id.as_deref(), Some("m0"));
    let call = loaded[1].message.content[0].as_tool_call().unwrap();
    assert_eq!(call.args, json!({"q": 1}));
}

#[tokio::test]
async fn test_list_maps_status_and_title() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/threads")
        .with_status(200)
        .with_body(
            json!({
                "threads": [
                    {"id": "1", "ui_thread_id": "a", "title": "Budget", "archived": false,
                     "created_at": "2025-01-01T00:00:00", "updated_at": "2025-01-01T00:00:00"},
                    {"id": "2", "ui_thread_id": "b", "title": "", "archived": true,
                     "created_at": "2025-01-01T00:00:00", "updated_at": "2025-01-01T00:00:00"}
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let threads = RemoteThreadList::new(http_client(&server));
    let list = threads.list().await.unwrap();

    assert_eq!(list.len(), 2);
    assert_eq!(list[0].status, ThreadStatus::Regular);
    assert_eq!(list[0].remote_id, "a");
    assert_eq!(list[0].title, "Budget");
    assert_eq!(list[1].status, ThreadStatus::Archived);
    assert_eq!(list[1].title, "New Chat");
}

#[tokio::test]
async fn test_initialize_posts_local_id() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/thread")
        .match_body(Matcher::Json(json!({"ui_thread_id": "local-1", "title": "New Chat"})))
        .with_status(200)
        .with_body(r#"{"id":"db-7","ui_thread_id":"local-1"}"#)
        .create_async()
        .await;

    let threads = RemoteThreadList::new(http_client(&server));
    let init = threads.initialize("local-1").await.unwrap();

    mock.assert_async().await;
    assert_eq!(init.remote_id, "local-1");
    assert_eq!(init.external_id, "local-1");
}

#[tokio::test]
async fn test_generate_title_default_persists_new_chat() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("PUT", "/api/thread")
        .match_body(Matcher::Json(json!({"ui_thread_id": "t1", "title": "New Chat"})))
        .with_status(200)
        .with_body(r#"{"id":"1","ui_thread_id":"t1"}"#)
        .create_async()
        .await;

    let threads = RemoteThreadList::new(http_client(&server));
    let tokens: Vec<String> = threads
        .generate_title("t1", &[])
        .await
        .unwrap()
        .collect()
        .await;

    mock.assert_async().await;
    assert!(tokens.is_empty());
}

#[tokio::test]
async fn test_delete_archives_instead() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("PUT", "/api/thread")
        .match_body(Matcher::Json(json!({"ui_thread_id": "t1", "archived": true})))
        .with_status(200)
        .with_body(r#"{"id":"1","ui_thread_id":"t1"}"#)
        .create_async()
        .await;

    let threads = RemoteThreadList::new(http_client(&server));
    threads.delete("t1").await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_rename_archive_unarchive_are_idempotent() {
    let store: Arc<dyn PersistenceClient> = Arc::new(InMemoryPersistenceClient::new());
    let threads = RemoteThreadList::new(store);
    threads.initialize("t1").await.unwrap();

    for _ in 0..2 {
        threads.rename("t1", "Quarterly numbers").await.unwrap();
        threads.archive("t1").await.unwrap();
    }
    let list = threads.list().await.unwrap();
    assert_eq!(list[0].title, "Quarterly numbers");
    assert_eq!(list[0].status, ThreadStatus::Archived);

    threads.unarchive("t1").await.unwrap();
    threads.unarchive("t1").await.unwrap();
    assert_eq!(threads.list().await.unwrap()[0].status, ThreadStatus::Regular);
}

#[tokio::test]
async fn test_server_error_surfaces_as_api_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("PUT", "/api/thread")
        .with_status(404)
        .with_body(r#"{"detail":"Thread not found"}"#)
        .create_async()
        .await;

    let threads = RemoteThreadList::new(http_client(&server));
    let err = threads.rename("missing", "x").await.unwrap_err();

    assert!(matches!(err, ApiError::Status { status: 404, .. }));
    assert!(err.is_not_found());
    assert_eq!(err.user_message(), "We're having temporary problems. Please try again.");
}
