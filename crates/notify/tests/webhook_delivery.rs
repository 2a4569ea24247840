//! Chat webhook delivery against a local HTTP endpoint.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use hubwatch_notify::traits::{ChatAlert, ChatAttachment, ChatPayload};
use hubwatch_notify::{ChatWebhook, Notifier, NotifyError, RenderedAlert};
use serde_json::{json, Value};
use tokio::sync::Mutex;

#[derive(Clone)]
struct Hook {
    received: Arc<Mutex<Vec<Value>>>,
    status: StatusCode,
}

async fn capture(State(hook): State<Hook>, Json(body): Json<Value>) -> StatusCode {
    hook.received.lock().await.push(body);
    hook.status
}

/// Start a webhook endpoint answering with `status`; returns its URL and the captured bodies.
async fn spawn_hook(status: StatusCode) -> (String, Arc<Mutex<Vec<Value>>>) {
    let received = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new().route("/hook", post(capture)).with_state(Hook {
        received: received.clone(),
        status,
    });
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}/hook"), received)
}

fn alert(url: &str, footer: Option<&str>) -> RenderedAlert {
    RenderedAlert::Chat(ChatAlert {
        webhook_url: url.to_string(),
        payload: ChatPayload {
            attachments: vec![ChatAttachment {
                color: "#FF0000".to_string(),
                text: "*[AWS] 🟠 HIGH Security Finding*".to_string(),
                footer: footer.map(str::to_string),
            }],
        },
    })
}

#[tokio::test]
async fn posts_attachment_payload() {
    let (url, received) = spawn_hook(StatusCode::OK).await;
    let result = ChatWebhook::new()
        .send(&alert(&url, Some("CreatedAt: 2026-09-30T08:14:12Z")))
        .await;
    assert!(result.is_ok(), "got: {result:?}");

    let bodies = received.lock().await;
    assert_eq!(bodies.len(), 1);
    assert_eq!(
        bodies[0],
        json!({ "attachments": [ {
            "color": "#FF0000",
            "text": "*[AWS] 🟠 HIGH Security Finding*",
            "footer": "CreatedAt: 2026-09-30T08:14:12Z",
        } ] })
    );
}

#[tokio::test]
async fn absent_footer_is_not_sent() {
    let (url, received) = spawn_hook(StatusCode::OK).await;
    ChatWebhook::new().send(&alert(&url, None)).await.unwrap();
    let bodies = received.lock().await;
    assert!(bodies[0]["attachments"][0].get("footer").is_none());
}

#[tokio::test]
async fn non_success_status_still_counts_as_delivered() {
    let (url, received) = spawn_hook(StatusCode::INTERNAL_SERVER_ERROR).await;
    let result = ChatWebhook::new().send(&alert(&url, None)).await;
    assert!(result.is_ok(), "got: {result:?}");
    assert_eq!(received.lock().await.len(), 1);
}

#[tokio::test]
async fn unreachable_endpoint_is_a_transport_error() {
    // Port 1 on loopback is never listening in the test environment.
    let result = ChatWebhook::new()
        .send(&alert("http://127.0.0.1:1/hook", None))
        .await;
    match result {
        Err(e @ NotifyError::Http(_)) => assert_eq!(e.kind(), "transport"),
        other => panic!("expected HTTP error, got: {other:?}"),
    }
}

#[tokio::test]
async fn email_payload_is_rejected() {
    let mail = RenderedAlert::Email(hubwatch_notify::traits::EmailAlert {
        from: "alerts@example.com".to_string(),
        to: vec!["sec@example.com".to_string()],
        subject: "s".to_string(),
        text_body: "t".to_string(),
        html_body: "<p>h</p>".to_string(),
    });
    let err = ChatWebhook::new().send(&mail).await.unwrap_err();
    assert!(matches!(err, NotifyError::Transport(_)));
}
