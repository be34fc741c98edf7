//! Subscription behavior against a real SSE server

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::http::{HeaderMap, StatusCode};
use axum::response::sse::{Event, Sse};
use axum::routing::get;
use axum::Router;
use futures_util::stream;

use loadwatch_stream::{StreamAuth, StreamError, StreamEvent, StreamSubscription, SubscribeOptions};

async fn spawn_server(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn frame_events() -> Vec<Result<Event, Infallible>> {
    vec![
        Ok(Event::default().comment("ping")),
        Ok(Event::default().data(r#"{"outputLine": "init"}"#)),
        Ok(Event::default().data(r#"{"outputLine": "50% complete"}"#)),
        Ok(Event::default()
            .event("done")
            .data(r#"{"outputLine": "complete"}"#)),
    ]
}

#[tokio::test]
async fn delivers_frames_in_order_then_signals_stream_end() {
    let app = Router::new().route(
        "/feed",
        get(|| async { Sse::new(stream::iter(frame_events())) }),
    );
    let addr = spawn_server(app).await;

    let mut subscription =
        StreamSubscription::open(SubscribeOptions::new(format!("http://{}/feed", addr)))
            .await
            .unwrap();

    let mut frames = Vec::new();
    let mut transport_error = None;
    while let Some(event) = subscription.next_event().await {
        match event {
            StreamEvent::Frame(frame) => frames.push(frame),
            StreamEvent::TransportError(reason) => {
                transport_error = Some(reason);
                break;
            }
        }
    }

    // the comment frame is a keep-alive and never surfaces
    assert_eq!(frames.len(), 3);
    assert_eq!(frames[0].event, None);
    assert_eq!(frames[0].data, r#"{"outputLine": "init"}"#);
    assert_eq!(frames[1].data, r#"{"outputLine": "50% complete"}"#);
    assert_eq!(frames[2].event.as_deref(), Some("done"));
    assert!(transport_error.is_some());
}

#[tokio::test]
async fn custom_auth_header_reaches_the_server() {
    let app = Router::new().route(
        "/feed",
        get(|headers: HeaderMap| async move {
            match headers.get("x-api-key").and_then(|v| v.to_str().ok()) {
                Some("Some-random_key") => Ok(Sse::new(stream::iter(vec![Ok::<_, Infallible>(
                    Event::default().data("authorized"),
                )]))),
                _ => Err(StatusCode::UNAUTHORIZED),
            }
        }),
    );
    let addr = spawn_server(app).await;
    let url = format!("http://{}/feed", addr);

    // without the key the server turns the subscription away
    let denied = StreamSubscription::open(SubscribeOptions::new(url.as_str())).await;
    assert!(matches!(denied, Err(StreamError::Rejected { status: 401 })));

    // with the key frames flow
    let mut subscription = StreamSubscription::open(
        SubscribeOptions::new(url.as_str()).with_auth(StreamAuth::ApiKey {
            header: "X-API-KEY".to_string(),
            key: "Some-random_key".to_string(),
        }),
    )
    .await
    .unwrap();

    match subscription.next_event().await {
        Some(StreamEvent::Frame(frame)) => assert_eq!(frame.data, "authorized"),
        other => panic!("expected a frame, got {:?}", other),
    }
}

#[tokio::test]
async fn non_success_status_is_a_rejection() {
    let app = Router::new().route(
        "/feed",
        get(|| async { StatusCode::TOO_MANY_REQUESTS }),
    );
    let addr = spawn_server(app).await;

    let result =
        StreamSubscription::open(SubscribeOptions::new(format!("http://{}/feed", addr))).await;
    assert!(matches!(result, Err(StreamError::Rejected { status: 429 })));
}

#[tokio::test]
async fn close_is_idempotent_and_stops_delivery() {
    let app = Router::new().route(
        "/feed",
        get(|| async {
            Sse::new(stream::iter(
                (0..100).map(|i| Ok::<_, Infallible>(Event::default().data(format!("line {}", i)))),
            ))
        }),
    );
    let addr = spawn_server(app).await;

    let mut subscription =
        StreamSubscription::open(SubscribeOptions::new(format!("http://{}/feed", addr)))
            .await
            .unwrap();

    subscription.close();
    subscription.close();
    subscription.close();

    assert!(subscription.is_closed());
    assert_eq!(subscription.next_event().await, None);
}

#[tokio::test]
async fn connection_refused_is_a_connection_failure() {
    // bind then drop to get a port with nothing listening
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let result =
        StreamSubscription::open(SubscribeOptions::new(format!("http://{}/feed", addr))).await;
    assert!(matches!(result, Err(StreamError::ConnectionFailed { .. })));
}
