//! Lifecycle tests for the consumer state machine.
//!
//! Connect-phase behaviors run against a scripted wiremock upstream;
//! chunk-level timing runs against a small in-process axum fixture, since
//! the mock server sends its body in one piece.

use cancelstream_client::{Consumer, ConsumerState, FetchError};
use cancelstream_core::Phase;
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const COMPLETED_BODY: &str = "Request completed after 3 seconds";

async fn fixture_server() -> String {
    use axum::body::Body;
    use axum::routing::get;
    use axum::Router;
    use bytes::Bytes;

    async fn chunks() -> Body {
        Body::from_stream(async_stream::stream! {
            yield Ok::<_, std::io::Error>(Bytes::from_static(b"Hello,"));
            tokio::time::sleep(Duration::from_millis(300)).await;
            yield Ok(Bytes::from_static(b" world!"));
        })
    }

    async fn failbody() -> Body {
        Body::from_stream(async_stream::stream! {
            yield Ok::<_, std::io::Error>(Bytes::from_static(b"Hello,"));
            tokio::time::sleep(Duration::from_millis(100)).await;
            yield Err(std::io::Error::other("This is a test error"));
        })
    }

    let app = Router::new()
        .route("/chunks", get(chunks))
        .route("/failbody", get(failbody));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn completes_a_simple_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/delayed"))
        .respond_with(ResponseTemplate::new(200).set_body_string(COMPLETED_BODY))
        .mount(&server)
        .await;

    let mut consumer = Consumer::new();
    let mut handle = consumer.start(format!("{}/delayed", server.uri()));

    let state = handle.finished().await;
    assert_eq!(
        state,
        ConsumerState::Completed {
            body: COMPLETED_BODY.to_string()
        }
    );
}

#[tokio::test]
async fn error_status_is_a_connect_phase_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/throwError"))
        .respond_with(ResponseTemplate::new(500).set_body_string("This is a test error"))
        .mount(&server)
        .await;

    let mut consumer = Consumer::new();
    let mut handle = consumer.start(format!("{}/throwError", server.uri()));

    match handle.finished().await {
        ConsumerState::Errored { received, error } => {
            assert_eq!(received, "");
            assert_eq!(error.phase(), Phase::Connect);
            assert!(!error.is_cancelled());
            assert!(error.to_string().contains("This is a test error"), "{error}");
        }
        other => panic!("expected Errored, got {other:?}"),
    }
}

#[tokio::test]
async fn operator_cancel_during_connect_is_tagged_connect_phase() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/delayed"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(COMPLETED_BODY)
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let mut consumer = Consumer::new();
    let mut handle = consumer.start(format!("{}/delayed", server.uri()));

    tokio::time::sleep(Duration::from_millis(50)).await;
    let started = Instant::now();
    handle.cancel();

    let state = handle.finished().await;
    assert!(
        started.elapsed() < Duration::from_millis(400),
        "cancel took {:?} to settle",
        started.elapsed()
    );
    assert_eq!(
        state,
        ConsumerState::Cancelled {
            received: String::new(),
            error: FetchError::ConnectCancelled
        }
    );
}

#[tokio::test]
async fn starting_a_new_request_cancels_the_prior_one() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("slow")
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/fast"))
        .respond_with(ResponseTemplate::new(200).set_body_string("fast"))
        .mount(&server)
        .await;

    let mut consumer = Consumer::new();
    let mut first = consumer.start(format!("{}/slow", server.uri()));
    tokio::time::sleep(Duration::from_millis(50)).await;
    let mut second = consumer.start(format!("{}/fast", server.uri()));

    assert_eq!(
        first.finished().await,
        ConsumerState::Cancelled {
            received: String::new(),
            error: FetchError::ConnectCancelled
        }
    );
    assert_eq!(
        second.finished().await,
        ConsumerState::Completed {
            body: "fast".to_string()
        }
    );
    assert_ne!(first.id(), second.id());
}

#[tokio::test]
async fn cancelling_twice_changes_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("slow")
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let mut consumer = Consumer::new();
    let mut handle = consumer.start(format!("{}/slow", server.uri()));

    handle.cancel();
    handle.cancel();

    let once = handle.finished().await;
    handle.cancel();
    assert_eq!(handle.state(), once);
    assert!(matches!(once, ConsumerState::Cancelled { .. }));
}

#[tokio::test]
async fn cancel_after_completion_does_not_unsettle_it() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/fast"))
        .respond_with(ResponseTemplate::new(200).set_body_string("done"))
        .mount(&server)
        .await;

    let mut consumer = Consumer::new();
    let mut handle = consumer.start(format!("{}/fast", server.uri()));

    let state = handle.finished().await;
    assert!(matches!(state, ConsumerState::Completed { .. }));

    handle.cancel();
    assert_eq!(handle.state(), state);
}

#[tokio::test]
async fn streaming_accumulates_chunks_in_order() {
    let base = fixture_server().await;

    let mut consumer = Consumer::new();
    let mut handle = consumer.start(format!("{base}/chunks"));

    let mut states = handle.subscribe();
    states
        .wait_for(|s| matches!(s, ConsumerState::Streaming { received } if received == "Hello,"))
        .await
        .unwrap();

    assert_eq!(
        handle.finished().await,
        ConsumerState::Completed {
            body: "Hello, world!".to_string()
        }
    );
}

#[tokio::test]
async fn operator_cancel_mid_stream_keeps_the_prefix() {
    let base = fixture_server().await;

    let mut consumer = Consumer::new();
    let mut handle = consumer.start(format!("{base}/chunks"));

    let mut states = handle.subscribe();
    states
        .wait_for(|s| matches!(s, ConsumerState::Streaming { received } if received == "Hello,"))
        .await
        .unwrap();
    handle.cancel();

    assert_eq!(
        handle.finished().await,
        ConsumerState::Cancelled {
            received: "Hello,".to_string(),
            error: FetchError::StreamingCancelled
        }
    );
}

#[tokio::test]
async fn mid_stream_fault_is_a_streaming_phase_failure() {
    let base = fixture_server().await;

    let mut consumer = Consumer::new();
    let mut handle = consumer.start(format!("{base}/failbody"));

    match handle.finished().await {
        ConsumerState::Errored { received, error } => {
            assert_eq!(received, "Hello,");
            assert_eq!(error.phase(), Phase::Streaming);
            assert!(!error.is_cancelled());
        }
        other => panic!("expected Errored, got {other:?}"),
    }
}
