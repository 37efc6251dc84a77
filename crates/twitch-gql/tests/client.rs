use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use twitch_gql::{
    templates, AttemptStrategy, ClientSession, FollowsOrder, GqlClient, GqlError, CLIENT_ID,
};

fn test_session() -> ClientSession {
    ClientSession::new("tok-1", "sess-1", "ver-1", "agent-1", "dev-1")
}

fn test_client(uri: &str) -> GqlClient {
    GqlClient::new(test_session())
        .with_url(uri)
        .with_strategy(AttemptStrategy::new(3, Duration::from_millis(5)))
}

/// Fails the first attempt with a 500, then succeeds with the given body.
struct SequenceResponder {
    counter: Arc<AtomicUsize>,
    success_body: Value,
}

impl Respond for SequenceResponder {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        let attempt = self.counter.fetch_add(1, Ordering::SeqCst);
        if attempt == 0 {
            ResponseTemplate::new(500).set_body_json(json!({ "error": "fail" }))
        } else {
            ResponseTemplate::new(200).set_body_json(self.success_body.clone())
        }
    }
}

struct CountingResponder {
    counter: Arc<AtomicUsize>,
    body: Value,
}

impl Respond for CountingResponder {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        self.counter.fetch_add(1, Ordering::SeqCst);
        ResponseTemplate::new(200).set_body_json(self.body.clone())
    }
}

#[tokio::test]
async fn single_call_sends_template_body_and_identity_headers() {
    let server = MockServer::start().await;

    let expected_body = templates::GET_ID_FROM_LOGIN.build(json!({ "login": "streamer-a" }));

    Mock::given(method("POST"))
        .and(path("/"))
        .and(body_json(&expected_body))
        .and(header("Authorization", "OAuth tok-1"))
        .and(header("Client-Id", CLIENT_ID))
        .and(header("Client-Session-Id", "sess-1"))
        .and(header("Client-Version", "ver-1"))
        .and(header("X-Device-Id", "dev-1"))
        .and(header("User-Agent", "agent-1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "data": { "user": { "id": "123" } } })),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let id = client
        .get_id_from_login("streamer-a")
        .await
        .expect("lookup should succeed");

    assert_eq!(id, Some("123".to_string()));
}

#[tokio::test]
async fn recoverable_500_is_retried_until_success() {
    let server = MockServer::start().await;
    let counter = Arc::new(AtomicUsize::new(0));

    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(SequenceResponder {
            counter: counter.clone(),
            success_body: json!({ "data": { "user": { "id": "user-2" } } }),
        })
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let id = client
        .get_id_from_login("streamer-a")
        .await
        .expect("lookup should succeed after retry");

    assert_eq!(id, Some("user-2".to_string()));
    assert_eq!(counter.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn non_recoverable_response_error_stops_after_one_attempt() {
    let server = MockServer::start().await;
    let counter = Arc::new(AtomicUsize::new(0));

    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(CountingResponder {
            counter: counter.clone(),
            body: json!({ "errors": [{ "message": "PERMISSION_DENIED" }] }),
        })
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .get_id_from_login("streamer-a")
        .await
        .expect_err("lookup should fail");

    assert_eq!(counter.load(Ordering::SeqCst), 1);
    match err {
        GqlError::Retry {
            operation_name,
            errors,
        } => {
            assert_eq!(operation_name, "ReportMenuItem");
            assert_eq!(errors.len(), 1);
            assert!(matches!(
                errors[0].error,
                GqlError::ResponseErrors { .. }
            ));
            // Domain errors are self-describing and need no diagnostic.
            assert!(errors[0].context.is_none());
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn recoverable_response_errors_retry_until_exhaustion() {
    let server = MockServer::start().await;
    let counter = Arc::new(AtomicUsize::new(0));

    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(CountingResponder {
            counter: counter.clone(),
            body: json!({ "errors": [{ "message": "service error" }] }),
        })
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .get_id_from_login("streamer-a")
        .await
        .expect_err("lookup should exhaust retries");

    assert_eq!(counter.load(Ordering::SeqCst), 3);
    match err {
        GqlError::Retry { errors, .. } => assert_eq!(errors.len(), 3),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn templates_are_isolated_between_calls() {
    let server = MockServer::start().await;

    for (login, id) in [("streamer-a", "id-a"), ("streamer-b", "id-b")] {
        let expected_body = templates::GET_ID_FROM_LOGIN.build(json!({ "login": login }));
        Mock::given(method("POST"))
            .and(path("/"))
            .and(body_json(&expected_body))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "data": { "user": { "id": id } } })),
            )
            .expect(1)
            .mount(&server)
            .await;
    }

    let client = test_client(&server.uri());
    let first = client.get_id_from_login("streamer-a").await.expect("first");
    let second = client
        .get_id_from_login("streamer-b")
        .await
        .expect("second");

    assert_eq!(first, Some("id-a".to_string()));
    assert_eq!(second, Some("id-b".to_string()));
    // Mock expectations verify each call carried only its own variables.
}

#[tokio::test]
async fn identical_read_only_calls_yield_equal_results() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "data": { "user": { "id": "42" } } })),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let first = client.get_id_from_login("streamer-a").await.expect("first");
    let second = client
        .get_id_from_login("streamer-a")
        .await
        .expect("second");

    assert_eq!(first, second);
}

#[tokio::test]
async fn array_response_to_a_single_call_is_a_terminal_shape_error() {
    let server = MockServer::start().await;
    let counter = Arc::new(AtomicUsize::new(0));

    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(CountingResponder {
            counter: counter.clone(),
            body: json!([]),
        })
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .get_id_from_login("streamer-a")
        .await
        .expect_err("should fail");

    assert_eq!(counter.load(Ordering::SeqCst), 1);
    match err {
        GqlError::Retry { errors, .. } => {
            assert_eq!(errors.len(), 1);
            assert!(matches!(errors[0].error, GqlError::InvalidShape { .. }));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn batched_response_decodes_positionally() {
    let server = MockServer::start().await;

    let campaign = |id: &str| {
        json!({
            "data": {
                "user": {
                    "dropCampaign": { "id": id, "name": format!("name-{id}"), "status": "ACTIVE" }
                }
            }
        })
    };

    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            campaign("c-1"),
            campaign("c-2"),
            campaign("c-3"),
        ])))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let ids: Vec<String> = ["c-1", "c-2", "c-3"]
        .iter()
        .map(ToString::to_string)
        .collect();
    let details = client
        .drop_campaign_details(&ids, "streamer-a")
        .await
        .expect("batch should succeed");

    let returned: Vec<&str> = details.iter().map(|detail| detail.id.as_str()).collect();
    assert_eq!(returned, vec!["c-1", "c-2", "c-3"]);
}

#[tokio::test]
async fn non_array_batched_response_is_an_immediate_shape_error() {
    let server = MockServer::start().await;
    let counter = Arc::new(AtomicUsize::new(0));

    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(CountingResponder {
            counter: counter.clone(),
            body: json!({ "data": {} }),
        })
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let bodies = vec![
        templates::DROP_CAMPAIGN_DETAILS
            .build(json!({ "dropID": "c-1", "channelLogin": "streamer-a" })),
    ];
    let err = client
        .execute_batch("DropCampaignDetails", bodies, |value| {
            Ok::<_, GqlError>(value)
        })
        .await
        .expect_err("should fail");

    assert_eq!(counter.load(Ordering::SeqCst), 1);
    match err {
        GqlError::Retry { errors, .. } => {
            assert_eq!(errors.len(), 1);
            assert!(matches!(errors[0].error, GqlError::InvalidShape { .. }));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

/// Answers each batched request with one null campaign per sub-request,
/// recording the batch sizes seen.
struct EchoBatchResponder {
    sizes: Arc<Mutex<Vec<usize>>>,
}

impl Respond for EchoBatchResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: Value = serde_json::from_slice(&request.body).expect("request body");
        let len = body.as_array().map_or(0, Vec::len);
        self.sizes.lock().unwrap().push(len);
        let elements: Vec<Value> = (0..len).map(|_| json!({ "data": { "user": null } })).collect();
        ResponseTemplate::new(200).set_body_json(Value::Array(elements))
    }
}

#[tokio::test]
async fn campaign_details_chunk_into_batches_of_twenty() {
    let server = MockServer::start().await;
    let sizes = Arc::new(Mutex::new(Vec::new()));

    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(EchoBatchResponder {
            sizes: sizes.clone(),
        })
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let ids: Vec<String> = (0..45).map(|i| format!("campaign-{i}")).collect();
    let details = client
        .drop_campaign_details(&ids, "streamer-a")
        .await
        .expect("batches should succeed");

    assert!(details.is_empty());
    assert_eq!(*sizes.lock().unwrap(), vec![20, 20, 5]);
}

#[tokio::test]
async fn failing_chunk_is_skipped_and_remaining_chunks_proceed() {
    let server = MockServer::start().await;
    let calls = Arc::new(AtomicUsize::new(0));

    struct FirstChunkBroken {
        calls: Arc<AtomicUsize>,
    }

    impl Respond for FirstChunkBroken {
        fn respond(&self, request: &Request) -> ResponseTemplate {
            let chunk = self.calls.fetch_add(1, Ordering::SeqCst);
            if chunk == 0 {
                // Not array-shaped: a terminal shape error for this chunk.
                return ResponseTemplate::new(200).set_body_json(json!({ "data": {} }));
            }
            let body: Value = serde_json::from_slice(&request.body).expect("request body");
            let elements: Vec<Value> = body
                .as_array()
                .expect("batched request")
                .iter()
                .enumerate()
                .map(|(index, _)| {
                    json!({
                        "data": {
                            "user": {
                                "dropCampaign": {
                                    "id": format!("kept-{index}"),
                                    "name": "kept",
                                    "status": "ACTIVE"
                                }
                            }
                        }
                    })
                })
                .collect();
            ResponseTemplate::new(200).set_body_json(Value::Array(elements))
        }
    }

    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(FirstChunkBroken {
            calls: calls.clone(),
        })
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let ids: Vec<String> = (0..25).map(|i| format!("campaign-{i}")).collect();
    let details = client
        .drop_campaign_details(&ids, "streamer-a")
        .await
        .expect("remaining chunks should still be returned");

    // First chunk of 20 dropped, second chunk of 5 kept.
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(details.len(), 5);
    assert!(details.iter().all(|detail| detail.name == "kept"));
}

/// Serves three pages of follows keyed on the cursor variable, recording the
/// cursor each request carried.
struct FollowsResponder {
    cursors: Arc<Mutex<Vec<String>>>,
}

impl Respond for FollowsResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: Value = serde_json::from_slice(&request.body).expect("request body");
        let cursor = body["variables"]["cursor"]
            .as_str()
            .expect("cursor variable")
            .to_string();
        self.cursors.lock().unwrap().push(cursor.clone());

        let page = |edges: Vec<Value>, has_next: bool| {
            ResponseTemplate::new(200).set_body_json(json!({
                "data": {
                    "user": {
                        "follows": {
                            "edges": edges,
                            "pageInfo": { "hasNextPage": has_next }
                        }
                    }
                }
            }))
        };
        let edge = |login: &str, cursor: &str| {
            json!({ "cursor": cursor, "node": { "login": login } })
        };

        match cursor.as_str() {
            "" => page(
                vec![edge("streamer-1", "cursor-1"), edge("streamer-2", "cursor-2")],
                true,
            ),
            "cursor-2" => page(vec![edge("streamer-3", "cursor-3")], true),
            "cursor-3" => page(vec![edge("streamer-4", "cursor-4")], false),
            other => panic!("unexpected cursor: {other}"),
        }
    }
}

#[tokio::test]
async fn pagination_walks_pages_and_threads_cursors() {
    let server = MockServer::start().await;
    let cursors = Arc::new(Mutex::new(Vec::new()));

    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(FollowsResponder {
            cursors: cursors.clone(),
        })
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let follows = client
        .channel_follows(100, FollowsOrder::Asc)
        .await
        .expect("pagination should succeed");

    assert_eq!(
        follows,
        vec!["streamer-1", "streamer-2", "streamer-3", "streamer-4"]
    );
    // Three requests; each resumes from the previous page's last edge cursor.
    assert_eq!(
        *cursors.lock().unwrap(),
        vec![String::new(), "cursor-2".to_string(), "cursor-3".to_string()]
    );
}

/// Fails the first attempt after recording the body, then succeeds.
struct RecordingRetryResponder {
    bodies: Arc<Mutex<Vec<Value>>>,
    success_body: Value,
}

impl Respond for RecordingRetryResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: Value = serde_json::from_slice(&request.body).expect("request body");
        let mut bodies = self.bodies.lock().unwrap();
        bodies.push(body);
        if bodies.len() == 1 {
            ResponseTemplate::new(500).set_body_json(json!({ "error": "fail" }))
        } else {
            ResponseTemplate::new(200).set_body_json(self.success_body.clone())
        }
    }
}

#[tokio::test]
async fn transaction_id_is_stable_across_retried_attempts() {
    let server = MockServer::start().await;
    let bodies = Arc::new(Mutex::new(Vec::new()));

    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(RecordingRetryResponder {
            bodies: bodies.clone(),
            success_body: json!({ "data": { "makePrediction": { "error": null } } }),
        })
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let ack = client
        .make_prediction("event-1", "outcome-1", 50)
        .await
        .expect("prediction should succeed after retry");
    assert!(ack.error.is_none());

    let bodies = bodies.lock().unwrap();
    assert_eq!(bodies.len(), 2);
    let token_of = |body: &Value| {
        body["variables"]["input"]["transactionID"]
            .as_str()
            .expect("transaction id")
            .to_string()
    };
    let first = token_of(&bodies[0]);
    let second = token_of(&bodies[1]);
    assert_eq!(first.len(), 32);
    assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
    // Generated once per logical call, never per attempt.
    assert_eq!(first, second);
}
