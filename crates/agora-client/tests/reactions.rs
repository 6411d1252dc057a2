#![allow(clippy::tests_outside_test_module, reason = "integration tests live in tests/ dir")]
#![allow(clippy::expect_used, reason = "panics are the assertion mechanism in tests")]

mod support;

use std::sync::Arc;

use agora_client::{
    AccessToken, AgoraClient, ApiError, ClientConfig, MemorySessionStore, Method, Post, PostId,
    ReactionOutcome, ReactionSnapshot, ReactionState, Screen, ScreenTracker, SessionStore,
};
use serde_json::json;
use support::{post_json, reaction_json, scripted, PendingCall};
use tokio::sync::mpsc::UnboundedReceiver;

struct Harness {
    client: Arc<AgoraClient>,
    calls: UnboundedReceiver<PendingCall>,
    store: Arc<MemorySessionStore>,
    screens: Arc<ScreenTracker>,
}

fn signed_in() -> Harness {
    let (transport, calls) = scripted();
    let store = Arc::new(MemorySessionStore::with_token(AccessToken::new("tok")));
    let screens = Arc::new(ScreenTracker::new(Screen::Profile));
    let client = AgoraClient::with_transport(
        ClientConfig::default(),
        transport,
        store.clone(),
        screens.clone(),
    )
    .expect("client");
    Harness { client: Arc::new(client), calls, store, screens }
}

fn seed(client: &AgoraClient, posts: &[serde_json::Value]) {
    let posts: Vec<Post> =
        serde_json::from_value(serde_json::Value::Array(posts.to_vec())).expect("posts decode");
    client.feed().replace_all(posts);
}

fn snapshot(client: &AgoraClient, id: i64) -> ReactionSnapshot {
    client.feed().get(PostId(id)).expect("post in feed").reactions
}

fn spawn_like(client: &Arc<AgoraClient>, id: i64) -> tokio::task::JoinHandle<ReactionOutcome> {
    let client = client.clone();
    tokio::spawn(async move { client.toggle_like(PostId(id)).await })
}

#[tokio::test]
async fn test_like_is_applied_before_the_response() {
    let mut h = signed_in();
    seed(&h.client, &[post_json(7, 3, 1, false, false)]);

    let task = spawn_like(&h.client, 7);
    let call = h.calls.recv().await.expect("like request");
    assert_eq!(call.request.method, Method::Post);
    assert_eq!(call.request.url, "http://127.0.0.1:8000/api/posts/7/like/");
    assert_eq!(call.request.authorization.as_deref(), Some("Bearer tok"));

    // Prediction is visible while the request is in flight.
    assert_eq!(snapshot(&h.client, 7), ReactionSnapshot::new(4, 1, ReactionState::Liked));
    assert!(h.client.reactions().pending(PostId(7)).is_some());

    // The server's numbers win, even when they differ from the prediction.
    call.ok(reaction_json(9, 1, true, false));
    let outcome = task.await.expect("join");
    assert_eq!(outcome, ReactionOutcome::Confirmed(ReactionSnapshot::new(9, 1, ReactionState::Liked)));
    assert_eq!(snapshot(&h.client, 7), ReactionSnapshot::new(9, 1, ReactionState::Liked));
    assert!(h.client.reactions().pending(PostId(7)).is_none());
}

#[tokio::test]
async fn test_stale_response_is_discarded() {
    let mut h = signed_in();
    seed(&h.client, &[post_json(7, 3, 1, false, false)]);
    let original = snapshot(&h.client, 7);

    let first = spawn_like(&h.client, 7);
    let first_call = h.calls.recv().await.expect("first like");
    let second = spawn_like(&h.client, 7);
    let second_call = h.calls.recv().await.expect("second like");

    // Two presses cancel out locally.
    assert_eq!(snapshot(&h.client, 7), original);

    // Responses arrive out of order.
    second_call.ok(reaction_json(3, 1, false, false));
    assert_eq!(second.await.expect("join"), ReactionOutcome::Confirmed(original));

    first_call.ok(reaction_json(4, 1, true, false));
    assert!(matches!(first.await.expect("join"), ReactionOutcome::Superseded { .. }));

    assert_eq!(snapshot(&h.client, 7), original);
}

#[tokio::test]
async fn test_double_toggle_in_order_restores_original() {
    let mut h = signed_in();
    seed(&h.client, &[post_json(7, 5, 4, false, true)]);
    let original = snapshot(&h.client, 7);

    let first = spawn_like(&h.client, 7);
    let call = h.calls.recv().await.expect("first like");
    call.ok(reaction_json(6, 3, true, false));
    assert!(matches!(first.await.expect("join"), ReactionOutcome::Confirmed(_)));

    let second = spawn_like(&h.client, 7);
    let call = h.calls.recv().await.expect("second like");
    assert_eq!(snapshot(&h.client, 7), ReactionSnapshot::new(5, 3, ReactionState::Neutral));
    call.ok(reaction_json(5, 4, false, true));
    assert!(matches!(second.await.expect("join"), ReactionOutcome::Confirmed(_)));

    assert_eq!(snapshot(&h.client, 7), original);
}

#[tokio::test]
async fn test_reactions_on_different_posts_are_independent() {
    let mut h = signed_in();
    seed(&h.client, &[post_json(1, 0, 0, false, false), post_json(2, 0, 0, false, false)]);

    let a = spawn_like(&h.client, 1);
    let call_a = h.calls.recv().await.expect("like 1");
    let b = spawn_like(&h.client, 2);
    let call_b = h.calls.recv().await.expect("like 2");

    call_b.ok(reaction_json(1, 0, true, false));
    call_a.ok(reaction_json(1, 0, true, false));
    assert!(matches!(a.await.expect("join"), ReactionOutcome::Confirmed(_)));
    assert!(matches!(b.await.expect("join"), ReactionOutcome::Confirmed(_)));
}

#[tokio::test]
async fn test_failed_like_matches_refetch() {
    let mut h = signed_in();
    seed(&h.client, &[post_json(7, 3, 1, false, false), post_json(8, 0, 0, false, false)]);

    let task = spawn_like(&h.client, 7);
    let call = h.calls.recv().await.expect("like request");
    call.status(500, json!({"detail": "boom"}));

    let reload = h.calls.recv().await.expect("feed reload");
    assert_eq!(reload.request.method, Method::Get);
    assert_eq!(reload.path(), "posts/");
    reload.ok(json!([post_json(7, 10, 2, false, true), post_json(8, 0, 0, false, false)]));

    match task.await.expect("join") {
        ReactionOutcome::Failed { error, resynced } => {
            assert!(resynced);
            assert_eq!(error.user_message(), "boom");
        }
        other => panic!("expected failure, got {other:?}"),
    }
    assert_eq!(snapshot(&h.client, 7), ReactionSnapshot::new(10, 2, ReactionState::Disliked));
    assert!(h.client.reactions().pending(PostId(7)).is_none());
}

#[tokio::test]
async fn test_network_failure_is_treated_like_server_error() {
    let mut h = signed_in();
    seed(&h.client, &[post_json(7, 3, 1, false, false)]);

    let task = spawn_like(&h.client, 7);
    let call = h.calls.recv().await.expect("like request");
    call.respond(Err(ApiError::transport("connection reset")));

    let reload = h.calls.recv().await.expect("feed reload");
    reload.ok(json!([post_json(7, 3, 1, false, false)]));

    assert!(matches!(task.await.expect("join"), ReactionOutcome::Failed { resynced: true, .. }));
    assert_eq!(snapshot(&h.client, 7), ReactionSnapshot::new(3, 1, ReactionState::Neutral));
}

#[tokio::test]
async fn test_response_after_delete_is_a_noop() {
    let mut h = signed_in();
    seed(&h.client, &[post_json(7, 3, 1, false, false), post_json(8, 0, 0, false, false)]);

    let task = spawn_like(&h.client, 7);
    let call = h.calls.recv().await.expect("like request");

    let _undo = h.client.feed().remove_optimistic(PostId(7)).expect("post present");
    call.ok(reaction_json(4, 1, true, false));

    assert_eq!(task.await.expect("join"), ReactionOutcome::Absent);
    assert!(h.client.feed().get(PostId(7)).is_none());
    assert_eq!(h.client.feed().len(), 1);
    assert!(h.client.reactions().pending(PostId(7)).is_none());
}

#[tokio::test]
async fn test_unknown_and_provisional_posts_send_nothing() {
    let mut h = signed_in();
    seed(&h.client, &[post_json(7, 3, 1, false, false)]);

    assert_eq!(h.client.toggle_like(PostId(99)).await, ReactionOutcome::Absent);
    assert_eq!(h.client.toggle_dislike(PostId(-1)).await, ReactionOutcome::Absent);
    assert!(h.calls.try_recv().is_err());
}

#[tokio::test]
async fn test_unauthorized_reaction_tears_down_without_reload() {
    let mut h = signed_in();
    seed(&h.client, &[post_json(7, 3, 1, false, false)]);

    let task = spawn_like(&h.client, 7);
    let call = h.calls.recv().await.expect("like request");
    call.status(401, json!({"detail": "Given token not valid for any token type"}));

    assert!(matches!(task.await.expect("join"), ReactionOutcome::Failed { resynced: false, .. }));
    assert!(h.calls.try_recv().is_err());
    assert!(!h.client.is_authenticated());
    assert_eq!(h.store.get().expect("store"), None);
    assert_eq!(h.screens.current(), Screen::Login);
    assert!(h.client.feed().is_empty());
}

#[tokio::test]
async fn test_resync_keeps_reaction_confirmed_while_it_was_in_flight() {
    let mut h = signed_in();
    seed(&h.client, &[post_json(1, 0, 0, false, false), post_json(2, 3, 0, false, false)]);

    let failing = spawn_like(&h.client, 1);
    h.calls.recv().await.expect("like 1").status(500, json!({"detail": "boom"}));
    let reload = h.calls.recv().await.expect("feed reload");
    assert_eq!(reload.path(), "posts/");

    // Post 2 is liked and confirmed while the reload is still out.
    let confirmed = spawn_like(&h.client, 2);
    h.calls.recv().await.expect("like 2").ok(reaction_json(4, 0, true, false));
    assert_eq!(
        confirmed.await.expect("join"),
        ReactionOutcome::Confirmed(ReactionSnapshot::new(4, 0, ReactionState::Liked))
    );

    // The reload was read before the like landed.
    reload.ok(json!([post_json(1, 6, 0, false, false), post_json(2, 3, 0, false, false)]));
    assert!(matches!(failing.await.expect("join"), ReactionOutcome::Failed { resynced: true, .. }));

    assert_eq!(snapshot(&h.client, 1), ReactionSnapshot::new(6, 0, ReactionState::Neutral));
    assert_eq!(snapshot(&h.client, 2), ReactionSnapshot::new(4, 0, ReactionState::Liked));
}

#[tokio::test]
async fn test_resync_keeps_prediction_still_in_flight() {
    let mut h = signed_in();
    seed(&h.client, &[post_json(1, 0, 0, false, false), post_json(2, 3, 0, false, false)]);

    let failing = spawn_like(&h.client, 1);
    h.calls.recv().await.expect("like 1").status(500, json!({"detail": "boom"}));
    let reload = h.calls.recv().await.expect("feed reload");

    let in_flight = spawn_like(&h.client, 2);
    let like_2 = h.calls.recv().await.expect("like 2");

    reload.ok(json!([post_json(1, 0, 0, false, false), post_json(2, 3, 0, false, false)]));
    assert!(matches!(failing.await.expect("join"), ReactionOutcome::Failed { resynced: true, .. }));
    assert_eq!(snapshot(&h.client, 2), ReactionSnapshot::new(4, 0, ReactionState::Liked));

    like_2.ok(reaction_json(5, 0, true, false));
    assert!(matches!(in_flight.await.expect("join"), ReactionOutcome::Confirmed(_)));
    assert_eq!(snapshot(&h.client, 2), ReactionSnapshot::new(5, 0, ReactionState::Liked));
}

#[tokio::test]
async fn test_unauthorized_resync_clears_cached_feed() {
    let mut h = signed_in();
    seed(&h.client, &[post_json(7, 3, 1, false, false)]);

    let task = spawn_like(&h.client, 7);
    h.calls.recv().await.expect("like request").status(500, json!({"detail": "boom"}));
    let reload = h.calls.recv().await.expect("feed reload");
    reload.status(401, json!({"detail": "Given token not valid for any token type"}));

    match task.await.expect("join") {
        ReactionOutcome::Failed { error, resynced } => {
            assert!(!resynced);
            assert_eq!(error.status(), Some(500));
        }
        other => panic!("expected failure, got {other:?}"),
    }
    assert!(!h.client.is_authenticated());
    assert_eq!(h.screens.current(), Screen::Login);
    assert!(h.client.feed().is_empty());
    assert!(h.client.profile().is_none());
}
