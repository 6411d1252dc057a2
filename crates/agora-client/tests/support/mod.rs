//! Shared fixtures for the integration tests.

#![allow(dead_code, reason = "each test binary uses a different subset")]

use std::sync::Arc;

use agora_client::{ApiError, OutboundRequest, RawResponse, Transport};
use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::{mpsc, oneshot};

/// A request held by [`ScriptedTransport`] until the test answers it.
pub struct PendingCall {
    pub request: OutboundRequest,
    reply: oneshot::Sender<Result<RawResponse, ApiError>>,
}

impl PendingCall {
    pub fn respond(self, result: Result<RawResponse, ApiError>) {
        let _ = self.reply.send(result);
    }

    pub fn ok(self, body: Value) {
        self.respond(Ok(RawResponse::json(200, body)));
    }

    pub fn status(self, status: u16, body: Value) {
        self.respond(Ok(RawResponse::json(status, body)));
    }

    /// `posts/7/like/` for a request to `http://host/api/posts/7/like/`
    pub fn path(&self) -> &str {
        self.request.url.split("/api/").nth(1).unwrap_or_default()
    }
}

/// Transport whose responses are supplied by the test, in whatever order it likes.
pub struct ScriptedTransport {
    calls: mpsc::UnboundedSender<PendingCall>,
}

pub fn scripted() -> (Arc<ScriptedTransport>, mpsc::UnboundedReceiver<PendingCall>) {
    let (calls, rx) = mpsc::unbounded_channel();
    (Arc::new(ScriptedTransport { calls }), rx)
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn execute(&self, request: OutboundRequest) -> Result<RawResponse, ApiError> {
        let (reply, rx) = oneshot::channel();
        self.calls
            .send(PendingCall { request, reply })
            .map_err(|_| ApiError::transport("script finished"))?;
        rx.await.map_err(|_| ApiError::transport("call dropped without a reply"))?
    }
}

pub fn profile_json() -> Value {
    json!({
        "id": 1,
        "full_name": "Ada Lovelace",
        "email": "ada@example.com",
        "dob": "1815-12-10",
        "profile_pic": "/media/profile_pics/ada.png"
    })
}

pub fn post_json(id: i64, likes: u32, dislikes: u32, user_liked: bool, user_disliked: bool) -> Value {
    json!({
        "id": id,
        "description": format!("post {id}"),
        "image": null,
        "user": 1,
        "user_name": "Ada Lovelace",
        "user_pic": "",
        "created_at": "2024-05-01T12:00:00Z",
        "likes": likes,
        "dislikes": dislikes,
        "user_liked": user_liked,
        "user_disliked": user_disliked,
        "liked_by": []
    })
}

pub fn reaction_json(likes: u32, dislikes: u32, user_liked: bool, user_disliked: bool) -> Value {
    json!({
        "likes": likes,
        "dislikes": dislikes,
        "user_liked": user_liked,
        "user_disliked": user_disliked
    })
}
