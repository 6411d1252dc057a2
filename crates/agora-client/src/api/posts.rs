//! `posts/`

use agora_types::{ApiError, NewPost, Post, PostId, ReactionKind, ReactionSnapshot, ServerMessage};

use super::acknowledgement;
use crate::gateway::{ApiRequest, FormPart, RequestGateway};

/// The feed, in server order.
pub async fn list(gateway: &RequestGateway) -> Result<Vec<Post>, ApiError> {
    gateway.send_json(ApiRequest::get("posts/")).await
}

pub async fn create(gateway: &RequestGateway, form: &NewPost) -> Result<Post, ApiError> {
    gateway.send_json(ApiRequest::post("posts/").with_form(new_post_parts(form))).await
}

pub async fn delete(gateway: &RequestGateway, id: PostId) -> Result<ServerMessage, ApiError> {
    let body = gateway.send(ApiRequest::delete(format!("posts/{id}/"))).await?;
    Ok(acknowledgement(body))
}

/// Toggle a reaction server-side. The response carries the authoritative counters.
pub async fn react(
    gateway: &RequestGateway,
    id: PostId,
    kind: ReactionKind,
) -> Result<ReactionSnapshot, ApiError> {
    gateway.send_json(ApiRequest::post(reaction_path(id, kind))).await
}

fn reaction_path(id: PostId, kind: ReactionKind) -> String {
    format!("posts/{id}/{}/", kind.endpoint())
}

fn new_post_parts(form: &NewPost) -> Vec<FormPart> {
    let mut parts = Vec::with_capacity(2);
    let description = form.description.trim();
    if !description.is_empty() {
        parts.push(FormPart::text("description", description));
    }
    if let Some(upload) = &form.image {
        parts.push(FormPart::file("image", upload.clone()));
    }
    parts
}
