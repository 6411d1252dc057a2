//! `profile/`

use agora_types::{ApiError, Profile, ProfileUpdate, ServerMessage};

use super::{acknowledgement, date_part};
use crate::gateway::{ApiRequest, FormPart, RequestGateway};

pub async fn fetch(gateway: &RequestGateway) -> Result<Profile, ApiError> {
    gateway.send_json(ApiRequest::get("profile/")).await
}

pub async fn update(gateway: &RequestGateway, form: &ProfileUpdate) -> Result<ServerMessage, ApiError> {
    let mut parts = vec![FormPart::text("full_name", form.full_name.trim())];
    parts.extend(date_part("dob", form.dob));
    if let Some(upload) = &form.profile_pic {
        parts.push(FormPart::file("profile_pic", upload.clone()));
    }
    let body = gateway.send(ApiRequest::patch("profile/").with_form(parts)).await?;
    Ok(acknowledgement(body))
}
