//! `login/` and `signup/`

use agora_types::{ApiError, LoginForm, LoginResponse, ServerMessage, SignupForm};

use super::{acknowledgement, date_part};
use crate::gateway::{ApiRequest, FormPart, RequestGateway};

pub async fn login(gateway: &RequestGateway, form: &LoginForm) -> Result<LoginResponse, ApiError> {
    gateway.send_json(ApiRequest::post("login/").with_json(form)?).await
}

/// Register an account. Some deployments sign the user in directly and include `access`.
pub async fn signup(gateway: &RequestGateway, form: &SignupForm) -> Result<ServerMessage, ApiError> {
    let body = gateway.send(ApiRequest::post("signup/").with_form(signup_parts(form))).await?;
    Ok(acknowledgement(body))
}

fn signup_parts(form: &SignupForm) -> Vec<FormPart> {
    let mut parts = vec![FormPart::text("full_name", form.full_name.trim())];
    parts.extend(date_part("dob", form.dob));
    parts.push(FormPart::text("email", form.email.trim()));
    parts.push(FormPart::text("password", form.password.clone()));
    parts.push(FormPart::text("confirm_password", form.confirm_password.clone()));
    if let Some(upload) = &form.profile_pic {
        parts.push(FormPart::file("profile_pic", upload.clone()));
    }
    parts
}
