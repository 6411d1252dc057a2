//! Endpoint bindings.
//!
//! Thin functions over [`crate::RequestGateway`]: they build the request body, pick the path and decode
//! the success shape. Forms are expected to have passed [`agora_types::FormRules::check`].

pub mod auth;
pub mod posts;
pub mod profile;

use agora_types::ServerMessage;
use chrono::NaiveDate;
use serde_json::Value;

use crate::gateway::FormPart;

/// Wire format for dates in multipart bodies.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Acknowledgement bodies are informational; anything that is not the usual `{message}` object
/// is reduced to what can be salvaged from it.
fn acknowledgement(body: Option<Value>) -> ServerMessage {
    match body {
        Some(Value::String(message)) => ServerMessage { message: Some(message), access: None },
        Some(value) => serde_json::from_value(value).unwrap_or_default(),
        None => ServerMessage::default(),
    }
}

fn date_part(name: &str, date: Option<NaiveDate>) -> Option<FormPart> {
    date.map(|date| FormPart::text(name, date.format(DATE_FORMAT).to_string()))
}
