//! Request and response values passed between the gateway and a [`super::Transport`].

use agora_types::{ApiError, MediaUpload};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl Method {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One part of a multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPart {
    Text { name: String, value: String },
    File { name: String, upload: MediaUpload },
}

impl FormPart {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Text { name: name.into(), value: value.into() }
    }

    pub fn file(name: impl Into<String>, upload: MediaUpload) -> Self {
        Self::File { name: name.into(), upload }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Text { name, .. } | Self::File { name, .. } => name,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(Value),
    Multipart(Vec<FormPart>),
}

/// A call against the API, relative to the API root.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path under `<base_url>/api/`, e.g. `posts/7/like/`
    pub path: String,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self { method, path: path.into(), body: RequestBody::Empty }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::Patch, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Attach a JSON body. Fails without sending anything when `body` cannot be encoded.
    pub fn with_json<T: Serialize>(mut self, body: &T) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body)
            .map_err(|e| ApiError::transport(format!("Failed to encode request body: {e}")))?;
        self.body = RequestBody::Json(value);
        Ok(self)
    }

    pub fn with_form(mut self, parts: Vec<FormPart>) -> Self {
        self.body = RequestBody::Multipart(parts);
        self
    }
}

/// A fully resolved request, ready for the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundRequest {
    pub method: Method,
    pub url: String,
    /// `Authorization` header value, when a session exists
    pub authorization: Option<String>,
    pub body: RequestBody,
}

/// What came back: the status and the parsed body.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    /// JSON body, or a string value when the body was not JSON. `None` when empty.
    pub body: Option<Value>,
}

impl RawResponse {
    pub fn new(status: u16, body: Option<Value>) -> Self {
        Self { status, body }
    }

    pub fn json(status: u16, body: Value) -> Self {
        Self::new(status, Some(body))
    }

    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Interpret raw bytes the way the server's error bodies need it.
    pub fn from_bytes(status: u16, bytes: &[u8]) -> Self {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Self::new(status, None);
        }
        let body = serde_json::from_slice(bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()));
        Self::new(status, Some(body))
    }
}
