//! Wire transport.

use std::time::Duration;

use agora_types::ApiError;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;

use super::request::{FormPart, Method, OutboundRequest, RawResponse, RequestBody};
use crate::config::{ClientConfig, ConfigError};

/// Sends a resolved request and returns whatever status came back.
///
/// Implementations only fail when no response was received; HTTP error statuses are returned
/// as a [`RawResponse`] for the gateway to classify.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: OutboundRequest) -> Result<RawResponse, ApiError>;
}

/// [`Transport`] over `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;
        Ok(Self { client })
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

fn to_reqwest(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

fn multipart_form(parts: Vec<FormPart>) -> Result<Form, ApiError> {
    let mut form = Form::new();
    for part in parts {
        form = match part {
            FormPart::Text { name, value } => form.text(name, value),
            FormPart::File { name, upload } => {
                let mut file = Part::bytes(upload.bytes).file_name(upload.file_name);
                if let Some(content_type) = upload.content_type.as_deref() {
                    file = file
                        .mime_str(content_type)
                        .map_err(|e| ApiError::transport(format!("Invalid content type: {e}")))?;
                }
                form.part(name, file)
            }
        };
    }
    Ok(form)
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: OutboundRequest) -> Result<RawResponse, ApiError> {
        let mut builder = self.client.request(to_reqwest(request.method), &request.url);
        if let Some(authorization) = request.authorization {
            builder = builder.header(reqwest::header::AUTHORIZATION, authorization);
        }
        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart(parts) => builder.multipart(multipart_form(parts)?),
        };

        let resp = builder.send().await.map_err(|e| ApiError::transport(e.to_string()))?;
        let status = resp.status().as_u16();
        let bytes = resp.bytes().await.map_err(|e| ApiError::transport(e.to_string()))?;
        Ok(RawResponse::from_bytes(status, &bytes))
    }
}
