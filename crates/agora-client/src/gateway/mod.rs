//! Authenticated request gateway.

mod request;
mod transport;

use std::sync::Arc;

use agora_types::ApiError;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

pub use request::{ApiRequest, FormPart, Method, OutboundRequest, RawResponse, RequestBody};
pub use transport::{HttpTransport, Transport};

use crate::session::AuthSession;

/// Every REST call goes through here.
///
/// Attaches the session's bearer token, classifies non-2xx statuses into [`ApiError`] and tears
/// the session down on 401 before the error reaches the caller.
pub struct RequestGateway {
    api_root: Url,
    transport: Arc<dyn Transport>,
    session: Arc<AuthSession>,
}

impl std::fmt::Debug for RequestGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestGateway")
            .field("api_root", &self.api_root.as_str())
            .finish_non_exhaustive()
    }
}

impl RequestGateway {
    pub fn new(api_root: Url, transport: Arc<dyn Transport>, session: Arc<AuthSession>) -> Self {
        Self { api_root, transport, session }
    }

    pub fn api_root(&self) -> &Url {
        &self.api_root
    }

    pub fn session(&self) -> &Arc<AuthSession> {
        &self.session
    }

    /// Send a request and return the success body (`None` when the body was empty).
    pub async fn send(&self, request: ApiRequest) -> Result<Option<Value>, ApiError> {
        let url = self
            .api_root
            .join(request.path.trim_start_matches('/'))
            .map_err(|e| ApiError::transport(format!("Invalid request path {}: {e}", request.path)))?;
        let authorization = self.session.token().map(|token| token.bearer());
        let method = request.method;

        debug!(%method, %url, authenticated = authorization.is_some(), "Sending request");
        let outbound = OutboundRequest {
            method,
            url: url.to_string(),
            authorization,
            body: request.body,
        };

        let response = match self.transport.execute(outbound).await {
            Ok(response) => response,
            Err(e) => {
                warn!(%method, %url, "Request failed: {}", e);
                return Err(e);
            }
        };

        if response.is_success() {
            debug!(%method, %url, status = response.status, "Request succeeded");
            return Ok(response.body);
        }

        let error = ApiError::from_status(response.status, response.body);
        warn!(%method, %url, status = response.status, "Request rejected: {}", error);
        if error.is_unauthorized() {
            self.session.on_unauthorized();
        }
        Err(error)
    }

    /// [`RequestGateway::send`], then decode the body into `R`.
    ///
    /// An empty body decodes as JSON `null`.
    pub async fn send_json<R: DeserializeOwned>(&self, request: ApiRequest) -> Result<R, ApiError> {
        let body = self.send(request).await?.unwrap_or(Value::Null);
        serde_json::from_value(body).map_err(|e| {
            warn!("Unexpected response shape: {}", e);
            ApiError::decode(e.to_string())
        })
    }
}
