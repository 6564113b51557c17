//! Stateless request builder and response mapper for the Root insurance API.
//!
//! # Design
//! `RootClient` holds credentials, a base URL, a MIME sniffer and a transport,
//! none of which change after construction. Every operation is split into a
//! `build_*` method that produces an `HttpRequest` and an executing method
//! that sends it through the transport and maps the response with
//! `parse_response`. The per-resource operations live in `crate::api`.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::attachment::{InferSniffer, MimeSniffer};
use crate::config::Credentials;
use crate::error::RootError;
use crate::fields::Fields;
use crate::http::{basic_auth, HttpMethod, HttpRequest, HttpResponse};
use crate::transport::{Transport, UreqTransport};

/// Synchronous client for the Root insurance API.
#[derive(Clone)]
pub struct RootClient<T = UreqTransport> {
    credentials: Credentials,
    base_url: String,
    sniffer: Arc<dyn MimeSniffer>,
    transport: T,
}

impl RootClient<UreqTransport> {
    pub fn new(credentials: Credentials) -> Self {
        Self::with_transport(credentials, UreqTransport::new())
    }
}

impl<T> RootClient<T> {
    pub fn with_transport(credentials: Credentials, transport: T) -> Self {
        let base_url = credentials.environment.base_url().to_string();
        Self {
            credentials,
            base_url,
            sniffer: Arc::new(InferSniffer),
            transport,
        }
    }

    /// Point the client at a different API root, e.g. a local mock server.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_sniffer(mut self, sniffer: impl MimeSniffer + 'static) -> Self {
        self.sniffer = Arc::new(sniffer);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub(crate) fn sniffer(&self) -> &dyn MimeSniffer {
        self.sniffer.as_ref()
    }

    fn auth_header(&self) -> (String, String) {
        (
            "authorization".to_string(),
            basic_auth(&self.credentials.app_id, &self.credentials.app_secret),
        )
    }

    /// GET with query pairs and no body.
    pub(crate) fn get_request(&self, path: impl Into<String>, query: Fields) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: path.into(),
            query: query.into_query(),
            headers: vec![self.auth_header()],
            body: None,
        }
    }

    /// POST/PUT/PATCH with a JSON body.
    pub(crate) fn write_request(
        &self,
        method: HttpMethod,
        path: impl Into<String>,
        body: Fields,
    ) -> Result<HttpRequest, RootError> {
        Ok(HttpRequest {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: vec![
                self.auth_header(),
                ("content-type".to_string(), "application/json".to_string()),
                ("accept".to_string(), "application/json".to_string()),
            ],
            body: Some(body.to_json()?),
        })
    }
}

impl<T: Transport> RootClient<T> {
    /// Send `request` and map the response. Exactly one exchange, no retries.
    pub fn execute(&self, request: HttpRequest) -> Result<Value, RootError> {
        debug!(
            method = request.method.as_str(),
            path = %request.path,
            query_pairs = request.query.len(),
            has_body = request.body.is_some(),
            "sending request"
        );
        let response = self.transport.execute(&self.base_url, &request)?;
        debug!(status = response.status, path = %request.path, "received response");

        parse_response(response).inspect_err(|err| {
            warn!(method = request.method.as_str(), path = %request.path, error = %err, "request failed");
        })
    }
}

impl<T: fmt::Debug> fmt::Debug for RootClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RootClient")
            .field("credentials", &self.credentials)
            .field("base_url", &self.base_url)
            .field("transport", &self.transport)
            .finish_non_exhaustive()
    }
}

/// Map a raw response to its JSON body or a categorized error.
///
/// The body is parsed first; a non-JSON body is a `Deserialization` error
/// regardless of status.
pub fn parse_response(response: HttpResponse) -> Result<Value, RootError> {
    let parsed: Value = serde_json::from_str(&response.body)
        .map_err(|e| RootError::Deserialization(e.to_string()))?;

    match response.status {
        200 => Ok(parsed),
        400 => Err(RootError::Input(error_message(&parsed, &response.body))),
        401 | 403 => Err(RootError::Authentication(error_message(&parsed, &response.body))),
        status => Err(RootError::Api {
            status,
            message: error_message(&parsed, &response.body),
        }),
    }
}

/// `error` if present, else `message`, else the raw body.
fn error_message(parsed: &Value, raw: &str) -> String {
    ["error", "message"]
        .iter()
        .find_map(|key| match parsed.get(key) {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Null) | None => None,
            Some(other) => Some(other.to_string()),
        })
        .unwrap_or_else(|| raw.to_string())
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde_json::json;

    use super::*;
    use crate::api::policyholder::CreatePolicyholder;
    use crate::api::Identification;
    use crate::config::Environment;

    /// Records every request and answers with a canned response.
    struct Recording {
        seen: Mutex<Vec<(String, HttpRequest)>>,
        reply: HttpResponse,
    }

    impl Recording {
        fn replying(status: u16, body: &str) -> Self {
            Self {
                seen: Mutex::new(Vec::new()),
                reply: HttpResponse::new(status, body),
            }
        }
    }

    impl Transport for Recording {
        fn execute(&self, base_url: &str, request: &HttpRequest) -> Result<HttpResponse, RootError> {
            self.seen
                .lock()
                .unwrap()
                .push((base_url.to_string(), request.clone()));
            Ok(self.reply.clone())
        }
    }

    fn client() -> RootClient {
        RootClient::new(Credentials::new("app_id", "app_secret", Environment::Sandbox))
    }

    #[test]
    fn environment_picks_base_url() {
        let prod = RootClient::new(Credentials::new("a", "", Environment::Production));
        assert_eq!(prod.base_url(), "https://api.root.co.za/v1/insurance");
        assert_eq!(client().base_url(), "https://sandbox.root.co.za/v1/insurance");
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let c = client().with_base_url("http://localhost:3000/");
        assert_eq!(c.base_url(), "http://localhost:3000");
    }

    #[test]
    fn get_request_has_auth_and_no_body() {
        let req = client().get_request("claims", Fields::new().field("claim_status", "open"));
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.header("authorization"), Some("Basic YXBwX2lkOmFwcF9zZWNyZXQ="));
        assert!(req.header("content-type").is_none());
        assert_eq!(req.query_value("claim_status"), Some("open"));
        assert!(req.body.is_none());
    }

    #[test]
    fn write_request_has_json_headers() {
        let req = client()
            .write_request(HttpMethod::Patch, "claims/1", Fields::new().field("a", 1))
            .unwrap();
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert_eq!(req.header("accept"), Some("application/json"));
        assert_eq!(req.body.as_deref(), Some(r#"{"a":1}"#));
    }

    #[test]
    fn create_policyholder_end_to_end() {
        let transport = Recording::replying(200, r#"{"policyholder_id":"ph-1"}"#);
        let c = RootClient::with_transport(
            Credentials::new("app_id", "app_secret", Environment::Sandbox),
            &transport,
        );
        let created = c
            .create_policyholder(&CreatePolicyholder {
                id: Identification::id("6801015800084", "ZA").into(),
                first_name: "Erlich".to_string(),
                last_name: "Bachman".to_string(),
                email: Some("erlich@root.co.za".to_string()),
                ..CreatePolicyholder::default()
            })
            .unwrap();
        assert_eq!(created, json!({"policyholder_id": "ph-1"}));

        let seen = transport.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        let (base_url, req) = &seen[0];
        assert_eq!(base_url, "https://sandbox.root.co.za/v1/insurance");
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "policyholders");
        let body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(
            body,
            json!({
                "id": {"type": "id", "number": "6801015800084", "country": "ZA"},
                "first_name": "Erlich",
                "last_name": "Bachman",
                "email": "erlich@root.co.za"
            })
        );
    }

    #[test]
    fn execute_maps_error_status() {
        let transport = Recording::replying(400, r#"{"error":"bad input"}"#);
        let c = RootClient::with_transport(
            Credentials::new("app_id", "", Environment::Production),
            &transport,
        );
        let err = c.list_calls().unwrap_err();
        assert!(matches!(err, RootError::Input(ref m) if m == "bad input"));
        assert_eq!(transport.seen.lock().unwrap()[0].0, "https://api.root.co.za/v1/insurance");
    }

    #[test]
    fn argument_errors_skip_the_transport() {
        let transport = Recording::replying(200, "{}");
        let c = RootClient::with_transport(
            Credentials::new("app_id", "", Environment::Sandbox),
            &transport,
        );
        let err = c
            .create_policyholder(&CreatePolicyholder {
                id: json!("6801015800084"),
                ..CreatePolicyholder::default()
            })
            .unwrap_err();
        assert!(matches!(err, RootError::InvalidArgument(_)));
        assert!(transport.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn parse_200_returns_body() {
        let body = parse_response(HttpResponse::new(200, r#"{"id":"x"}"#)).unwrap();
        assert_eq!(body, json!({"id": "x"}));
    }

    #[test]
    fn parse_400_is_input_error() {
        let err = parse_response(HttpResponse::new(400, r#"{"error":"bad input"}"#)).unwrap_err();
        assert!(matches!(err, RootError::Input(ref m) if m == "bad input"));
    }

    #[test]
    fn parse_401_and_403_are_authentication_errors() {
        let err = parse_response(HttpResponse::new(401, r#"{"message":"no auth"}"#)).unwrap_err();
        assert!(matches!(err, RootError::Authentication(ref m) if m == "no auth"));

        let err = parse_response(HttpResponse::new(403, r#"{"error":"forbidden"}"#)).unwrap_err();
        assert!(matches!(err, RootError::Authentication(ref m) if m == "forbidden"));
    }

    #[test]
    fn error_field_wins_over_message() {
        let err = parse_response(HttpResponse::new(
            400,
            r#"{"error":"first","message":"second"}"#,
        ))
        .unwrap_err();
        assert_eq!(err.remote_message(), Some("first"));
    }

    #[test]
    fn other_statuses_are_generic() {
        let err = parse_response(HttpResponse::new(500, r#"{"message":"oops"}"#)).unwrap_err();
        assert!(matches!(err, RootError::Api { status: 500, ref message } if message == "oops"));

        // Redirects and other 2xx get no special treatment.
        let err = parse_response(HttpResponse::new(201, r#"{"id":"x"}"#)).unwrap_err();
        assert!(matches!(err, RootError::Api { status: 201, .. }));
    }

    #[test]
    fn non_json_body_is_fatal() {
        let err = parse_response(HttpResponse::new(200, "not json")).unwrap_err();
        assert!(matches!(err, RootError::Deserialization(_)));

        let err = parse_response(HttpResponse::new(502, "<html>bad gateway</html>")).unwrap_err();
        assert!(matches!(err, RootError::Deserialization(_)));
    }

    #[test]
    fn missing_message_falls_back_to_raw_body() {
        let err = parse_response(HttpResponse::new(404, r#"{"code":1}"#)).unwrap_err();
        assert_eq!(err.remote_message(), Some(r#"{"code":1}"#));
    }
}
