// GraphQL HTTP client
//
// Wraps `reqwest::Client` with bearer-token auth and the GraphQL
// response envelope: `{ data: ... }` on success, `{ errors: [...] }` on
// failure. Callers only ever see the unwrapped `data` object.

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;
use crate::types::ProbeData;

/// The public Eetlijst GraphQL endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.samenn.nl/v1/graphql";

/// Error codes the server uses for a rejected token.
const TOKEN_ERROR_CODES: [&str; 2] = ["invalid-jwt", "invalid-headers"];

const PROBE_QUERY: &str = r"
query MyQuery {
  eetschema_group {
    name
    active
  }
}
";

#[derive(Serialize)]
struct Request<'a> {
    query: &'a str,
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    data: Option<serde_json::Value>,
    #[serde(default)]
    errors: Option<Vec<GraphqlError>>,
}

#[derive(Deserialize)]
struct GraphqlError {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    extensions: Option<Extensions>,
}

#[derive(Deserialize)]
struct Extensions {
    #[serde(default)]
    code: Option<String>,
}

/// Async client for the Eetlijst GraphQL endpoint.
///
/// Every request is a POST of `{"query": ...}` carrying the bearer token
/// as a default header. Cheap to share behind an `Arc`; holds no
/// per-request state.
#[derive(Debug, Clone)]
pub struct GraphqlClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl GraphqlClient {
    /// Build from a bearer token and transport config.
    ///
    /// Injects `Authorization: Bearer <token>` (marked sensitive) and
    /// `content-type: application/json` on every request.
    pub fn new(
        endpoint: &str,
        token: &SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
            .map_err(|e| Error::InvalidToken {
                message: format!("token is not a valid header value: {e}"),
            })?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = transport.build_client_with_headers(headers)?;
        let endpoint = Url::parse(endpoint)?;
        Ok(Self { http, endpoint })
    }

    /// Wrap an existing `reqwest::Client` (caller manages auth headers).
    pub fn with_client(http: reqwest::Client, endpoint: Url) -> Self {
        Self { http, endpoint }
    }

    /// The GraphQL endpoint this client posts to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Run one query document and return its `data` object.
    pub async fn query(&self, document: &str) -> Result<serde_json::Value, Error> {
        debug!("POST {}", self.endpoint);

        let resp = self
            .http
            .post(self.endpoint.clone())
            .json(&Request { query: document })
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        trace!(status = status.as_u16(), bytes = body.len(), "graphql response");

        if status != reqwest::StatusCode::OK {
            return Err(Error::Http {
                status: status.as_u16(),
                preview: preview(&body).to_owned(),
            });
        }

        parse_envelope(&body)
    }

    /// Validate the token by fetching the household name.
    ///
    /// Cheaper than a refresh cycle; used to check credentials before
    /// they are saved.
    pub async fn probe(&self) -> Result<String, Error> {
        let data = self.query(PROBE_QUERY).await?;
        let info: ProbeData =
            serde_json::from_value(data.clone()).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body: data.to_string(),
            })?;
        info.eetschema_group
            .into_iter()
            .next()
            .map(|g| g.name)
            .ok_or_else(|| Error::Deserialization {
                message: "token is not a member of any group".into(),
                body: data.to_string(),
            })
    }
}

/// Strip the GraphQL envelope, turning `errors` into an [`Error`].
fn parse_envelope(body: &str) -> Result<serde_json::Value, Error> {
    let envelope: Envelope = serde_json::from_str(body).map_err(|e| Error::Deserialization {
        message: format!("{e} (body preview: {:?})", preview(body)),
        body: body.to_owned(),
    })?;

    if let Some(first) = envelope.errors.and_then(|errs| errs.into_iter().next()) {
        let message = first.message.unwrap_or_else(|| "unknown error".into());
        let code = first.extensions.and_then(|ext| ext.code);
        if code
            .as_deref()
            .is_some_and(|c| TOKEN_ERROR_CODES.contains(&c))
        {
            return Err(Error::InvalidToken { message });
        }
        return Err(Error::Graphql { message, code });
    }

    envelope.data.ok_or(Error::MissingData)
}

fn preview(body: &str) -> &str {
    let mut end = body.len().min(200);
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn envelope_returns_data() {
        let data = parse_envelope(r#"{"data":{"eetschema_list":[]}}"#).unwrap();
        assert!(data["eetschema_list"].as_array().unwrap().is_empty());
    }

    #[test]
    fn envelope_maps_jwt_errors_to_invalid_token() {
        let body = r#"{"errors":[{"message":"Could not verify JWT","extensions":{"code":"invalid-jwt","path":"$"}}]}"#;
        assert!(matches!(
            parse_envelope(body),
            Err(Error::InvalidToken { .. })
        ));
    }

    #[test]
    fn envelope_keeps_other_error_codes() {
        let body = r#"{"errors":[{"message":"field missing","extensions":{"code":"validation-failed"}}]}"#;
        match parse_envelope(body) {
            Err(Error::Graphql { message, code }) => {
                assert_eq!(message, "field missing");
                assert_eq!(code.as_deref(), Some("validation-failed"));
            }
            other => panic!("expected Graphql error, got {other:?}"),
        }
    }

    #[test]
    fn envelope_without_data_is_an_error() {
        assert!(matches!(parse_envelope("{}"), Err(Error::MissingData)));
    }

    #[test]
    fn preview_respects_char_boundaries() {
        let body = "é".repeat(150);
        let p = preview(&body);
        assert!(p.len() <= 200);
        assert!(body.starts_with(p));
    }
}
