//! HTTP transport for the login and betting endpoints.

use crate::auth::{Credentials, Session};
use crate::config::Endpoints;
use crate::error::{excerpt, BetfairError, Result};
use crate::request::Envelope;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

const APPLICATION_HEADER: &str = "x-application";
const AUTHENTICATION_HEADER: &str = "x-authentication";

/// Raw outcome of a login POST; interpreted by [`crate::auth::login`].
#[derive(Debug, Clone)]
pub struct LoginReply {
    pub status: u16,
    pub body: String,
}

/// Issues one POST per call. Nothing is retried.
#[derive(Debug, Clone)]
pub struct Transport {
    client: Client,
    endpoints: Endpoints,
}

fn header_value(field: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|_| BetfairError::validation(field, "contains characters not allowed in a header"))
}

impl Transport {
    pub fn new(endpoints: Endpoints) -> Self {
        Self {
            client: Client::new(),
            endpoints,
        }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub async fn post_login(&self, credentials: &Credentials) -> Result<LoginReply> {
        let mut headers = HeaderMap::with_capacity(2);
        headers.insert(APPLICATION_HEADER, header_value("appKey", credentials.app_key())?);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let form = [
            ("username", credentials.username()),
            ("password", credentials.password()),
        ];

        debug!("Login request for user {}", credentials.username());
        let response = self
            .client
            .post(&self.endpoints.login_url)
            .headers(headers)
            .form(&form)
            .send()
            .await?;

        let status = response.status().as_u16();
        debug!("Login response status: {}", status);
        let body = response.text().await?;
        Ok(LoginReply { status, body })
    }

    /// Sends a betting API envelope and decodes the JSON body.
    ///
    /// A non-2xx response is still returned when its body carries a JSON-RPC
    /// `error` object, so the API error reaches the validator intact.
    pub async fn post(&self, envelope: &Envelope, session: &Session) -> Result<Value> {
        let mut headers = HeaderMap::with_capacity(4);
        headers.insert(APPLICATION_HEADER, header_value("appKey", session.app_key())?);
        headers.insert(AUTHENTICATION_HEADER, header_value("sessionToken", session.token())?);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        debug!(
            "API request: {}",
            serde_json::to_string(envelope).unwrap_or_default()
        );

        let response = self
            .client
            .post(&self.endpoints.betting_url)
            .headers(headers)
            .json(envelope)
            .send()
            .await?;

        let status = response.status();
        debug!("API response status: {}", status);

        let response_text = response.text().await?;
        debug!("API response: {}", excerpt(&response_text));

        let decoded = serde_json::from_str::<Value>(&response_text);
        if !status.is_success() {
            return match decoded {
                Ok(body) if body.get("error").is_some_and(Value::is_object) => Ok(body),
                _ => Err(BetfairError::network(
                    Some(status.as_u16()),
                    excerpt(&response_text),
                )),
            };
        }

        decoded.map_err(|e| {
            BetfairError::network(
                Some(status.as_u16()),
                format!("response body is not valid JSON: {e}"),
            )
        })
    }
}
