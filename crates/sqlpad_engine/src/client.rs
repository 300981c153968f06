use std::time::Duration;

use bytes::BytesMut;
use futures_util::StreamExt;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::Serialize;
use sqlpad_logging::{sqlpad_debug, sqlpad_warn};
use url::Url;

use crate::decode::decode_body;
use crate::{FailureKind, RequestError, ResponseBody};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    /// Origin the endpoint paths are resolved against.
    pub base_url: String,
    pub parse_path: String,
    pub probe_path: String,
    /// `None` leaves connection setup unbounded.
    pub connect_timeout: Option<Duration>,
    /// `None` lets a request wait for the backend indefinitely.
    pub request_timeout: Option<Duration>,
    pub max_bytes: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            parse_path: "/api/parse".to_string(),
            probe_path: "/api/todo".to_string(),
            connect_timeout: None,
            request_timeout: None,
            max_bytes: 5 * 1024 * 1024,
        }
    }
}

impl ClientSettings {
    pub fn parse_url(&self) -> Result<Url, RequestError> {
        resolve(&self.base_url, &self.parse_path)
    }

    pub fn probe_url(&self) -> Result<Url, RequestError> {
        resolve(&self.base_url, &self.probe_path)
    }
}

fn resolve(base: &str, path: &str) -> Result<Url, RequestError> {
    let base = Url::parse(base)
        .map_err(|err| RequestError::new(FailureKind::InvalidUrl, format!("{base}: {err}")))?;
    if base.cannot_be_a_base() {
        return Err(RequestError::new(
            FailureKind::InvalidUrl,
            format!("{base}: not a base url"),
        ));
    }
    base.join(path)
        .map_err(|err| RequestError::new(FailureKind::InvalidUrl, format!("{path}: {err}")))
}

#[async_trait::async_trait]
pub trait BackendClient: Send + Sync {
    /// POST `{"sql": sql}` to the parse endpoint and return the body as text.
    async fn submit_query(&self, sql: &str) -> Result<ResponseBody, RequestError>;

    /// GET the probe endpoint.
    async fn probe(&self) -> Result<ResponseBody, RequestError>;
}

#[derive(Serialize)]
struct ParseRequest<'a> {
    sql: &'a str,
}

#[derive(Debug, Clone)]
pub struct ReqwestBackendClient {
    client: reqwest::Client,
    parse_url: Url,
    probe_url: Url,
    max_bytes: u64,
}

impl ReqwestBackendClient {
    pub fn new(settings: &ClientSettings) -> Result<Self, RequestError> {
        let parse_url = settings.parse_url()?;
        let probe_url = settings.probe_url()?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| RequestError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self {
            client,
            parse_url,
            probe_url,
            max_bytes: settings.max_bytes,
        })
    }

    pub fn parse_url(&self) -> &Url {
        &self.parse_url
    }

    async fn read_response(&self, response: reqwest::Response) -> Result<ResponseBody, RequestError> {
        let status = response.status();
        if !status.is_success() {
            return Err(RequestError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.max_bytes {
                return Err(RequestError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        let mut body = BytesMut::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = body.len() as u64 + chunk.len() as u64;
            if next_len > self.max_bytes {
                return Err(RequestError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            body.extend_from_slice(&chunk);
        }

        let decoded = decode_body(&body, content_type.as_deref());
        if decoded.had_errors {
            sqlpad_warn!(
                "Response body is not valid {}; malformed bytes replaced ({} bytes)",
                decoded.encoding_label,
                body.len()
            );
        }

        Ok(ResponseBody {
            status: status.as_u16(),
            content_type,
            text: decoded.text,
            byte_len: body.len() as u64,
        })
    }
}

#[async_trait::async_trait]
impl BackendClient for ReqwestBackendClient {
    async fn submit_query(&self, sql: &str) -> Result<ResponseBody, RequestError> {
        let payload = serde_json::to_vec(&ParseRequest { sql })
            .map_err(|err| RequestError::new(FailureKind::Serialize, err.to_string()))?;
        sqlpad_debug!(
            "POST {} sql_len={} payload_len={}",
            self.parse_url,
            sql.len(),
            payload.len()
        );

        let response = self
            .client
            .post(self.parse_url.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json, text/plain, */*")
            .body(payload)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        self.read_response(response).await
    }

    async fn probe(&self) -> Result<ResponseBody, RequestError> {
        sqlpad_debug!("GET {}", self.probe_url);
        let response = self
            .client
            .get(self.probe_url.clone())
            .send()
            .await
            .map_err(map_reqwest_error)?;

        self.read_response(response).await
    }
}

fn map_reqwest_error(err: reqwest::Error) -> RequestError {
    if err.is_timeout() {
        return RequestError::new(FailureKind::Timeout, err.to_string());
    }
    RequestError::new(FailureKind::Network, err.to_string())
}
