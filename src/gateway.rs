//! Gemini gateway: request composition and response mapping.
//!
//! One generation is one blocking HTTP POST. Every outcome (missing
//! credential, transport error, non-2xx status, odd response shape) is mapped
//! into a [`GatewayResult`]; nothing is returned as an `Err` to the caller.
//!
//! # Response mapping
//!
//! - non-2xx status: `Failure` with the status and the first 500 characters of
//!   the body
//! - 2xx with text at `candidates[0].content.parts[0].text`: that text
//! - 2xx without it: the whole response body re-serialized, so the validator
//!   still sees something
//! - 2xx with a body that is not JSON, or any transport error: `Failure`
use crate::config::Settings;
use crate::extract::extract_structured;
use crate::prompt::{compose_prompt, GenerationRequest};
use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::time::{Duration, Instant};

/// Single-attempt timeout for the model call.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
pub const TEMPERATURE: f64 = 0.7;
pub const MAX_OUTPUT_TOKENS: u32 = 2048;
pub const ERROR_EXCERPT_CHARS: usize = 500;
pub const MISSING_CREDENTIAL_MESSAGE: &str =
    "Service temporarily unavailable. Please try again in a moment.";

const TEXT_POINTER: &str = "/candidates/0/content/parts/0/text";

/// Status and body of an HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

/// HTTP seam so the gateway can run against a test double.
pub trait Transport {
    /// POST `body` as JSON to `url` with the given query parameters.
    ///
    /// Non-2xx statuses are returned as replies, not errors.
    fn post_json(&self, url: &str, query: &[(&str, &str)], body: &Value) -> Result<HttpReply>;
}

/// Blocking `ureq` transport with a global timeout.
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn post_json(&self, url: &str, query: &[(&str, &str)], body: &Value) -> Result<HttpReply> {
        let mut request = self.agent.post(url);
        for (key, value) in query {
            request = request.query(*key, *value);
        }
        let mut response = request.send_json(body).context("send request")?;
        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .context("read response body")?;
        Ok(HttpReply { status, body })
    }
}

/// Which boundary produced a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// No credential configured; no call was attempted.
    Configuration,
    /// Connection, timeout, or undecodable response body.
    Transport,
    /// The API answered with a non-2xx status.
    Upstream { status: u16 },
}

/// Uniform outcome of one gateway call.
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayResult {
    Success {
        raw_text: String,
        parsed: Option<Value>,
    },
    Failure {
        kind: FailureKind,
        error_message: String,
        raw_text: String,
    },
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Configuration => write!(f, "configuration"),
            Self::Transport => write!(f, "transport"),
            Self::Upstream { status } => write!(f, "upstream status {status}"),
        }
    }
}

/// Gateway to the generative-text API.
pub struct Gateway<T: Transport> {
    transport: T,
    api_key: Option<String>,
    endpoint: String,
}

impl Gateway<UreqTransport> {
    /// Build a gateway backed by `ureq` with the fixed request timeout.
    pub fn from_settings(settings: &Settings) -> Self {
        Gateway::new(
            UreqTransport::new(REQUEST_TIMEOUT),
            settings.api_key.clone(),
            settings.endpoint.clone(),
        )
    }
}

impl<T: Transport> Gateway<T> {
    pub fn new(transport: T, api_key: Option<String>, endpoint: String) -> Self {
        Self {
            transport,
            api_key,
            endpoint,
        }
    }

    /// Run one generation and map the outcome.
    pub fn generate(&self, request: &GenerationRequest) -> GatewayResult {
        let Some(api_key) = self.api_key.as_deref() else {
            tracing::warn!("no API credential configured; skipping request");
            return GatewayResult::Failure {
                kind: FailureKind::Configuration,
                error_message: MISSING_CREDENTIAL_MESSAGE.to_string(),
                raw_text: String::new(),
            };
        };

        let prompt = compose_prompt(request);
        let payload = build_payload(&prompt);
        let start = Instant::now();
        let reply = self
            .transport
            .post_json(&self.endpoint, &[("key", api_key)], &payload);
        let elapsed_ms = start.elapsed().as_millis();

        let reply = match reply {
            Ok(reply) => reply,
            Err(err) => {
                let detail = format!("{err:#}");
                tracing::warn!(elapsed_ms, error = %detail, "model request failed");
                return transport_failure(&detail);
            }
        };

        tracing::info!(
            elapsed_ms,
            status = reply.status,
            bundle = %request.resolved_bundle(),
            prompt_bytes = prompt.len(),
            response_bytes = reply.body.len(),
            "model request complete"
        );

        if !(200..300).contains(&reply.status) {
            return upstream_failure(reply.status, &reply.body);
        }

        let data: Value = match serde_json::from_str(&reply.body) {
            Ok(data) => data,
            Err(err) => return transport_failure(&format!("decode response body: {err}")),
        };
        let raw_text = response_text(&data);
        let parsed = extract_structured(&raw_text);
        GatewayResult::Success { raw_text, parsed }
    }
}

/// Build the `generateContent` request body for a composed prompt.
pub fn build_payload(prompt: &str) -> Value {
    json!({
        "contents": [
            {
                "role": "user",
                "parts": [{ "text": prompt }],
            }
        ],
        "generationConfig": {
            "temperature": TEMPERATURE,
            "maxOutputTokens": MAX_OUTPUT_TOKENS,
        },
    })
}

/// Pull the model text out of a response, or serialize what is there.
fn response_text(data: &Value) -> String {
    match data.pointer(TEXT_POINTER) {
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
        None => {
            tracing::debug!("response missing candidate text; using whole body");
            data.to_string()
        }
    }
}

fn transport_failure(detail: &str) -> GatewayResult {
    GatewayResult::Failure {
        kind: FailureKind::Transport,
        error_message: format!("Request failed: {detail}"),
        raw_text: format!("Error: {detail}"),
    }
}

fn upstream_failure(status: u16, body: &str) -> GatewayResult {
    let excerpt: String = body.chars().take(ERROR_EXCERPT_CHARS).collect();
    tracing::warn!(status, body_bytes = body.len(), "model API returned an error status");
    GatewayResult::Failure {
        kind: FailureKind::Upstream { status },
        error_message: format!("Gemini error {status}: {excerpt}"),
        raw_text: format!("Gemini failed with status {status}: {body}"),
    }
}

#[cfg(test)]
#[path = "gateway_tests.rs"]
mod tests;
