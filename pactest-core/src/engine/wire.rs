//! Wire contract between the orchestrator and an engine.
//!
//! Every engine receives the same [`EnginePayload`]. Whatever comes back, or
//! fails to come back, is folded into an [`EngineReply`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;

use crate::{eval::EvalRequest, pac::PacUid};

/// Proxy reported when an engine answers successfully but names none.
pub const UNDEFINED_PROXY: &str = "<undefined>";

pub const TIMEOUT_ERROR: &str = "Request to engine timed out";
pub const TIMEOUT_ERROR_CODE: i64 = 500;

pub const TRANSPORT_ERROR: &str = "Request to engine failed";
pub const TRANSPORT_ERROR_CODE: i64 = 400;

pub const CANCELLED_ERROR: &str = "Evaluation cancelled";
pub const CANCELLED_ERROR_CODE: i64 = 503;

pub const ABORTED_ERROR: &str = "Engine task aborted";
pub const ABORTED_ERROR_CODE: i64 = 500;

/// Fallbacks for non-200 replies whose JSON body omits a field.
pub const DEFAULT_FAILURE_CODE: i64 = 1;
pub const DEFAULT_FAILURE_MESSAGE: &str = "No Message";

/// Fallback code for a 200 reply that reports `"status": "failed"`.
pub const DEFAULT_REPORTED_FAILURE_CODE: i64 = 0;

/// PAC section of the engine request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacPayload {
    pub uid: PacUid,
    /// Where the engine can fetch the script instead of using `content`.
    pub url: Url,
    pub content: String,
}

/// Body POSTed to every engine for one evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnginePayload {
    pub pac: PacPayload,
    pub src_ip: String,
    pub dest_host: String,
}

impl EnginePayload {
    pub fn build(request: &EvalRequest, pac_base_url: &Url) -> Self {
        Self {
            pac: PacPayload {
                uid: request.pac.uid.clone(),
                url: pac_fetch_url(pac_base_url, &request.pac.uid),
                content: request.pac.content.clone(),
            },
            src_ip: request.src_ip.clone(),
            dest_host: request.dest_host.clone(),
        }
    }
}

/// `<base>/pac/<uid>`, with the uid percent-encoded as a path segment.
pub fn pac_fetch_url(base: &Url, uid: &PacUid) -> Url {
    let mut url = base.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().push("pac").push(uid.as_str());
    }
    url
}

/// Outcome of calling one engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineReply {
    Success {
        proxy: String,
    },
    Failed {
        error: Option<String>,
        message: Option<String>,
        error_code: Option<i64>,
    },
}

impl EngineReply {
    pub fn is_success(&self) -> bool {
        matches!(self, EngineReply::Success { .. })
    }

    pub fn timed_out() -> Self {
        EngineReply::Failed {
            error: Some(TIMEOUT_ERROR.to_string()),
            message: None,
            error_code: Some(TIMEOUT_ERROR_CODE),
        }
    }

    pub fn transport_failure(detail: impl Into<String>) -> Self {
        EngineReply::Failed {
            error: Some(TRANSPORT_ERROR.to_string()),
            message: Some(detail.into()),
            error_code: Some(TRANSPORT_ERROR_CODE),
        }
    }

    pub fn cancelled() -> Self {
        EngineReply::Failed {
            error: Some(CANCELLED_ERROR.to_string()),
            message: Some("server is shutting down".to_string()),
            error_code: Some(CANCELLED_ERROR_CODE),
        }
    }

    pub fn aborted(detail: impl Into<String>) -> Self {
        EngineReply::Failed {
            error: Some(ABORTED_ERROR.to_string()),
            message: Some(detail.into()),
            error_code: Some(ABORTED_ERROR_CODE),
        }
    }

    /// Maps a client-side failure: timeouts first, everything else after.
    pub fn from_transport_error(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::timed_out()
        } else {
            Self::transport_failure(err.to_string())
        }
    }

    /// Classifies an HTTP reply from an engine.
    ///
    /// Only an exact 200 counts as an answer. A 200 body must be a JSON
    /// object; it is a success unless it explicitly reports
    /// `"status": "failed"`. Any other status is a failure, enriched from the
    /// body when the body is a JSON object.
    pub fn classify(status: u16, body: &str) -> Self {
        let fields = ReplyFields::parse(body);

        if status == 200 {
            return match fields {
                Ok(fields) if fields.reports_failure() => EngineReply::Failed {
                    error: fields.error,
                    message: fields.message,
                    error_code: Some(fields.error_code.unwrap_or(DEFAULT_REPORTED_FAILURE_CODE)),
                },
                Ok(fields) => EngineReply::Success {
                    proxy: fields.proxy.unwrap_or_else(|| UNDEFINED_PROXY.to_string()),
                },
                Err(reason) => Self::transport_failure(reason),
            };
        }

        match fields {
            Ok(fields) => EngineReply::Failed {
                error: Some(fields.error.unwrap_or_default()),
                message: Some(
                    fields
                        .message
                        .unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string()),
                ),
                error_code: Some(fields.error_code.unwrap_or(DEFAULT_FAILURE_CODE)),
            },
            Err(_) => EngineReply::Failed {
                error: Some(body.to_string()),
                message: Some(format!(
                    "Engine responded with status {status}, and response is not a JSON"
                )),
                error_code: Some(i64::from(status)),
            },
        }
    }
}

/// The fields the orchestrator reads from an engine's JSON body.
#[derive(Debug, Default)]
struct ReplyFields {
    status: Option<String>,
    proxy: Option<String>,
    error: Option<String>,
    message: Option<String>,
    error_code: Option<i64>,
}

impl ReplyFields {
    fn parse(body: &str) -> Result<Self, String> {
        let value: Value = serde_json::from_str(body)
            .map_err(|err| format!("Engine response is not valid JSON: {err}"))?;
        let Value::Object(object) = value else {
            return Err("Engine response is not a JSON object".to_string());
        };

        Ok(Self {
            status: text_field(&object, "status"),
            proxy: text_field(&object, "proxy"),
            error: text_field(&object, "error"),
            message: text_field(&object, "message"),
            error_code: object.get("error_code").and_then(Value::as_i64),
        })
    }

    fn reports_failure(&self) -> bool {
        self.status
            .as_deref()
            .is_some_and(|status| status.eq_ignore_ascii_case("failed"))
    }
}

/// Strings pass through; other non-null values keep their JSON rendering.
fn text_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    match object.get(key)? {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}
