use serde::{Deserialize, Serialize};

use crate::{
    engine::{EngineDescriptor, EngineFlag, EngineReply},
    pac::Pac,
};

pub mod orchestrator;

pub use orchestrator::{DEFAULT_ENGINE_TIMEOUT, Orchestrator, OrchestratorConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvalStatus {
    Success,
    Failed,
}

/// Everything an evaluation needs; sent unchanged to every engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvalRequest {
    pub pac: Pac,
    pub dest_host: String,
    pub src_ip: String,
}

impl EvalRequest {
    pub fn new(pac: Pac, dest_host: impl Into<String>, src_ip: impl Into<String>) -> Self {
        Self {
            pac,
            dest_host: dest_host.into(),
            src_ip: src_ip.into(),
        }
    }
}

/// What one engine made of one evaluation.
///
/// Empty optional fields are left out of the JSON rendering entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineResult {
    pub engine: String,
    pub status: EvalStatus,
    #[serde(default)]
    pub flags: Vec<EngineFlag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<i64>,
    #[serde(default, skip_serializing_if = "is_blank")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "is_blank")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "is_blank")]
    pub proxy: Option<String>,
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(str::is_empty)
}

impl EngineResult {
    pub fn from_reply(engine: &EngineDescriptor, reply: EngineReply) -> Self {
        let (status, proxy, error, message, error_code) = match reply {
            EngineReply::Success { proxy } => (EvalStatus::Success, Some(proxy), None, None, None),
            EngineReply::Failed {
                error,
                message,
                error_code,
            } => (EvalStatus::Failed, None, error, message, error_code),
        };

        Self {
            engine: engine.name.clone(),
            status,
            flags: engine.flags.clone(),
            error_code,
            error,
            message,
            proxy,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == EvalStatus::Success
    }

    pub fn has_flag(&self, flag: EngineFlag) -> bool {
        self.flags.contains(&flag)
    }
}

/// Aggregate answer to one evaluation: one result per registered engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvalResponse {
    pub request: EvalRequest,
    pub status: EvalStatus,
    pub results: Vec<EngineResult>,
}

impl EvalResponse {
    /// Folds per-engine results; the aggregate succeeds only when every
    /// engine did. With no engines the aggregate is `Success` over an empty
    /// `results` list.
    pub fn aggregate(request: EvalRequest, results: Vec<EngineResult>) -> Self {
        let status = if results.iter().all(EngineResult::is_success) {
            EvalStatus::Success
        } else {
            EvalStatus::Failed
        };

        Self {
            request,
            status,
            results,
        }
    }

    pub fn result_for(&self, engine: &str) -> Option<&EngineResult> {
        self.results.iter().find(|result| result.engine == engine)
    }

    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|result| result.is_success()).count()
    }
}

#[cfg(test)]
mod tests {
    use url::Url;

    use super::*;

    fn engine(name: &str, flags: &[EngineFlag]) -> EngineDescriptor {
        EngineDescriptor::new(
            name,
            Url::parse("http://127.0.0.1:9/").unwrap(),
            flags.iter().copied(),
        )
    }

    fn request() -> EvalRequest {
        EvalRequest::new(
            Pac::new("function FindProxyForURL(u,h){return 'DIRECT';}"),
            "example.com",
            "10.0.0.1",
        )
    }

    #[test]
    fn success_result_serializes_without_error_fields() {
        let result = EngineResult::from_reply(
            &engine("v8", &[EngineFlag::Evaluation, EngineFlag::SrcIp]),
            EngineReply::Success {
                proxy: "DIRECT".into(),
            },
        );

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "engine": "v8",
                "status": "success",
                "flags": ["evaluation", "src_ip"],
                "proxy": "DIRECT",
            })
        );
    }

    #[test]
    fn failed_result_drops_empty_error_text() {
        let result = EngineResult::from_reply(
            &engine("winhttp", &[EngineFlag::Evaluation]),
            EngineReply::classify(500, "{}"),
        );

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["error_code"], 1);
        assert_eq!(json["message"], "No Message");
        assert!(json.get("error").is_none());
        assert!(json.get("proxy").is_none());
    }

    #[test]
    fn aggregate_requires_every_engine() {
        let ok = EngineResult::from_reply(
            &engine("v8", &[]),
            EngineReply::Success {
                proxy: "DIRECT".into(),
            },
        );
        let bad = EngineResult::from_reply(&engine("eslint", &[]), EngineReply::timed_out());

        let all_ok = EvalResponse::aggregate(request(), vec![ok.clone(), ok.clone()]);
        assert_eq!(all_ok.status, EvalStatus::Success);

        let mixed = EvalResponse::aggregate(request(), vec![ok, bad]);
        assert_eq!(mixed.status, EvalStatus::Failed);
        assert_eq!(mixed.succeeded(), 1);
        assert_eq!(mixed.result_for("eslint").unwrap().error_code, Some(500));
    }

    #[test]
    fn aggregate_of_no_engines_is_success() {
        let empty = EvalResponse::aggregate(request(), Vec::new());
        assert_eq!(empty.status, EvalStatus::Success);
        assert!(empty.results.is_empty());
        assert_eq!(empty.succeeded(), 0);
    }

    #[test]
    fn response_echoes_the_request() {
        let request = request();
        let response = EvalResponse::aggregate(request.clone(), Vec::new());

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["request"]["dest_host"], "example.com");
        assert_eq!(json["request"]["src_ip"], "10.0.0.1");
        assert_eq!(json["request"]["pac"]["uid"], request.pac.uid.as_str());
        assert_eq!(json["status"], "success");
    }
}
