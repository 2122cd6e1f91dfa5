use serde::{Deserialize, Serialize};

use crate::{
    engine::EngineDescriptor,
    eval::EvalStatus,
    pac::{Pac, ShortPac},
};

/// Success envelope: `status` next to the payload's own fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: EvalStatus,
    #[serde(flatten)]
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: EvalStatus::Success,
            data,
        }
    }
}

impl ApiResponse<Empty> {
    pub fn ok() -> Self {
        Self::success(Empty {})
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Empty {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacList {
    pub pacs: Vec<ShortPac>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacDetails {
    pub pac: Pac,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineList {
    pub engines: Vec<EngineDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePacRequest {
    pub content: String,
}

/// Body of `POST /api/v1/eval/{uid}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvalInput {
    pub dest_host: String,
    pub src_ip: String,
}

/// Body of `POST /api/v1/eval`: the PAC travels with the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvalWithPacInput {
    pub content: String,
    pub dest_host: String,
    pub src_ip: String,
}
