use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

pub mod registry;
pub mod wire;

pub use registry::EngineRegistry;
pub use wire::{EnginePayload, EngineReply, PacPayload};

/// Capability tags describing what a consumer can expect from an engine's
/// result. They are informational: every engine is called regardless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineFlag {
    /// The engine executes the PAC and reports the selected proxy.
    Evaluation,
    /// The engine checks the PAC (e.g. lints it) without selecting a proxy.
    Validation,
    /// The engine honours the caller's source IP (`myIpAddress()`).
    SrcIp,
}

impl EngineFlag {
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineFlag::Evaluation => "evaluation",
            EngineFlag::Validation => "validation",
            EngineFlag::SrcIp => "src_ip",
        }
    }
}

impl fmt::Display for EngineFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One configured evaluation engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineDescriptor {
    pub name: String,
    pub url: Url,
    #[serde(default)]
    pub flags: Vec<EngineFlag>,
}

impl EngineDescriptor {
    /// Builds a descriptor; repeated flags are collapsed, first occurrence wins.
    pub fn new(
        name: impl Into<String>,
        url: Url,
        flags: impl IntoIterator<Item = EngineFlag>,
    ) -> Self {
        let mut unique = Vec::new();
        for flag in flags {
            if !unique.contains(&flag) {
                unique.push(flag);
            }
        }
        Self {
            name: name.into(),
            url,
            flags: unique,
        }
    }

    pub fn has_flag(&self, flag: EngineFlag) -> bool {
        self.flags.contains(&flag)
    }
}
