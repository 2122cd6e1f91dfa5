use std::{collections::HashSet, sync::Arc};

use super::EngineDescriptor;
use crate::error::{PacError, Result};

/// Immutable, ordered list of the engines configured for this process.
///
/// The order is the order results are reported in. Cloning is cheap; all
/// clones share the same descriptors.
#[derive(Debug, Clone, Default)]
pub struct EngineRegistry {
    engines: Arc<[EngineDescriptor]>,
}

impl EngineRegistry {
    /// Builds a registry, rejecting blank or duplicate engine names.
    pub fn new(engines: Vec<EngineDescriptor>) -> Result<Self> {
        let mut seen = HashSet::new();
        for engine in &engines {
            let name = engine.name.trim();
            if name.is_empty() {
                return Err(PacError::InvalidEngine(format!(
                    "engine at {} has an empty name",
                    engine.url
                )));
            }
            if !seen.insert(name.to_string()) {
                return Err(PacError::InvalidEngine(format!(
                    "engine name '{name}' is configured more than once"
                )));
            }
        }

        Ok(Self {
            engines: engines.into(),
        })
    }

    pub fn len(&self) -> usize {
        self.engines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EngineDescriptor> {
        self.engines.iter()
    }

    pub fn as_slice(&self) -> &[EngineDescriptor] {
        &self.engines
    }

    pub fn get(&self, name: &str) -> Option<&EngineDescriptor> {
        self.engines.iter().find(|engine| engine.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.engines.iter().map(|engine| engine.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use url::Url;

    use super::*;
    use crate::engine::EngineFlag;

    fn engine(name: &str, port: u16) -> EngineDescriptor {
        EngineDescriptor::new(
            name,
            Url::parse(&format!("http://127.0.0.1:{port}/")).unwrap(),
            [EngineFlag::Evaluation],
        )
    }

    #[test]
    fn keeps_configured_order() {
        let registry =
            EngineRegistry::new(vec![engine("winhttp", 8082), engine("v8", 8081), engine("eslint", 8083)])
                .unwrap();

        assert_eq!(registry.len(), 3);
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["winhttp", "v8", "eslint"]);
        assert_eq!(registry.get("v8").unwrap().url.port(), Some(8081));
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn rejects_duplicate_names() {
        let err = EngineRegistry::new(vec![engine("v8", 8081), engine("v8", 8082)]).unwrap_err();
        assert!(matches!(err, PacError::InvalidEngine(msg) if msg.contains("v8")));
    }

    #[test]
    fn rejects_blank_names() {
        let err = EngineRegistry::new(vec![engine("  ", 8081)]).unwrap_err();
        assert!(matches!(err, PacError::InvalidEngine(_)));
    }

    #[test]
    fn empty_registry_is_allowed() {
        let registry = EngineRegistry::new(Vec::new()).unwrap();
        assert!(registry.is_empty());
    }
}
