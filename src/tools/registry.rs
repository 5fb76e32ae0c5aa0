use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use super::{Tool, ToolError};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("tool '{0}' is already registered")]
    DuplicateTool(String),
}

/// Discovery view of a registered tool.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

/// Name-keyed table of tools. Populated at startup, read-only afterwards.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<&mut Self, RegistryError> {
        let name = tool.name().to_string();
        if self.tools.contains_key(&name) {
            return Err(RegistryError::DuplicateTool(name));
        }

        debug!(name: "tool.registered", tool = %name, "Tool registered");
        self.tools.insert(name, tool);
        Ok(self)
    }

    pub fn lookup(&self, name: &str) -> Result<&Arc<dyn Tool>, ToolError> {
        self.tools
            .get(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.names()
            .into_iter()
            .filter_map(|name| self.tools.get(name))
            .map(|tool| describe(tool.as_ref()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

pub fn describe(tool: &dyn Tool) -> ToolDescriptor {
    ToolDescriptor {
        name: tool.name().to_string(),
        description: tool.description().to_string(),
        input_schema: tool.schema().to_json_schema(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{FieldType, Handler, InputSchema, ToolInput, TypedTool};
    use async_trait::async_trait;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct NoteInput {
        #[allow(dead_code)]
        note: String,
    }

    impl ToolInput for NoteInput {
        fn schema() -> InputSchema {
            InputSchema::new().required("note", FieldType::String, "A note")
        }
    }

    struct Ack;

    #[async_trait]
    impl Handler<NoteInput> for Ack {
        type Output = Value;

        async fn handle(&self, _input: NoteInput) -> anyhow::Result<Value> {
            Ok(json!({ "status": "ok" }))
        }
    }

    fn note_tool(name: &'static str) -> Arc<dyn Tool> {
        Arc::new(TypedTool::<NoteInput, _>::new(name, "Acknowledges a note", Ack))
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = ToolRegistry::new();
        registry
            .register(note_tool("b_tool"))
            .unwrap()
            .register(note_tool("a_tool"))
            .unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names(), vec!["a_tool", "b_tool"]);
        assert_eq!(registry.lookup("a_tool").unwrap().name(), "a_tool");
    }

    #[test]
    fn test_lookup_unknown() {
        let registry = ToolRegistry::new();
        assert!(registry.is_empty());
        let err = registry.lookup("nope").unwrap_err();
        assert!(matches!(err, ToolError::NotFound(name) if name == "nope"));
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut registry = ToolRegistry::new();
        registry.register(note_tool("dup")).unwrap();
        let err = registry.register(note_tool("dup")).unwrap_err();
        assert_eq!(err, RegistryError::DuplicateTool("dup".to_string()));
        assert_eq!(registry.names(), vec!["dup"]);
    }

    #[test]
    fn test_descriptors_carry_schema() {
        let mut registry = ToolRegistry::new();
        registry.register(note_tool("note")).unwrap();

        let descriptors = registry.descriptors();
        assert_eq!(descriptors.len(), 1);
        assert_eq!(descriptors[0].description, "Acknowledges a note");
        assert_eq!(descriptors[0].input_schema["required"], json!(["note"]));
    }
}
