use std::fmt;
use std::marker::PhantomData;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::{InputSchema, Tool, ToolError, ToolOutput, ValidationError};

/// Typed input of a tool, built from validated arguments.
pub trait ToolInput: DeserializeOwned + Send + 'static {
    fn schema() -> InputSchema;
}

/// Strategy that produces a tool result from typed input.
///
/// Mock providers and real data providers implement this for the same input
/// type, so swapping one for the other never touches dispatch.
#[async_trait]
pub trait Handler<I: Send + 'static>: Send + Sync + 'static {
    type Output: Serialize + Send;

    async fn handle(&self, input: I) -> anyhow::Result<Self::Output>;
}

/// Adapts a [`Handler`] over a [`ToolInput`] into a registrable [`Tool`].
pub struct TypedTool<I, H> {
    name: &'static str,
    description: &'static str,
    schema: InputSchema,
    handler: H,
    _input: PhantomData<fn() -> I>,
}

impl<I, H> TypedTool<I, H>
where
    I: ToolInput,
    H: Handler<I>,
{
    pub fn new(name: &'static str, description: &'static str, handler: H) -> Self {
        Self {
            name,
            description,
            schema: I::schema(),
            handler,
            _input: PhantomData,
        }
    }
}

impl<I, H> fmt::Debug for TypedTool<I, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedTool")
            .field("name", &self.name)
            .field("fields", &self.schema.fields().len())
            .finish()
    }
}

#[async_trait]
impl<I, H> Tool for TypedTool<I, H>
where
    I: ToolInput,
    H: Handler<I>,
{
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        self.description
    }

    fn schema(&self) -> &InputSchema {
        &self.schema
    }

    async fn call(&self, args: Map<String, Value>) -> Result<ToolOutput, ToolError> {
        let input: I = serde_json::from_value(Value::Object(args))
            .map_err(|e| ValidationError::Malformed(e.to_string()))?;

        let output = self
            .handler
            .handle(input)
            .await
            .map_err(|e| ToolError::Handler(format!("{e:#}")))?;

        match serde_json::to_value(output) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(ToolError::Handler(format!(
                "tool '{}' returned a non-object result",
                self.name
            ))),
            Err(e) => Err(ToolError::Handler(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::FieldType;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct EchoInput {
        text: String,
    }

    impl ToolInput for EchoInput {
        fn schema() -> InputSchema {
            InputSchema::new().required("text", FieldType::String, "Text to echo")
        }
    }

    struct Echo;

    #[async_trait]
    impl Handler<EchoInput> for Echo {
        type Output = Value;

        async fn handle(&self, input: EchoInput) -> anyhow::Result<Value> {
            Ok(json!({ "echo": input.text }))
        }
    }

    struct Scalar;

    #[async_trait]
    impl Handler<EchoInput> for Scalar {
        type Output = usize;

        async fn handle(&self, input: EchoInput) -> anyhow::Result<usize> {
            Ok(input.text.len())
        }
    }

    struct Failing;

    #[async_trait]
    impl Handler<EchoInput> for Failing {
        type Output = Value;

        async fn handle(&self, _input: EchoInput) -> anyhow::Result<Value> {
            Err(anyhow::anyhow!("upstream unavailable").context("lookup failed"))
        }
    }

    fn args(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_typed_tool_calls_handler() {
        let tool = TypedTool::<EchoInput, _>::new("echo", "Echoes text", Echo);
        assert_eq!(tool.name(), "echo");
        assert_eq!(tool.schema().fields().len(), 1);

        let out = tool.call(args(json!({ "text": "hi" }))).await.unwrap();
        assert_eq!(out["echo"], "hi");
    }

    #[tokio::test]
    async fn test_handler_error_keeps_context_chain() {
        let tool = TypedTool::<EchoInput, _>::new("echo", "", Failing);
        let err = tool.call(args(json!({ "text": "hi" }))).await.unwrap_err();
        match err {
            ToolError::Handler(msg) => assert_eq!(msg, "lookup failed: upstream unavailable"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_object_output_is_handler_error() {
        let tool = TypedTool::<EchoInput, _>::new("len", "", Scalar);
        let err = tool.call(args(json!({ "text": "abc" }))).await.unwrap_err();
        assert!(matches!(err, ToolError::Handler(msg) if msg.contains("non-object")));
    }

    #[tokio::test]
    async fn test_unconvertible_args_are_validation_errors() {
        let tool = TypedTool::<EchoInput, _>::new("echo", "", Echo);
        let err = tool.call(Map::new()).await.unwrap_err();
        assert!(matches!(err, ToolError::Validation(ValidationError::Malformed(_))));
    }
}
