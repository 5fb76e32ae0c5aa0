use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::FutureExt;
use serde_json::Value;
use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

use super::{Tool, ToolError, ToolOutput, ToolRegistry, ValidationError};

/// Resolves, validates and runs tool calls against a shared registry.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<ToolRegistry>,
    timeout: Option<Duration>,
}

impl Dispatcher {
    pub fn new(registry: Arc<ToolRegistry>, timeout: Option<Duration>) -> Self {
        Self { registry, timeout }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Call `tool_name` with a raw JSON request body.
    ///
    /// The tool is resolved before the body is parsed, so an unknown tool is
    /// reported as such whatever the body contains. An empty body counts as `{}`.
    /// Every call, including one rejected before its handler runs, is logged
    /// once under its own call id.
    pub async fn call_json(&self, tool_name: &str, body: &[u8]) -> Result<ToolOutput, ToolError> {
        let call_id = Uuid::new_v4();
        let span = info_span!("tool.call", tool = %tool_name, call_id = %call_id);

        async move {
            let started = Instant::now();
            let result = self.resolve_and_run(tool_name, body).await;
            let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

            match &result {
                Ok(_) => info!(name: "tool.call.completed", elapsed_ms, "Tool call completed"),
                Err(e) => warn!(name: "tool.call.failed", elapsed_ms, error = %e, "Tool call failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn resolve_and_run(&self, tool_name: &str, body: &[u8]) -> Result<ToolOutput, ToolError> {
        let tool = self.registry.lookup(tool_name)?;
        let args = tool.schema().validate(parse_body(body)?)?;
        self.run_guarded(tool.as_ref(), args).await
    }

    /// Run the handler, turning panics and timeouts into tool errors.
    async fn run_guarded(
        &self,
        tool: &dyn Tool,
        args: serde_json::Map<String, Value>,
    ) -> Result<ToolOutput, ToolError> {
        let guarded = AssertUnwindSafe(tool.call(args)).catch_unwind();

        let outcome = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, guarded)
                .await
                .map_err(|_elapsed| ToolError::Timeout {
                    tool: tool.name().to_string(),
                    after: limit,
                })?,
            None => guarded.await,
        };

        outcome.unwrap_or_else(|panic| Err(ToolError::Handler(panic_message(&*panic))))
    }
}

fn parse_body(body: &[u8]) -> Result<Value, ValidationError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(serde_json::Map::new()));
    }
    serde_json::from_slice(body).map_err(|e| ValidationError::Malformed(e.to_string()))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "tool handler panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{FieldType, Handler, InputSchema, ToolInput, TypedTool};
    use async_trait::async_trait;
    use serde::Deserialize;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Deserialize)]
    struct CompanyInput {
        company_name: String,
    }

    impl ToolInput for CompanyInput {
        fn schema() -> InputSchema {
            InputSchema::new().required("company_name", FieldType::String, "Company")
        }
    }

    #[derive(Default)]
    struct Counting {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Handler<CompanyInput> for Counting {
        type Output = Value;

        async fn handle(&self, input: CompanyInput) -> anyhow::Result<Value> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(json!({ "company": input.company_name, "status": "mock_data" }))
        }
    }

    struct Panicking;

    #[async_trait]
    impl Handler<CompanyInput> for Panicking {
        type Output = Value;

        async fn handle(&self, _input: CompanyInput) -> anyhow::Result<Value> {
            panic!("provider exploded");
        }
    }

    struct Slow;

    #[async_trait]
    impl Handler<CompanyInput> for Slow {
        type Output = Value;

        async fn handle(&self, _input: CompanyInput) -> anyhow::Result<Value> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(json!({}))
        }
    }

    fn profile_tool() -> Arc<dyn Tool> {
        Arc::new(TypedTool::<CompanyInput, _>::new("profile", "", Counting::default()))
    }

    async fn call(dispatcher: &Dispatcher, name: &str, args: Value) -> Result<ToolOutput, ToolError> {
        let body = args.to_string();
        dispatcher.call_json(name, body.as_bytes()).await
    }

    fn dispatcher_with(tool: Arc<dyn Tool>, timeout: Option<Duration>) -> Dispatcher {
        let mut registry = ToolRegistry::new();
        registry.register(tool).unwrap();
        Dispatcher::new(Arc::new(registry), timeout)
    }

    #[tokio::test]
    async fn test_successful_call() {
        let dispatcher = dispatcher_with(profile_tool(), None);
        let out = call(&dispatcher, "profile", json!({ "company_name": "Acme", "ignored": true }))
            .await
            .unwrap();
        assert_eq!(out["company"], "Acme");
        assert_eq!(out["status"], "mock_data");
    }

    #[tokio::test]
    async fn test_validation_failure_never_reaches_handler() {
        let calls = Arc::new(AtomicUsize::new(0));
        let handler = Counting {
            calls: Arc::clone(&calls),
        };
        let tool = TypedTool::<CompanyInput, _>::new("profile", "", handler);
        let dispatcher = dispatcher_with(Arc::new(tool), None);

        let err = call(&dispatcher, "profile", json!({})).await.unwrap_err();
        assert!(matches!(err, ToolError::Validation(ValidationError::MissingField { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unknown_tool_wins_over_malformed_body() {
        let dispatcher = dispatcher_with(profile_tool(), None);
        let err = dispatcher.call_json("unknown_tool", b"{not json").await.unwrap_err();
        assert!(matches!(err, ToolError::NotFound(name) if name == "unknown_tool"));
    }

    #[tokio::test]
    async fn test_call_json_body_handling() {
        let dispatcher = dispatcher_with(profile_tool(), None);

        let err = dispatcher.call_json("profile", b"{not json").await.unwrap_err();
        assert!(matches!(err, ToolError::Validation(ValidationError::Malformed(_))));

        let err = dispatcher.call_json("profile", b"  ").await.unwrap_err();
        assert!(matches!(err, ToolError::Validation(ValidationError::MissingField { .. })));

        let out = dispatcher
            .call_json("profile", br#"{"company_name":"Initech"}"#)
            .await
            .unwrap();
        assert_eq!(out["company"], "Initech");
    }

    #[tokio::test]
    async fn test_panic_becomes_handler_error() {
        let tool = TypedTool::<CompanyInput, _>::new("boom", "", Panicking);
        let dispatcher = dispatcher_with(Arc::new(tool), None);
        let err = call(&dispatcher, "boom", json!({ "company_name": "Acme" }))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Handler(msg) if msg == "provider exploded"));

        // The registry is still usable after a failed call.
        assert!(dispatcher.registry().lookup("boom").is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout() {
        let dispatcher = dispatcher_with(
            Arc::new(TypedTool::<CompanyInput, _>::new("slow", "", Slow)),
            Some(Duration::from_secs(5)),
        );
        let err = call(&dispatcher, "slow", json!({ "company_name": "Acme" }))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ToolError::Timeout { ref tool, after } if tool == "slow" && after == Duration::from_secs(5)
        ));
        assert_eq!(err.to_string(), "Tool 'slow' timed out after 5s");
    }

    #[tokio::test]
    async fn test_every_outcome_is_logged_with_call_id() {
        let logs = crate::telemetry::capture::CapturedLogs::default();
        let _guard = logs.install();
        let dispatcher = dispatcher_with(profile_tool(), None);

        call(&dispatcher, "profile", json!({ "company_name": "Acme" }))
            .await
            .unwrap();
        call(&dispatcher, "profile", json!({ "role_title": "Engineer" }))
            .await
            .unwrap_err();
        call(&dispatcher, "nope", json!({})).await.unwrap_err();
        dispatcher.call_json("profile", b"{not json").await.unwrap_err();

        let out = logs.contents();
        let lines: Vec<&str> = out.lines().filter(|l| l.contains("tool.call{")).collect();
        assert_eq!(lines.len(), 4, "{out}");
        assert!(lines.iter().all(|l| l.contains("call_id=") && l.contains("elapsed_ms=")));

        assert!(lines[0].contains("tool=profile") && lines[0].contains("Tool call completed"));
        assert!(lines[1].contains("Tool call failed") && lines[1].contains("field required: company_name"));
        assert!(lines[2].contains("tool=nope") && lines[2].contains("Tool 'nope' not found."));
        assert!(lines[3].contains("Tool call failed") && lines[3].contains("malformed request body"));
    }
}
