use serde_json::{Map, Value};
use vischart_contracts::charts::ChartKind;
use vischart_contracts::envelope::{ContentBlock, EnvelopeMeta, ResponseEnvelope, StrategyResult};

pub const SPEC_META_DESCRIPTION: &str =
    "Chart type and arguments used to produce this chart; resend them to regenerate or edit it.";

/// Shapes a strategy result into the wire envelope.
pub fn normalize(kind: ChartKind, arguments: &Map<String, Value>, result: StrategyResult) -> ResponseEnvelope {
    match result {
        StrategyResult::Url(url) => {
            let mut spec = arguments.clone();
            spec.insert("type".to_string(), Value::String(kind.id().to_string()));
            ResponseEnvelope {
                content: vec![ContentBlock::text(url)],
                is_error: None,
                meta: Some(EnvelopeMeta {
                    description: SPEC_META_DESCRIPTION.to_string(),
                    spec: Value::Object(spec),
                }),
            }
        }
        StrategyResult::Tool(tool) => {
            let mut content = tool.content;
            // Callers read the first text block, so one must exist.
            if !content.iter().any(ContentBlock::is_text) {
                content.insert(0, ContentBlock::text(format!("{} result", kind.id())));
            }
            ResponseEnvelope {
                content,
                is_error: tool.is_error.then_some(true),
                meta: None,
            }
        }
    }
}
