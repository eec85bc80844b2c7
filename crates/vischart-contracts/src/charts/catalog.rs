use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{ChartKind, DisabledTools, UNIFIED_TOOL_NAME};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Tools exposed to callers: the unified entry point first, then one tool per
/// chart kind, minus anything disabled.
pub fn list_tools(disabled: &DisabledTools) -> Vec<ToolDescriptor> {
    let mut tools = Vec::with_capacity(ChartKind::ALL.len() + 1);
    if !disabled.contains(UNIFIED_TOOL_NAME) {
        tools.push(unified_tool());
    }
    for kind in ChartKind::ALL {
        if disabled.contains(kind.tool_name()) {
            continue;
        }
        tools.push(ToolDescriptor {
            name: kind.tool_name().to_string(),
            description: kind.description().to_string(),
            input_schema: kind
                .schema()
                .map(|schema| schema.to_json_schema())
                .unwrap_or_else(|| json!({ "type": "object" })),
        });
    }
    tools
}

fn unified_tool() -> ToolDescriptor {
    ToolDescriptor {
        name: UNIFIED_TOOL_NAME.to_string(),
        description: "Generate any supported chart. Pass the chart type in `type` and the chart \
                      arguments alongside it; they are validated against the chosen type's \
                      schema, and keys that type does not declare are dropped."
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "type": {
                    "type": "string",
                    "enum": ChartKind::supported_ids(),
                    "description": "Chart type to generate.",
                },
                "data": {
                    "description": "Chart data; its shape depends on the chart type.",
                },
            },
            "required": ["type"],
        }),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::list_tools;
    use crate::charts::{ChartKind, DisabledTools, UNIFIED_TOOL_NAME};

    #[test]
    fn lists_unified_entry_and_every_chart_tool() {
        let tools = list_tools(&DisabledTools::default());
        assert_eq!(tools.len(), ChartKind::ALL.len() + 1);
        assert_eq!(tools[0].name, UNIFIED_TOOL_NAME);
        assert_eq!(tools[0].input_schema["required"], json!(["type"]));
        assert!(tools
            .iter()
            .any(|tool| tool.name == "generate_candlestick_chart"));
    }

    #[test]
    fn unified_description_says_arguments_are_validated() {
        let tools = list_tools(&DisabledTools::default());
        let description = &tools[0].description;
        assert!(description.contains("validated against the chosen type"));
        assert!(description.contains("does not declare are dropped"));
        assert!(!description.contains("as-is"));
    }

    #[test]
    fn disabled_tools_are_hidden() {
        let tools = list_tools(&DisabledTools::parse("generate_chart,generate_pin_map"));
        assert_eq!(tools.len(), ChartKind::ALL.len() - 1);
        assert!(tools.iter().all(|tool| tool.name != UNIFIED_TOOL_NAME));
        assert!(tools.iter().all(|tool| tool.name != "generate_pin_map"));
    }

    #[test]
    fn descriptors_serialize_with_wire_field_names() -> anyhow::Result<()> {
        let tools = list_tools(&DisabledTools::default());
        let line = tools
            .iter()
            .find(|tool| tool.name == "generate_line_chart")
            .ok_or_else(|| anyhow::anyhow!("line tool missing"))?;
        let value = serde_json::to_value(line)?;
        assert_eq!(value["inputSchema"]["required"], json!(["data"]));
        assert!(value.get("input_schema").is_none());
        Ok(())
    }
}
