use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A tool exposed by an MCP server, as reported by `tools/list`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, alias = "inputSchema")]
    pub input_schema: Value,
}

/// One item of a `tools/call` result.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolContent {
    Text(String),
    Other(Value),
}

impl ToolContent {
    /// Classify a raw content item by its `type` tag.
    pub fn from_value(item: Value) -> Self {
        let is_text = item.get("type").and_then(Value::as_str) == Some("text");
        match item.get("text").and_then(Value::as_str) {
            Some(text) if is_text => Self::Text(text.to_string()),
            _ => Self::Other(item),
        }
    }

    /// Text content as-is, anything else rendered as compact JSON.
    pub fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Other(value) => value.to_string(),
        }
    }
}

/// Identity declared by the client during the `initialize` handshake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInfo {
    pub name: String,
    pub version: String,
}

impl ClientInfo {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tool_info_accepts_camel_case_schema() {
        let tool: ToolInfo = serde_json::from_value(json!({
            "name": "search_notes",
            "inputSchema": {"type": "object", "required": ["keywords"]}
        }))
        .unwrap();
        assert_eq!(tool.name, "search_notes");
        assert!(tool.description.is_none());
        assert_eq!(tool.input_schema["required"][0], "keywords");
    }

    #[test]
    fn test_text_content() {
        let content = ToolContent::from_value(json!({"type": "text", "text": "hello"}));
        assert_eq!(content, ToolContent::Text("hello".to_string()));
        assert_eq!(content.into_text(), "hello");
    }

    #[test]
    fn test_non_text_content_is_rendered_as_json() {
        let item = json!({"type": "image", "data": "AAAA", "mimeType": "image/png"});
        let content = ToolContent::from_value(item.clone());
        assert_eq!(content, ToolContent::Other(item.clone()));
        assert_eq!(content.into_text(), item.to_string());
    }
}
