use crate::types::node::NodeKind;
use flowsmith_llm::ModelConfig;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_MAX_TOKENS: u32 = 1000;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Per-node state, tagged by node kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NodeData {
    Input(InputData),
    #[serde(rename = "llm")]
    LLM(LlmData),
    Output(OutputData),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputData {
    /// Text typed by the user; doubles as the node's output
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmData {
    pub model: String,
    pub api_key: String,
    pub max_tokens: u32,
    pub temperature: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

impl Default for LlmData {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_key: String::new(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            input_value: None,
            output: None,
        }
    }
}

impl LlmData {
    pub fn to_model_config(&self) -> ModelConfig {
        ModelConfig {
            model: self.model.clone(),
            api_key: self.api_key.clone(),
            max_tokens: Some(self.max_tokens),
            temperature: Some(self.temperature),
        }
    }

    pub fn prompt(&self) -> &str {
        self.input_value.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputData {
    pub value: String,
}

impl NodeData {
    pub fn for_kind(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Input => NodeData::Input(InputData::default()),
            NodeKind::LLM => NodeData::LLM(LlmData::default()),
            NodeKind::Output => NodeData::Output(OutputData::default()),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            NodeData::Input(_) => NodeKind::Input,
            NodeData::LLM(_) => NodeKind::LLM,
            NodeData::Output(_) => NodeKind::Output,
        }
    }

    /// Current produced value, if this kind produces one
    pub fn output(&self) -> Option<&str> {
        match self {
            NodeData::Input(data) => Some(data.value.as_str()),
            NodeData::LLM(data) => data.output.as_deref(),
            NodeData::Output(_) => None,
        }
    }

    pub fn as_llm(&self) -> Option<&LlmData> {
        match self {
            NodeData::LLM(data) => Some(data),
            _ => None,
        }
    }

    /// First patch field this kind does not carry
    pub fn rejected_field(&self, patch: &NodeDataPatch) -> Option<&'static str> {
        let allowed: &[&str] = match self {
            NodeData::Input(_) => &["value", "output"],
            NodeData::LLM(_) => &[
                "model",
                "apiKey",
                "maxTokens",
                "temperature",
                "inputValue",
                "output",
            ],
            NodeData::Output(_) => &["value"],
        };
        patch
            .present_fields()
            .into_iter()
            .find(|field| !allowed.contains(field))
    }

    /// Value a patch publishes to downstream nodes, if any
    pub fn emitted_by(&self, patch: &NodeDataPatch) -> Option<String> {
        let produced = match self {
            NodeData::Input(_) => patch.output.clone().or_else(|| patch.value.clone()),
            NodeData::LLM(_) => patch.output.clone(),
            NodeData::Output(_) => None,
        };
        produced.filter(|value| !value.is_empty())
    }

    /// Shallow merge. Callers check `rejected_field` first; fields the kind
    /// does not carry are ignored here.
    pub fn apply(&mut self, patch: NodeDataPatch) {
        match self {
            NodeData::Input(data) => {
                if let Some(value) = patch.output.or(patch.value) {
                    data.value = value;
                }
            }
            NodeData::LLM(data) => {
                if let Some(model) = patch.model {
                    data.model = model;
                }
                if let Some(api_key) = patch.api_key {
                    data.api_key = api_key;
                }
                if let Some(max_tokens) = patch.max_tokens {
                    data.max_tokens = max_tokens;
                }
                if let Some(temperature) = patch.temperature {
                    data.temperature = temperature;
                }
                if let Some(input_value) = patch.input_value {
                    data.input_value = Some(input_value);
                }
                if let Some(output) = patch.output {
                    data.output = Some(output);
                }
            }
            NodeData::Output(data) => {
                if let Some(value) = patch.value {
                    data.value = value;
                }
            }
        }
    }
}

/// Partial update for a node's data. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NodeDataPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

impl NodeDataPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn input_value(mut self, input_value: impl Into<String>) -> Self {
        self.input_value = Some(input_value.into());
        self
    }

    pub fn output(mut self, output: impl Into<String>) -> Self {
        self.output = Some(output.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.present_fields().is_empty()
    }

    fn present_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.value.is_some() {
            fields.push("value");
        }
        if self.model.is_some() {
            fields.push("model");
        }
        if self.api_key.is_some() {
            fields.push("apiKey");
        }
        if self.max_tokens.is_some() {
            fields.push("maxTokens");
        }
        if self.temperature.is_some() {
            fields.push("temperature");
        }
        if self.input_value.is_some() {
            fields.push("inputValue");
        }
        if self.output.is_some() {
            fields.push("output");
        }
        fields
    }
}
