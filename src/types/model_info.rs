use serde::{Deserialize, Serialize};

/// Information about a specific model, as returned by `GET models/{model}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    /// Resource name of the model, e.g. `models/gemini-2.5-flash`.
    pub name: String,

    /// Version string of the model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// A human-readable name for the model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// Maximum number of input tokens allowed for this model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_token_limit: Option<u32>,

    /// Maximum number of output tokens available for this model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_token_limit: Option<u32>,

    /// API methods the model supports, e.g. `generateContent`.
    #[serde(default)]
    pub supported_generation_methods: Vec<String>,
}

impl ModelInfo {
    /// Returns true if the model can answer `generateContent` requests.
    pub fn supports_generate_content(&self) -> bool {
        self.supported_generation_methods.is_empty()
            || self
                .supported_generation_methods
                .iter()
                .any(|method| method == "generateContent")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_info_deserialization() {
        let json = r#"{
            "name": "models/gemini-2.5-flash",
            "version": "001",
            "displayName": "Gemini 2.5 Flash",
            "inputTokenLimit": 1048576,
            "outputTokenLimit": 65536,
            "supportedGenerationMethods": ["generateContent", "countTokens"],
            "temperature": 1.0
        }"#;
        let info: ModelInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.name, "models/gemini-2.5-flash");
        assert_eq!(info.display_name.as_deref(), Some("Gemini 2.5 Flash"));
        assert_eq!(info.output_token_limit, Some(65536));
        assert!(info.supports_generate_content());
    }

    #[test]
    fn test_embedding_model_cannot_chat() {
        let json = r#"{
            "name": "models/text-embedding-004",
            "supportedGenerationMethods": ["embedContent"]
        }"#;
        let info: ModelInfo = serde_json::from_str(json).unwrap();
        assert!(!info.supports_generate_content());
    }
}
