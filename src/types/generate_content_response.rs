use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{Content, UsageMetadata};

/// A response candidate generated by the model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Generated content.  Absent when generation stopped before any output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,

    /// Why the model stopped generating, e.g. `STOP` or `SAFETY`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

/// Feedback on the prompt itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    /// Set when the prompt was blocked and no candidates were produced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_reason: Option<String>,
}

/// Response body of `POST models/{model}:generateContent`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Candidate replies; the first one is used.
    #[serde(default)]
    pub candidates: Vec<Candidate>,

    /// Feedback on the prompt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_feedback: Option<PromptFeedback>,

    /// Token accounting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_metadata: Option<UsageMetadata>,
}

impl GenerateContentResponse {
    /// Reply text of the first candidate, with thoughts removed.
    ///
    /// A blocked prompt, a missing candidate, or a candidate without text
    /// is an invalid response.
    pub fn text(&self) -> Result<String> {
        if let Some(reason) = self
            .prompt_feedback
            .as_ref()
            .and_then(|feedback| feedback.block_reason.as_deref())
        {
            return Err(Error::invalid_response(format!(
                "prompt was blocked: {reason}"
            )));
        }
        let candidate = self
            .candidates
            .first()
            .ok_or_else(|| Error::invalid_response("response has no candidates"))?;
        candidate
            .content
            .as_ref()
            .and_then(Content::text)
            .ok_or_else(|| match &candidate.finish_reason {
                Some(reason) => {
                    Error::invalid_response(format!("candidate has no text (finish reason {reason})"))
                }
                None => Error::invalid_response("candidate has no text"),
            })
    }
}
