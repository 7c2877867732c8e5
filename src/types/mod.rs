// Public modules
pub mod content;
pub mod generate_content_request;
pub mod generate_content_response;
pub mod generation_config;
pub mod model;
pub mod model_info;
pub mod transcript;
pub mod turn;
pub mod usage_metadata;

// Re-exports
pub use content::{Content, ContentRole, Part};
pub use generate_content_request::GenerateContentRequest;
pub use generate_content_response::{Candidate, GenerateContentResponse, PromptFeedback};
pub use generation_config::GenerationConfig;
pub use model::{KnownModel, Model};
pub use model_info::ModelInfo;
pub use transcript::Transcript;
pub use turn::{Author, Turn};
pub use usage_metadata::UsageMetadata;
